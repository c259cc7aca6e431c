use crate::domain::settings::Settings;
use anyhow::Context;
use std::path::PathBuf;

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings";
pub const ENV_PREFIX: &str = "FHEM_DISPLAY";
const ENV_SEPARATOR: &str = "__";
const LIST_SEPARATOR: char = ',';
const LIST_KEYS: [&str; 1] = ["time.ntp_servers"];

/// Layers built-in defaults, an optional settings file and the environment
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    env_prefix: String,
    env: Option<config::Map<String, String>>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from(DEFAULT_SETTINGS_PATH)),
            env_prefix: ENV_PREFIX.to_string(),
            env: None,
        }
    }
}

impl SettingsLoader {
    /// Settings file path without extension, the format is picked from whatever exists
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn without_file(mut self) -> Self {
        self.file = None;
        self
    }

    /// Use a fixed variable map instead of the process environment
    pub fn with_env(mut self, vars: config::Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    // Values stay strings so secrets such as "00123456" are never coerced to numbers
    fn environment(&self) -> config::Environment {
        config::Environment::with_prefix(&self.env_prefix)
            .separator(ENV_SEPARATOR)
            .source(self.env.clone())
    }

    fn env_vars(&self) -> Vec<(String, String)> {
        match &self.env {
            Some(vars) => vars.clone().into_iter().collect(),
            None => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Comma separated list variables, e.g. FHEM_DISPLAY__TIME__NTP_SERVERS
    fn env_lists(&self) -> Vec<(&'static str, Vec<String>)> {
        let vars = self.env_vars();
        LIST_KEYS
            .iter()
            .filter_map(|key| {
                let name = format!(
                    "{}{}{}",
                    self.env_prefix,
                    ENV_SEPARATOR,
                    key.replace('.', ENV_SEPARATOR)
                );
                let (_, value) = vars.iter().find(|(k, _)| k.eq_ignore_ascii_case(&name))?;
                let items = value
                    .split(LIST_SEPARATOR)
                    .map(|item| item.trim().to_string())
                    .collect();
                Some((*key, items))
            })
            .collect()
    }

    fn build(&self, document: Option<(&str, config::FileFormat)>) -> anyhow::Result<Settings> {
        let defaults = config::Config::try_from(&Settings::default())
            .context("Failed to serialize default settings")?;
        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(file) = &self.file {
            builder = builder
                .add_source(config::File::with_name(&file.to_string_lossy()).required(false));
        }
        if let Some((text, format)) = document {
            builder = builder.add_source(config::File::from_str(text, format));
        }

        builder = builder.add_source(self.environment());
        for (key, items) in self.env_lists() {
            builder = builder
                .set_override(key, items)
                .with_context(|| format!("Failed to apply list variable for {}", key))?;
        }

        let settings: Settings = builder
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Settings do not match the expected layout")?;
        settings.validate().context("Invalid settings")?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn load(&self) -> anyhow::Result<Settings> {
        self.build(None)
    }

    /// Load with an in-memory document layered between the file and the environment
    pub fn load_str(&self, text: &str, format: config::FileFormat) -> anyhow::Result<Settings> {
        self.build(Some((text, format)))
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    SettingsLoader::default().load()
}

pub fn to_toml(settings: &Settings) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(settings)?)
}

pub fn to_json(settings: &Settings) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(settings)?)
}
