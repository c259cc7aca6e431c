// The immutable settings table shared by every subsystem of the display
use crate::domain::calendar::{CalendarNames, MONTH_COUNT, WEEKDAY_COUNT};
use crate::domain::dst::DstPolicy;
use crate::domain::error::SettingsError;
use crate::domain::pins::{DisplayPins, PinMap, TouchPins};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

const REDACTED: &str = "<redacted>";
const DST_CHECK_YEARS: std::ops::Range<i32> = 2000..2028;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub wifi: WifiSettings,
    pub server: ServerSettings,
    pub timing: TimingSettings,
    pub localization: LocalizationSettings,
    pub time: TimeSettings,
    pub pins: PinMap,
    pub features: FeatureSettings,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiSettings {
    pub ssid: String,
    pub password: String,
    /// Announced via DHCP so the display can be found on the network
    pub hostname: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Full url including scheme and port, e.g. http://192.168.1.1:8083/fhem
    pub base_url: String,
    /// Empty when the server does not use basic auth
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Touches within this window after an accepted touch are ignored
    pub touch_debounce_ms: u64,
    pub update_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationSettings {
    pub locale: String,
    /// User tables, consulted before the built-in ones
    #[serde(default)]
    pub locales: BTreeMap<String, CalendarNames>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSettings {
    pub dst: DstPolicy,
    /// Tried in order until one answers
    pub ntp_servers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSettings {
    pub touchpad: bool,
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl Settings {
    /// Check every table invariant, failing on the first violation
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.wifi.validate()?;
        self.server.url()?;
        self.timing.validate()?;
        self.localization.names()?;
        self.time.validate()?;
        self.pins.check_conflicts(self.features.touchpad)?;
        Ok(())
    }

    pub fn touch_pins(&self) -> Option<TouchPins> {
        self.pins.touch_pins(self.features.touchpad)
    }

    pub fn display_pins(&self) -> DisplayPins {
        self.pins.display_pins()
    }
}

impl WifiSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.ssid.trim().is_empty() {
            return Err(SettingsError::EmptySsid);
        }
        if self.hostname.trim().is_empty() {
            return Err(SettingsError::EmptyHostname);
        }
        Ok(())
    }
}

impl ServerSettings {
    pub fn url(&self) -> Result<Url, SettingsError> {
        let url = Url::parse(&self.base_url).map_err(|e| SettingsError::InvalidServerUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SettingsError::UnsupportedScheme(self.base_url.clone()));
        }
        // The firmware never falls back to a scheme default port
        if url.port().is_none() {
            return Err(SettingsError::MissingPort(self.base_url.clone()));
        }
        Ok(url)
    }

    pub fn credentials(&self) -> Option<BasicAuth> {
        if self.username.is_empty() {
            return None;
        }
        Some(BasicAuth {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

impl TimingSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.update_interval_secs == 0 {
            return Err(SettingsError::ZeroUpdateInterval);
        }
        Ok(())
    }

    pub fn touch_debounce(&self) -> Duration {
        Duration::from_millis(self.touch_debounce_ms)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }
}

impl LocalizationSettings {
    /// Names for the configured locale, checked for calendar cardinality
    pub fn names(&self) -> Result<CalendarNames, SettingsError> {
        let names = self
            .locales
            .get(&self.locale)
            .cloned()
            .or_else(|| CalendarNames::builtin(&self.locale))
            .ok_or_else(|| SettingsError::UnknownLocale(self.locale.clone()))?;

        if names.weekdays.len() != WEEKDAY_COUNT {
            return Err(SettingsError::WeekdayCount {
                locale: self.locale.clone(),
                found: names.weekdays.len(),
            });
        }
        if names.months.len() != MONTH_COUNT {
            return Err(SettingsError::MonthCount {
                locale: self.locale.clone(),
                found: names.months.len(),
            });
        }
        if names
            .weekdays
            .iter()
            .chain(&names.months)
            .any(|name| name.trim().is_empty())
        {
            return Err(SettingsError::EmptyName(self.locale.clone()));
        }
        Ok(names)
    }
}

impl TimeSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        let offset = self.dst.utc_offset_hours;
        if !(-12..=14).contains(&offset) {
            return Err(SettingsError::UtcOffsetOutOfRange(offset));
        }
        for rule in [&self.dst.start, &self.dst.end] {
            if rule.abbreviation.trim().is_empty() {
                return Err(SettingsError::EmptyAbbreviation);
            }
        }

        for rule in [&self.dst.start, &self.dst.end] {
            self.dst.offset_with(rule.offset_secs)?;
        }

        // Weekday layouts repeat every 28 years, so this covers every distinct calendar
        for year in DST_CHECK_YEARS {
            let transitions = self.dst.transitions(year)?;
            if transitions.start == transitions.end {
                return Err(SettingsError::IdenticalDstRules(year));
            }
        }

        if self.ntp_servers.is_empty() {
            return Err(SettingsError::NoNtpServers);
        }
        if let Some(index) = self.ntp_servers.iter().position(|s| s.trim().is_empty()) {
            return Err(SettingsError::BlankNtpServer(index));
        }
        Ok(())
    }
}

impl Default for WifiSettings {
    fn default() -> Self {
        Self {
            ssid: "ssid".to_string(),
            password: "password".to_string(),
            hostname: "ESP8266_FHEM_Display".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.1.1:8083/fhem".to_string(),
            username: "Username".to_string(),
            password: "Password".to_string(),
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            touch_debounce_ms: 1000,
            update_interval_secs: 30,
        }
    }
}

impl Default for LocalizationSettings {
    fn default() -> Self {
        Self {
            locale: "de".to_string(),
            locales: BTreeMap::new(),
        }
    }
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            dst: DstPolicy::central_europe(),
            ntp_servers: vec![
                "0.ch.pool.ntp.org".to_string(),
                "1.ch.pool.ntp.org".to_string(),
                "2.ch.pool.ntp.org".to_string(),
            ],
        }
    }
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self { touchpad: true }
    }
}

fn redact(secret: &str) -> &str {
    if secret.is_empty() { "" } else { REDACTED }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("wifi", &self.wifi)
            .field("server", &self.server)
            .field("timing", &self.timing)
            .field("localization", &self.localization)
            .field("time", &self.time)
            .field("pins", &self.pins)
            .field("features", &self.features)
            .finish()
    }
}

impl fmt::Debug for WifiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiSettings")
            .field("ssid", &self.ssid)
            .field("password", &redact(&self.password))
            .field("hostname", &self.hostname)
            .finish()
    }
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}
