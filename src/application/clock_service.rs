// Clock service - Local wall-clock time, localized dates and NTP server order
use crate::domain::calendar::{CalendarNames, Month, Weekday};
use crate::domain::dst::{DstPolicy, DstTransitions, LocalTime};
use crate::domain::settings::Settings;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};

#[derive(Debug, Clone)]
pub struct ClockService {
    names: CalendarNames,
    policy: DstPolicy,
    ntp_servers: Vec<String>,
}

impl ClockService {
    pub fn new(settings: &Settings) -> Result<Self> {
        let names = settings
            .localization
            .names()
            .context("Failed to resolve calendar names")?;
        Ok(Self {
            names,
            policy: settings.time.dst.clone(),
            ntp_servers: settings.time.ntp_servers.clone(),
        })
    }

    pub fn now(&self, utc: DateTime<Utc>) -> Result<LocalTime> {
        Ok(self.policy.resolve(utc)?)
    }

    pub fn transitions(&self, year: i32) -> Result<DstTransitions> {
        self.policy
            .transitions(year)
            .with_context(|| format!("Failed to evaluate DST rules for {}", year))
    }

    /// e.g. "Mo, 14. Oktober 2026"
    pub fn date_line(&self, local: &LocalTime) -> String {
        let weekday = self.names.weekday(Weekday::from_chrono(local.time.weekday()));
        let month = Month::from_number(local.time.month())
            .map(|m| self.names.month(m))
            .unwrap_or_default();
        format!(
            "{}, {}. {} {}",
            weekday,
            local.time.day(),
            month,
            local.time.year()
        )
    }

    /// e.g. "14:03:22 CEST"
    pub fn time_line(&self, local: &LocalTime) -> String {
        format!("{} {}", local.time.format("%H:%M:%S"), local.abbreviation)
    }

    pub fn ntp_servers(&self) -> &[String] {
        &self.ntp_servers
    }

    /// Server to try after `failed`, wrapping back to the first
    pub fn next_ntp_server(&self, failed: &str) -> Option<&str> {
        let next = match self.ntp_servers.iter().position(|s| s == failed) {
            Some(index) => (index + 1) % self.ntp_servers.len(),
            None => 0,
        };
        self.ntp_servers.get(next).map(String::as_str)
    }
}
