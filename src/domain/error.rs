// Errors raised while validating or evaluating the settings table
use crate::domain::pins::{BoardPin, PinRole};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DstError {
    #[error("rule {abbreviation} has no date in year {year}")]
    DateOutOfRange { abbreviation: String, year: i32 },
    #[error("rule {abbreviation} has invalid hour {hour}, expected 0..=23")]
    HourOutOfRange { abbreviation: String, hour: u32 },
    #[error("UTC offset of {0} seconds is out of range")]
    OffsetOutOfRange(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("wifi ssid must not be empty")]
    EmptySsid,
    #[error("wifi hostname must not be empty")]
    EmptyHostname,
    #[error("server url {url:?} is invalid: {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("server url {0:?} must use http or https")]
    UnsupportedScheme(String),
    #[error("server url {0:?} must include a port")]
    MissingPort(String),
    #[error("update interval must be greater than zero")]
    ZeroUpdateInterval,
    #[error("unknown locale {0:?}")]
    UnknownLocale(String),
    #[error("locale {locale:?} has {found} weekday names, expected 7")]
    WeekdayCount { locale: String, found: usize },
    #[error("locale {locale:?} has {found} month names, expected 12")]
    MonthCount { locale: String, found: usize },
    #[error("locale {0:?} contains an empty name")]
    EmptyName(String),
    #[error("UTC offset {0} is outside -12..=14 hours")]
    UtcOffsetOutOfRange(i32),
    #[error("DST rule abbreviation must not be empty")]
    EmptyAbbreviation,
    #[error("DST start and end rules fall on the same moment in {0}")]
    IdenticalDstRules(i32),
    #[error(transparent)]
    Dst(#[from] DstError),
    #[error("at least one NTP server is required")]
    NoNtpServers,
    #[error("NTP server at position {0} is blank")]
    BlankNtpServer(usize),
    #[error("{first} and {second} are both assigned to {pin}")]
    PinConflict {
        first: PinRole,
        second: PinRole,
        pin: BoardPin,
    },
}
