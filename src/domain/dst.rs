// Daylight saving time rules and their evaluation for a given year
use crate::domain::calendar::{Month, WeekOrdinal, Weekday};
use crate::domain::error::DstError;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const SECS_PER_HOUR: i32 = 3600;

/// One annual transition, e.g. "last Sunday of March at 02:00"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstRule {
    pub abbreviation: String,
    pub week: WeekOrdinal,
    pub weekday: Weekday,
    pub month: Month,
    /// Hour of the transition in local standard time
    pub hour: u32,
    /// Offset added to the base UTC offset while this rule is in effect
    pub offset_secs: i32,
}

impl DstRule {
    pub fn new(
        abbreviation: &str,
        week: WeekOrdinal,
        weekday: Weekday,
        month: Month,
        hour: u32,
        offset_secs: i32,
    ) -> Self {
        Self {
            abbreviation: abbreviation.to_string(),
            week,
            weekday,
            month,
            hour,
            offset_secs,
        }
    }

    /// Calendar date this rule falls on in `year`
    pub fn date_in(&self, year: i32) -> Result<NaiveDate, DstError> {
        let month = self.month.number();
        let weekday = self.weekday.to_chrono();
        let date = match self.week {
            WeekOrdinal::First => NaiveDate::from_weekday_of_month_opt(year, month, weekday, 1),
            WeekOrdinal::Second => NaiveDate::from_weekday_of_month_opt(year, month, weekday, 2),
            WeekOrdinal::Third => NaiveDate::from_weekday_of_month_opt(year, month, weekday, 3),
            WeekOrdinal::Fourth => NaiveDate::from_weekday_of_month_opt(year, month, weekday, 4),
            // Every weekday occurs at least four times a month, a fifth time only sometimes
            WeekOrdinal::Last => NaiveDate::from_weekday_of_month_opt(year, month, weekday, 5)
                .or_else(|| NaiveDate::from_weekday_of_month_opt(year, month, weekday, 4)),
        };
        date.ok_or(DstError::DateOutOfRange {
            abbreviation: self.abbreviation.clone(),
            year,
        })
    }

    fn instant_in(&self, year: i32, utc_offset_hours: i32) -> Result<DateTime<Utc>, DstError> {
        let local = self
            .date_in(year)?
            .and_hms_opt(self.hour, 0, 0)
            .ok_or(DstError::HourOutOfRange {
                abbreviation: self.abbreviation.clone(),
                hour: self.hour,
            })?;
        let utc = local
            .checked_sub_signed(TimeDelta::hours(utc_offset_hours as i64))
            .ok_or(DstError::DateOutOfRange {
                abbreviation: self.abbreviation.clone(),
                year,
            })?;
        Ok(utc.and_utc())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstTransitions {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DstTransitions {
    /// Southern hemisphere rules start late in the year and end early in it
    pub fn wraps_year(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if self.wraps_year() {
            instant >= self.start || instant < self.end
        } else {
            instant >= self.start && instant < self.end
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTime {
    pub time: DateTime<FixedOffset>,
    pub abbreviation: String,
    pub dst: bool,
}

/// Base UTC offset plus the pair of rules entering and leaving DST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstPolicy {
    pub utc_offset_hours: i32,
    pub start: DstRule,
    pub end: DstRule,
}

impl DstPolicy {
    /// CET/CEST, UTC+1 with one extra hour from the last Sunday of March
    pub fn central_europe() -> Self {
        Self {
            utc_offset_hours: 1,
            start: DstRule::new("CEST", WeekOrdinal::Last, Weekday::Sun, Month::Mar, 2, 3600),
            end: DstRule::new("CET", WeekOrdinal::Last, Weekday::Sun, Month::Oct, 2, 0),
        }
    }

    /// EST/EDT as observed in Boston
    pub fn us_eastern() -> Self {
        Self {
            utc_offset_hours: -5,
            start: DstRule::new("EDT", WeekOrdinal::Second, Weekday::Sun, Month::Mar, 2, 3600),
            end: DstRule::new("EST", WeekOrdinal::First, Weekday::Sun, Month::Nov, 1, 0),
        }
    }

    pub fn transitions(&self, year: i32) -> Result<DstTransitions, DstError> {
        Ok(DstTransitions {
            start: self.start.instant_in(year, self.utc_offset_hours)?,
            end: self.end.instant_in(year, self.utc_offset_hours)?,
        })
    }

    pub fn standard_offset(&self) -> Result<FixedOffset, DstError> {
        self.offset_with(0)
    }

    pub(crate) fn offset_with(&self, extra_secs: i32) -> Result<FixedOffset, DstError> {
        let secs = self.utc_offset_hours * SECS_PER_HOUR + extra_secs;
        FixedOffset::east_opt(secs).ok_or(DstError::OffsetOutOfRange(secs))
    }

    /// Local wall-clock time for a UTC instant
    pub fn resolve(&self, utc: DateTime<Utc>) -> Result<LocalTime, DstError> {
        let year = utc.with_timezone(&self.standard_offset()?).year();
        let dst = self.transitions(year)?.contains(utc);
        let rule = if dst { &self.start } else { &self.end };
        Ok(LocalTime {
            time: utc.with_timezone(&self.offset_with(rule.offset_secs)?),
            abbreviation: rule.abbreviation.clone(),
            dst,
        })
    }
}

impl Default for DstPolicy {
    fn default() -> Self {
        Self::central_europe()
    }
}
