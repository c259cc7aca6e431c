// Calendar primitives and localized weekday/month names
use serde::{Deserialize, Serialize};

pub const WEEKDAY_COUNT: usize = 7;
pub const MONTH_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// Index into a weekday name table, Sunday = 0
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Sun => chrono::Weekday::Sun,
            Weekday::Mon => chrono::Weekday::Mon,
            Weekday::Tue => chrono::Weekday::Tue,
            Weekday::Wed => chrono::Weekday::Wed,
            Weekday::Thu => chrono::Weekday::Thu,
            Weekday::Fri => chrono::Weekday::Fri,
            Weekday::Sat => chrono::Weekday::Sat,
        }
    }

    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Index into a month name table, January = 0
    pub fn index(self) -> usize {
        self as usize
    }

    /// Calendar month number, January = 1
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Self> {
        const ALL: [Month; MONTH_COUNT] = [
            Month::Jan,
            Month::Feb,
            Month::Mar,
            Month::Apr,
            Month::May,
            Month::Jun,
            Month::Jul,
            Month::Aug,
            Month::Sep,
            Month::Oct,
            Month::Nov,
            Month::Dec,
        ];
        ALL.get(number.checked_sub(1)? as usize).copied()
    }
}

/// Which occurrence of a weekday within a month a rule refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekOrdinal {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarNames {
    pub weekdays: Vec<String>,
    pub months: Vec<String>,
}

impl CalendarNames {
    pub fn new(weekdays: &[&str], months: &[&str]) -> Self {
        Self {
            weekdays: weekdays.iter().map(|s| s.to_string()).collect(),
            months: months.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn german() -> Self {
        Self::new(
            &["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"],
            &[
                "Januar",
                "Februar",
                "März",
                "April",
                "Mai",
                "Juni",
                "Juli",
                "August",
                "September",
                "Oktober",
                "November",
                "Dezember",
            ],
        )
    }

    pub fn english() -> Self {
        Self::new(
            &["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            &[
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ],
        )
    }

    /// Tables compiled into the firmware, keyed by locale identifier
    pub fn builtin(locale: &str) -> Option<Self> {
        match locale {
            "de" => Some(Self::german()),
            "en" => Some(Self::english()),
            _ => None,
        }
    }

    // Falls back to an empty name so an unvalidated table never panics a renderer.
    pub fn weekday(&self, weekday: Weekday) -> &str {
        self.weekdays
            .get(weekday.index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn month(&self, month: Month) -> &str {
        self.months
            .get(month.index())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_have_calendar_cardinality() {
        for locale in ["de", "en"] {
            let names = CalendarNames::builtin(locale).unwrap();
            assert_eq!(names.weekdays.len(), WEEKDAY_COUNT, "{locale}");
            assert_eq!(names.months.len(), MONTH_COUNT, "{locale}");
        }
        assert!(CalendarNames::builtin("xx").is_none());
    }

    #[test]
    fn test_lookup_is_sunday_and_january_based() {
        let names = CalendarNames::german();
        assert_eq!(names.weekday(Weekday::Sun), "So");
        assert_eq!(names.weekday(Weekday::Sat), "Sa");
        assert_eq!(names.month(Month::Jan), "Januar");
        assert_eq!(names.month(Month::Mar), "März");
        assert_eq!(names.month(Month::Dec), "Dezember");
    }

    #[test]
    fn test_short_table_lookup_does_not_panic() {
        let names = CalendarNames::new(&["Sun"], &[]);
        assert_eq!(names.weekday(Weekday::Mon), "");
        assert_eq!(names.month(Month::Oct), "");
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::Mar.number(), 3);
        assert_eq!(Month::from_number(10), Some(Month::Oct));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
    }

    #[test]
    fn test_weekday_chrono_conversion() {
        assert_eq!(Weekday::Sun.to_chrono(), chrono::Weekday::Sun);
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Thu), Weekday::Thu);
    }
}
