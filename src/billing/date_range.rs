use chrono::{Datelike, Days, NaiveDate};
use std::fmt;

/// Wire format used by Cost Explorer for period bounds
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used when a date is shown to a human
pub const DISPLAY_DATE_FORMAT: &str = "%Y/%m/%d";

/// Half-open reporting window `[start, end)`.
///
/// Cost Explorer treats `end` as exclusive, so the last day the window
/// actually covers is [`DateRange::display_end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Month-to-date window ending (exclusively) at `today`.
    ///
    /// Cost Explorer rejects a window whose start equals its end, so on the
    /// first day of a month the window starts on the first day of the
    /// previous month instead. `end` is always `today`.
    pub fn resolve(today: NaiveDate) -> Self {
        let start = first_of_month(today);
        if start == today {
            let last_of_previous = today - Days::new(1);
            return Self::new(first_of_month(last_of_previous), today);
        }
        Self::new(start, today)
    }

    /// Last day covered by the window.
    pub fn display_end(&self) -> NaiveDate {
        self.end - Days::new(1)
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self::new(
            NaiveDate::parse_from_str(start, API_DATE_FORMAT)?,
            NaiveDate::parse_from_str(end, API_DATE_FORMAT)?,
        ))
    }

    pub fn api_start(&self) -> String {
        self.start.format(API_DATE_FORMAT).to_string()
    }

    pub fn api_end(&self) -> String {
        self.end.format(API_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format(DISPLAY_DATE_FORMAT),
            self.display_end().format(DISPLAY_DATE_FORMAT)
        )
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_mid_month() {
        let range = DateRange::resolve(date(2024, 3, 16));
        assert_eq!(range, DateRange::new(date(2024, 3, 1), date(2024, 3, 16)));
    }

    #[test]
    fn test_resolve_every_day_after_the_first() {
        let mut today = date(2023, 1, 2);
        while today < date(2025, 1, 1) {
            if today.day() != 1 {
                let range = DateRange::resolve(today);
                assert_eq!(range.start, first_of_month(today));
                assert_eq!(range.start.day(), 1);
                assert_eq!(range.start.month(), today.month());
                assert_eq!(range.end, today);
            }
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_resolve_first_of_month_falls_back_to_previous_month() {
        let range = DateRange::resolve(date(2024, 3, 1));
        assert_eq!(range, DateRange::new(date(2024, 2, 1), date(2024, 3, 1)));
    }

    #[test]
    fn test_resolve_first_of_january_crosses_year() {
        let range = DateRange::resolve(date(2025, 1, 1));
        assert_eq!(range, DateRange::new(date(2024, 12, 1), date(2025, 1, 1)));
    }

    #[test]
    fn test_resolve_never_returns_empty_window() {
        let mut today = date(2024, 1, 1);
        while today < date(2025, 1, 1) {
            let range = DateRange::resolve(today);
            assert!(range.start < range.end, "empty window for {today}");
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_display_end_is_inclusive_last_day() {
        let range = DateRange::new(date(2024, 2, 1), date(2024, 3, 1));
        assert_eq!(range.display_end(), date(2024, 2, 29));
        assert_eq!(range.to_string(), "2024/02/01 - 2024/02/29");
    }

    #[test]
    fn test_parse_and_api_format() {
        let range = DateRange::parse("2024-10-01", "2024-10-16").unwrap();
        assert_eq!(range.api_start(), "2024-10-01");
        assert_eq!(range.api_end(), "2024-10-16");
        assert!(DateRange::parse("2024/10/01", "2024-10-16").is_err());
    }
}
