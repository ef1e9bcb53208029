use chrono::{DateTime, Datelike, NaiveDate};
use log;
use nom::{
    bytes::complete::take_till1,
    character::complete::char,
    combinator::rest,
    sequence::separated_pair,
    IResult,
};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

const HOLIDAY_DATE_FORMAT: &str = "%Y-%m-%d";
const RECURRING_TOKEN: &str = "true";

/// A single entry of a holiday file.
///
/// Recurring records match the same day and month in every year, the others
/// only match their exact date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayRecord {
    pub date: NaiveDate,
    pub recurring: bool,
}

impl HolidayRecord {
    pub fn new(date: NaiveDate, recurring: bool) -> Self {
        HolidayRecord { date, recurring }
    }

    pub fn matches(&self, date: &NaiveDate) -> bool {
        let same_day = date.day() == self.date.day() && date.month() == self.date.month();
        if self.recurring {
            same_day
        } else {
            same_day && date.year() == self.date.year()
        }
    }

    fn split_line(input: &str) -> IResult<&str, (&str, &str)> {
        separated_pair(take_till1(|c| c == ' '), char(' '), rest)(input)
    }

    fn parse_date_token(token: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(token, HOLIDAY_DATE_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(token).map(|dt| dt.naive_local().date()))
            .map_err(Error::from)
    }
}

impl FromStr for HolidayRecord {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let line = s.trim_end_matches('\r');
        let (_, (date_token, recurring_token)) = Self::split_line(line).map_err(|_| {
            Error::new(
                ErrorKind::HolidayParse,
                &format!("expected '<date> <recurring>', got '{}'", line),
            )
        })?;

        let date = Self::parse_date_token(date_token).map_err(|e| {
            Error::new(
                ErrorKind::HolidayParse,
                &format!("'{}' is not a date ({})", date_token, e),
            )
        })?;

        Ok(HolidayRecord {
            date,
            recurring: recurring_token.trim() == RECURRING_TOKEN,
        })
    }
}

/// A line of holiday input that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_no: usize,
    pub content: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct HolidayCatalog {
    records: Vec<HolidayRecord>,
    skipped: Vec<SkippedLine>,
}

impl HolidayCatalog {
    pub fn from_records(records: Vec<HolidayRecord>) -> Self {
        HolidayCatalog {
            records,
            skipped: Vec::new(),
        }
    }

    /// Parses newline separated `<YYYY-MM-DD> <true|false>` records.
    ///
    /// Malformed lines never abort the load. They are logged and kept in
    /// [`HolidayCatalog::skipped`] while every other record is retained in
    /// input order.
    pub fn parse(text: &str) -> Self {
        let mut catalog = HolidayCatalog::default();

        for (idx, raw) in text.split('\n').enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<HolidayRecord>() {
                Ok(record) => catalog.records.push(record),
                Err(e) => {
                    log::warn!("Skipping holiday line {}: {}", idx + 1, e);
                    catalog.skipped.push(SkippedLine {
                        line_no: idx + 1,
                        content: line.to_owned(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Loaded {} holidays ({} lines skipped)",
            catalog.records.len(),
            catalog.skipped.len()
        );

        catalog
    }

    /// Reads a holiday file. An unreadable file yields an empty catalog so
    /// the calendar can still be shown.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) => {
                log::warn!("Could not read holidays from {}: {}", path.display(), e);
                HolidayCatalog::default()
            }
        }
    }

    pub fn is_holiday(&self, date: &NaiveDate) -> bool {
        self.records.iter().any(|record| record.matches(date))
    }

    pub fn records(&self) -> &[HolidayRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn recurring_holiday_ignores_year() {
        let catalog = HolidayCatalog::from_records(vec![HolidayRecord::new(ymd(2000, 12, 25), true)]);

        assert!(catalog.is_holiday(&ymd(2023, 12, 25)));
        assert!(catalog.is_holiday(&ymd(1999, 12, 25)));
        assert!(!catalog.is_holiday(&ymd(2023, 12, 24)));
    }

    #[test]
    fn onetime_holiday_needs_exact_year() {
        let catalog = HolidayCatalog::from_records(vec![HolidayRecord::new(ymd(2024, 1, 1), false)]);

        assert!(catalog.is_holiday(&ymd(2024, 1, 1)));
        assert!(!catalog.is_holiday(&ymd(2025, 1, 1)));
        assert!(!catalog.is_holiday(&ymd(2024, 1, 2)));
    }

    #[test]
    fn malformed_line_is_skipped() {
        let catalog = HolidayCatalog::parse("2024-01-01 false\nnot-a-date true\n2000-12-25 true\n");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.skipped().len(), 1);
        assert_eq!(catalog.skipped()[0].line_no, 2);
        assert_eq!(catalog.skipped()[0].content, "not-a-date true");

        assert!(catalog.is_holiday(&ymd(2024, 1, 1)));
        assert!(!catalog.is_holiday(&ymd(2025, 1, 1)));
        assert!(catalog.is_holiday(&ymd(1987, 12, 25)));
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let catalog = HolidayCatalog::parse("2000-12-25 true\r\n2024-05-01 false\r\n");

        assert_eq!(
            catalog.records(),
            &[
                HolidayRecord::new(ymd(2000, 12, 25), true),
                HolidayRecord::new(ymd(2024, 5, 1), false),
            ]
        );
    }

    #[test]
    fn missing_recurring_flag_is_an_error() {
        let err = "2024-01-01".parse::<HolidayRecord>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::HolidayParse));
    }

    #[test]
    fn anything_but_true_is_onetime() {
        let record: HolidayRecord = "2024-01-01 yes".parse().unwrap();
        assert!(!record.recurring);

        let record: HolidayRecord = "2024-01-01 true ".parse().unwrap();
        assert!(record.recurring);
    }

    #[test]
    fn rfc3339_dates_are_accepted() {
        let record: HolidayRecord = "2024-07-14T00:00:00+02:00 true".parse().unwrap();
        assert_eq!(record.date, ymd(2024, 7, 14));
    }

    #[test]
    fn blank_lines_are_not_reported() {
        let catalog = HolidayCatalog::parse("\n2024-01-01 true\n   \n");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.skipped().is_empty());
    }

    #[test]
    fn missing_file_gives_empty_catalog() {
        let catalog = HolidayCatalog::load(Path::new("/nonexistent/holipick/holidays.txt"));
        assert!(catalog.is_empty());
        assert!(!catalog.is_holiday(&ymd(2024, 12, 25)));
    }
}
