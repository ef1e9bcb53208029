use chrono::{Datelike, Month, NaiveDate, Weekday};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::{terminated, tuple},
    IResult,
};
use num_traits::FromPrimitive;
use serde::Deserialize;
use std::iter;
use std::slice::Chunks;

use crate::error::{Error, ErrorKind, Result};
use crate::holiday::HolidayCatalog;

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
const DAYS_PER_WEEK: usize = 7;

pub fn days_of_month(month: &Month, year: i32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)?;
    let next = if month.number_from_month() == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1)
    }?;

    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Rolls a 0-based month outside of `0..12` into the neighbouring years.
pub fn normalize_month(year: i32, month: i32) -> Result<(i32, u32)> {
    let year = year.checked_add(month.div_euclid(12)).ok_or_else(|| {
        Error::new(
            ErrorKind::DateOutOfRange,
            &format!("month {} of year {} overflows", month, year),
        )
    })?;

    Ok((year, month.rem_euclid(12) as u32))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    Sunday,
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Monday
    }
}

impl WeekStart {
    /// Number of padding cells in front of a month whose first day is `weekday`.
    pub fn leading_blanks(&self, weekday: Weekday) -> usize {
        match self {
            WeekStart::Monday => weekday.num_days_from_monday() as usize,
            WeekStart::Sunday => weekday.num_days_from_sunday() as usize,
        }
    }

    pub fn labels(&self) -> [&'static str; 7] {
        match self {
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
    pub is_holiday: bool,
    pub is_sunday: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    Empty,
    Day(Day),
}

impl DayCell {
    pub fn day(&self) -> Option<&Day> {
        match self {
            DayCell::Day(day) => Some(day),
            DayCell::Empty => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.day().map(|day| day.date)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DayCell::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    year: i32,
    month: u32,
    week_start: WeekStart,
    cells: Vec<DayCell>,
}

impl CalendarGrid {
    pub fn build(year: i32, month: i32, catalog: &HolidayCatalog) -> Result<Self> {
        Self::build_with(year, month, catalog, WeekStart::default())
    }

    /// Builds the cells of a month. `month` is 0-based and normalized first,
    /// so `(2023, 12)` yields January 2024.
    pub fn build_with(
        year: i32,
        month: i32,
        catalog: &HolidayCatalog,
        week_start: WeekStart,
    ) -> Result<Self> {
        let (year, month) = normalize_month(year, month)?;
        let out_of_range = || {
            Error::new(
                ErrorKind::DateOutOfRange,
                &format!("{}-{:02} is not a representable month", year, month + 1),
            )
        };

        let start = NaiveDate::from_ymd_opt(year, month + 1, 1).ok_or_else(out_of_range)?;
        let len = Month::from_u32(month + 1)
            .and_then(|m| days_of_month(&m, year))
            .ok_or_else(out_of_range)?;

        let cells = iter::repeat(DayCell::Empty)
            .take(week_start.leading_blanks(start.weekday()))
            .chain(start.iter_days().take(len as usize).map(|date| {
                DayCell::Day(Day {
                    date,
                    is_holiday: catalog.is_holiday(&date),
                    is_sunday: date.weekday() == Weekday::Sun,
                })
            }))
            .collect();

        log::debug!("Built calendar grid for {}-{:02}", year, month + 1);

        Ok(CalendarGrid {
            year,
            month,
            week_start,
            cells,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 0-based month.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn weeks(&self) -> Chunks<'_, DayCell> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn title(&self) -> String {
        match Month::from_u32(self.month + 1) {
            Some(month) => format!("{} {}", month.name(), self.year),
            None => self.year.to_string(),
        }
    }

    pub fn locate(&self, date: &NaiveDate) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| cell.date().as_ref() == Some(date))
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }
}

/// The picked date and where it sits in the currently shown grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    date: Option<NaiveDate>,
    index: Option<usize>,
}

impl Selection {
    /// Does not rebuild `grid`. Build the grid for `date`'s month first if
    /// the index should resolve.
    pub fn select(&mut self, date: NaiveDate, grid: &CalendarGrid) {
        self.date = Some(date);
        self.relocate(grid);
    }

    pub fn relocate(&mut self, grid: &CalendarGrid) {
        self.index = self.date.and_then(|date| grid.locate(&date));
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

fn two_digits(input: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(1, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })(input)
}

fn four_digits(input: &str) -> IResult<&str, i32> {
    map_res(take_while_m_n(4, 4, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<i32>()
    })(input)
}

fn date_parts(input: &str) -> IResult<&str, (u32, u32, i32)> {
    all_consuming(tuple((
        terminated(two_digits, char('/')),
        terminated(two_digits, char('/')),
        four_digits,
    )))(input)
}

/// Parses `DD/MM/YYYY`. Impossible dates like `31/02/2024` are rejected
/// instead of rolling over into the next month.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let (_, (day, month, year)) = date_parts(text.trim())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::new(
            ErrorKind::DateParse,
            &format!("'{}' is not a valid calendar date", text.trim()),
        )
    })
}
