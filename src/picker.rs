use chrono::{Datelike, NaiveDate};
use log;

use crate::calendar::{format_date, parse_date, CalendarGrid, DayCell, Selection, WeekStart};
use crate::error::Result;
use crate::events::Event;
use crate::holiday::HolidayCatalog;

/// State of a date picker: the shown month, the picked date, the text of the
/// date field and whether the calendar popup is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    visible: bool,
    grid: CalendarGrid,
    selection: Selection,
    input: String,
}

impl Picker {
    pub fn new(today: NaiveDate, catalog: &HolidayCatalog, week_start: WeekStart) -> Result<Self> {
        let grid =
            CalendarGrid::build_with(today.year(), today.month0() as i32, catalog, week_start)?;

        Ok(Picker {
            visible: false,
            grid,
            selection: Selection::default(),
            input: String::new(),
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn grid(&self) -> &CalendarGrid {
        &self.grid
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn update(mut self, event: Event, catalog: &HolidayCatalog) -> Self {
        match event {
            Event::TogglePicker => {
                self.visible = !self.visible;
                self
            }
            Event::InputClicked | Event::ClickedOutside => {
                self.visible = false;
                self
            }
            Event::MonthChanged(month) => {
                let year = self.grid.year();
                self.show_month(year, month, catalog)
            }
            Event::YearChanged(year) => {
                let month = self.grid.month() as i32;
                self.show_month(year, month, catalog)
            }
            Event::DateTyped(text) => match parse_date(&text) {
                Ok(date) => self.pick(date, catalog),
                Err(e) => {
                    log::debug!("Ignoring date input '{}': {}", text, e);
                    self
                }
            },
            Event::CellClicked(index) => {
                let clicked = self.grid.cells().get(index).and_then(DayCell::date);
                match clicked {
                    Some(date) => self.pick(date, catalog),
                    None => self,
                }
            }
            Event::DayPicked(date) => self.pick(date, catalog),
        }
    }

    fn show_month(mut self, year: i32, month: i32, catalog: &HolidayCatalog) -> Self {
        match CalendarGrid::build_with(year, month, catalog, self.grid.week_start()) {
            Ok(grid) => {
                self.grid = grid;
                self.selection.relocate(&self.grid);
            }
            Err(e) => log::warn!("Keeping {}: {}", self.grid.title(), e),
        }
        self
    }

    fn pick(mut self, date: NaiveDate, catalog: &HolidayCatalog) -> Self {
        if !self.grid.contains(&date) {
            self = self.show_month(date.year(), date.month0() as i32, catalog);
        }

        self.selection.select(date, &self.grid);
        self.input = format_date(&date);
        self.visible = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::HolidayRecord;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> HolidayCatalog {
        HolidayCatalog::from_records(vec![HolidayRecord::new(ymd(2000, 12, 25), true)])
    }

    fn picker() -> Picker {
        Picker::new(ymd(2024, 3, 15), &catalog(), WeekStart::Monday).unwrap()
    }

    #[test]
    fn starts_closed_on_current_month() {
        let picker = picker();
        assert!(!picker.is_visible());
        assert_eq!((picker.grid().year(), picker.grid().month()), (2024, 2));
        assert_eq!(picker.selection().date(), None);
        assert_eq!(picker.input(), "");
    }

    #[test]
    fn toggle_and_close() {
        let catalog = catalog();
        let picker = picker().update(Event::TogglePicker, &catalog);
        assert!(picker.is_visible());

        let closed = picker.clone().update(Event::ClickedOutside, &catalog);
        assert!(!closed.is_visible());

        let closed = picker.clone().update(Event::InputClicked, &catalog);
        assert!(!closed.is_visible());

        let closed = picker.update(Event::TogglePicker, &catalog);
        assert!(!closed.is_visible());
        assert!(!closed.clone().update(Event::InputClicked, &catalog).is_visible());
    }

    #[test]
    fn navigation_keeps_popup_open_and_relocates_selection() {
        let catalog = catalog();
        let picker = picker()
            .update(Event::DayPicked(ymd(2024, 3, 5)), &catalog)
            .update(Event::TogglePicker, &catalog)
            .update(Event::MonthChanged(3), &catalog);

        assert!(picker.is_visible());
        assert_eq!((picker.grid().year(), picker.grid().month()), (2024, 3));
        assert_eq!(picker.selection().date(), Some(ymd(2024, 3, 5)));
        assert_eq!(picker.selection().index(), None);

        let picker = picker.update(Event::MonthChanged(2), &catalog);
        assert_eq!(picker.selection().index(), Some(8));

        let picker = picker.update(Event::YearChanged(2023), &catalog);
        assert_eq!((picker.grid().year(), picker.grid().month()), (2023, 2));
        assert_eq!(picker.selection().index(), None);
    }

    #[test]
    fn month_change_rolls_over_year() {
        let picker = picker().update(Event::MonthChanged(12), &catalog());
        assert_eq!((picker.grid().year(), picker.grid().month()), (2025, 0));
    }

    #[test]
    fn typed_date_jumps_and_closes() {
        let catalog = catalog();
        let picker = picker()
            .update(Event::TogglePicker, &catalog)
            .update(Event::DateTyped("25/12/2023".to_owned()), &catalog);

        assert!(!picker.is_visible());
        assert_eq!((picker.grid().year(), picker.grid().month()), (2023, 11));
        assert_eq!(picker.input(), "25/12/2023");

        let index = picker.selection().index().unwrap();
        let day = picker.grid().cells()[index].day().copied().unwrap();
        assert_eq!(day.date, ymd(2023, 12, 25));
        assert!(day.is_holiday);
    }

    #[test]
    fn invalid_typed_date_changes_nothing() {
        let catalog = catalog();
        let before = picker().update(Event::TogglePicker, &catalog);

        for text in &["31/02/2024", "tomorrow", "2024-03-05"] {
            let after = before
                .clone()
                .update(Event::DateTyped((*text).to_owned()), &catalog);
            assert_eq!(after, before);
        }
    }

    #[test]
    fn clicking_cells() {
        let catalog = catalog();
        let picker = picker().update(Event::TogglePicker, &catalog);

        // March 2024 has four leading blanks
        let unchanged = picker.clone().update(Event::CellClicked(0), &catalog);
        assert_eq!(unchanged, picker);

        let unchanged = picker.clone().update(Event::CellClicked(100), &catalog);
        assert_eq!(unchanged, picker);

        let picked = picker.update(Event::CellClicked(4), &catalog);
        assert!(!picked.is_visible());
        assert_eq!(picked.selection().date(), Some(ymd(2024, 3, 1)));
        assert_eq!(picked.selection().index(), Some(4));
        assert_eq!(picked.input(), "01/03/2024");
    }

    #[test]
    fn picking_a_day_in_another_month_rebuilds() {
        let picker = picker().update(Event::DayPicked(ymd(2024, 9, 1)), &catalog());
        assert_eq!((picker.grid().year(), picker.grid().month()), (2024, 8));
        assert_eq!(picker.selection().index(), Some(6));
    }
}
