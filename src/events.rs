use chrono::NaiveDate;

/// Everything a presentation layer can report to the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    TogglePicker,
    InputClicked,
    ClickedOutside,
    /// New 0-based month. Values outside `0..12` roll into adjacent years.
    MonthChanged(i32),
    YearChanged(i32),
    DateTyped(String),
    /// Index into the currently shown grid.
    CellClicked(usize),
    DayPicked(NaiveDate),
}
