pub mod calendar;
pub mod config;
pub mod error;
pub mod events;
pub mod holiday;
pub mod picker;
pub mod ui;

pub use calendar::{format_date, parse_date, CalendarGrid, Day, DayCell, Selection, WeekStart};
pub use error::{Error, ErrorKind, Result};
pub use events::Event;
pub use holiday::{HolidayCatalog, HolidayRecord};
pub use picker::Picker;
