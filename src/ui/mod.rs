pub mod monthview;

pub use monthview::{MonthView, Theme};
