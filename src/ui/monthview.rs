use chrono::Datelike;
use itertools::Itertools;
use std::fmt;
use termion::{color, style};

use crate::calendar::{CalendarGrid, DayCell, Selection};

const CELL_WIDTH: usize = 4;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub header_color: color::AnsiValue,
    pub holiday_color: color::AnsiValue,
    pub sunday_color: color::AnsiValue,
    pub focus_bg_color: color::AnsiValue,
    pub holiday_symbol: Option<char>,
    pub focus_symbol: Option<char>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            header_color: color::AnsiValue(3),
            holiday_color: color::AnsiValue(1),
            sunday_color: color::AnsiValue(9),
            focus_bg_color: color::AnsiValue(4),
            holiday_symbol: Some('*'),
            focus_symbol: Some('<'),
        }
    }
}

/// Renders a month grid as text, one row per week.
pub struct MonthView<'a> {
    grid: &'a CalendarGrid,
    selection: &'a Selection,
    theme: Theme,
    colored: bool,
}

impl<'a> MonthView<'a> {
    pub fn new(grid: &'a CalendarGrid, selection: &'a Selection) -> Self {
        MonthView {
            grid,
            selection,
            theme: Theme::default(),
            colored: false,
        }
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn render_cell(&self, index: usize, cell: &DayCell) -> String {
        let day = match cell.day() {
            Some(day) => day,
            None => return " ".repeat(CELL_WIDTH),
        };

        let focused = self.selection.index() == Some(index);
        let symbol = if focused {
            self.theme.focus_symbol
        } else if day.is_holiday {
            self.theme.holiday_symbol
        } else {
            None
        };

        let text = format!("{:>2}{}", day.date.day(), symbol.unwrap_or(' '));

        if !self.colored {
            return format!("{} ", text);
        }

        let mut styled = String::new();
        if focused {
            styled.push_str(&color::Bg(self.theme.focus_bg_color).to_string());
        }
        if day.is_holiday {
            styled.push_str(&color::Fg(self.theme.holiday_color).to_string());
        } else if day.is_sunday {
            styled.push_str(&color::Fg(self.theme.sunday_color).to_string());
        }
        styled.push_str(&text);
        styled.push_str(&style::Reset.to_string());
        styled.push(' ');
        styled
    }
}

impl fmt::Display for MonthView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = CELL_WIDTH * 7;
        let title = format!("{:^width$}", self.grid.title(), width = width);
        let labels = self
            .grid
            .week_start()
            .labels()
            .iter()
            .map(|label| format!("{:<width$}", label, width = CELL_WIDTH))
            .join("");

        if self.colored {
            writeln!(
                f,
                "{}{}{}",
                color::Fg(self.theme.header_color),
                title.trim_end(),
                style::Reset
            )?;
        } else {
            writeln!(f, "{}", title.trim_end())?;
        }
        writeln!(f, "{}", labels.trim_end())?;

        for (row, week) in self.grid.weeks().enumerate() {
            let line = week
                .iter()
                .enumerate()
                .map(|(col, cell)| self.render_cell(row * 7 + col, cell))
                .join("");
            writeln!(f, "{}", line.trim_end())?;
        }

        Ok(())
    }
}
