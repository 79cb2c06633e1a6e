//! Displayed-year state with clamped navigation

use chrono::{Datelike, NaiveDate};

/// Year shown by the grid. Never moves past the real current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCursor {
    year: i32,
    current_year: i32,
}

impl YearCursor {
    /// Start at `year`, clamped to today's year
    pub fn new(year: i32, today: NaiveDate) -> Self {
        let current_year = today.year();
        Self {
            year: year.min(current_year),
            current_year,
        }
    }

    /// Start at today's year
    pub fn current(today: NaiveDate) -> Self {
        Self::new(today.year(), today)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn is_current_year(self) -> bool {
        self.year == self.current_year
    }

    /// Next year is unavailable once the current year is shown
    pub fn is_next_disabled(self) -> bool {
        self.year >= self.current_year
    }

    /// Show the previous year
    pub fn prev(&mut self) {
        self.year = self.year.saturating_sub(1);
    }

    /// Show the next year; ignored when already at the current year.
    /// Returns whether the year changed.
    pub fn next(&mut self) -> bool {
        if self.is_next_disabled() {
            return false;
        }
        self.year += 1;
        true
    }
}
