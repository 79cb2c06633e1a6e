//! Keyboard cursor over the grid cells

use chrono::NaiveDate;

use super::builder::ContributionGrid;
use crate::types::DayKey;

/// Highlighted (week column, weekday row) cell.
///
/// Moves in calendar order: a week step is seven days, a day step wraps
/// into the neighbouring week. Padding cells can be highlighted but never
/// activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCursor {
    week: usize,
    day: usize,
}

impl GridCursor {
    pub fn new(week: usize, day: usize) -> Self {
        Self { week, day }
    }

    /// Start on `today` when it is a day of the shown year, otherwise on the
    /// last day of the year
    pub fn initial(grid: &ContributionGrid, today: NaiveDate) -> Self {
        let last_of_year = NaiveDate::from_ymd_opt(grid.year, 12, 31).map(DayKey::new);
        let shown = |key: DayKey| {
            grid.position_of(key)
                .filter(|&(week, day)| grid.activate(week, day).is_some())
        };
        shown(DayKey::new(today))
            .or_else(|| last_of_year.and_then(shown))
            .map(|(week, day)| Self { week, day })
            .unwrap_or_else(|| Self::last(grid))
    }

    /// Last drawn cell of the grid
    pub fn last(grid: &ContributionGrid) -> Self {
        let Some(week) = grid.week_count().checked_sub(1) else {
            return Self::default();
        };
        let day = grid.weeks[week].len().saturating_sub(1);
        Self { week, day }
    }

    pub fn week(self) -> usize {
        self.week
    }

    pub fn day(self) -> usize {
        self.day
    }

    pub fn position(self) -> (usize, usize) {
        (self.week, self.day)
    }

    /// Move by `delta` days, stopping at the first and last drawn cells
    pub fn step(&mut self, delta: isize, grid: &ContributionGrid) {
        let last = Self::last(grid);
        let max = last.week * 7 + last.day;
        let index = (self.week * 7 + self.day) as isize + delta;
        let index = index.clamp(0, max as isize) as usize;
        self.week = index / 7;
        self.day = index % 7;
    }

    /// Move by `delta` weeks, keeping the weekday when possible
    pub fn step_weeks(&mut self, delta: isize, grid: &ContributionGrid) {
        self.step(delta * 7, grid);
    }

    /// Key under the cursor if it can be activated
    pub fn activate(self, grid: &ContributionGrid) -> Option<DayKey> {
        grid.activate(self.week, self.day)
    }
}
