//! Visible date window for a displayed year

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// Inclusive range of days shown by the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Window for `year`: the Monday on/before Jan 1 through the Sunday on/after
    /// today (current year) or Dec 31 (any other year).
    ///
    /// Returns None only for years chrono cannot represent.
    pub fn for_year(year: i32, today: NaiveDate) -> Option<Self> {
        let start_of_year = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let start = monday_on_or_before(start_of_year)?;

        let last_visible = if year == today.year() {
            today
        } else {
            NaiveDate::from_ymd_opt(year, 12, 31)?
        };
        let end = sunday_on_or_after(last_visible)?;

        Some(Self { start, end })
    }

    /// Every day of the range in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Number of days in the range
    pub fn len_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Shift back to Monday (0 days if already Monday, 6 if Sunday)
pub fn monday_on_or_before(date: NaiveDate) -> Option<NaiveDate> {
    // Sunday=0..Saturday=6
    let weekday = date.weekday().num_days_from_sunday();
    let back = if weekday == 0 { 6 } else { weekday - 1 };
    date.checked_sub_days(Days::new(u64::from(back)))
}

/// Shift forward to Sunday (0 days if already Sunday)
pub fn sunday_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
    let weekday = date.weekday().num_days_from_sunday();
    let forward = if weekday == 0 { 0 } else { 7 - weekday };
    date.checked_add_days(Days::new(u64::from(forward)))
}
