//! Week columns and month label positions

use chrono::Datelike;

use crate::types::{DayInfo, MonthStart, Week, MONTH_LABELS};

/// Days per grid column
pub const DAYS_PER_WEEK: usize = 7;

/// Split classified days into consecutive 7-day columns.
/// The last column is shorter when the day count is not a multiple of 7.
pub fn partition_weeks(days: Vec<DayInfo>) -> Vec<Week> {
    let mut weeks = Vec::with_capacity(days.len().div_ceil(DAYS_PER_WEEK));
    let mut iter = days.into_iter().peekable();
    while iter.peek().is_some() {
        weeks.push(Week(iter.by_ref().take(DAYS_PER_WEEK).collect()));
    }
    weeks
}

/// Week indices where a new month begins, for label placement
pub fn month_starts(weeks: &[Week]) -> Vec<MonthStart> {
    let mut starts = Vec::new();
    let mut prev_month: Option<u32> = None;

    for (week_index, week) in weeks.iter().enumerate() {
        let Some(day) = week.first_real_day() else {
            continue;
        };
        let month = day.date.month0();
        if prev_month != Some(month) {
            starts.push(MonthStart {
                label: MONTH_LABELS[month as usize],
                week_index,
            });
        }
        prev_month = Some(month);
    }
    starts
}
