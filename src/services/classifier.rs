//! Day classifier: turns a date range and counts into grid cells

use chrono::{Datelike, NaiveDate};

use super::range::DateRange;
use crate::types::{CompletionMap, DayInfo, DayKey, Level, LevelThresholds};

/// Classify every day of `range` for the displayed `year`.
///
/// Days after `today` are left out entirely when `year` is the current
/// year. Days of other years become [`Level::Padding`] whatever their count.
pub fn classify(
    range: &DateRange,
    completions: &CompletionMap,
    thresholds: LevelThresholds,
    year: i32,
    today: NaiveDate,
) -> Vec<DayInfo> {
    let is_current_year = year == today.year();
    let today_key = DayKey::new(today);

    let mut days = Vec::with_capacity(range.len_days());
    for date in range.days() {
        let key = DayKey::new(date);
        if is_current_year && key > today_key {
            continue;
        }

        let count = completions.get(key);
        let level = if date.year() != year {
            Level::Padding
        } else {
            thresholds.level_for(count)
        };

        days.push(DayInfo {
            date,
            key,
            level,
            count,
        });
    }
    days
}
