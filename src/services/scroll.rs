//! Horizontal scroll position of the week columns

use chrono::{Datelike, NaiveDate};

use super::range::monday_on_or_before;

/// Weeks of history kept to the left of today when scrolling the current year
const LEAD_WEEKS: usize = 10;

/// First visible week column when a year is opened.
///
/// The current year is scrolled so today sits about ten weeks from the left
/// edge; past years are scrolled to the end.
pub fn initial_scroll(
    year: i32,
    today: NaiveDate,
    total_weeks: usize,
    visible_weeks: usize,
) -> usize {
    let max_offset = total_weeks.saturating_sub(visible_weeks);
    if year != today.year() {
        return max_offset;
    }

    let grid_start = NaiveDate::from_ymd_opt(year, 1, 1).and_then(monday_on_or_before);
    let weeks_since_start = grid_start
        .map(|start| (today - start).num_days().max(0) as usize / 7)
        .unwrap_or(0);

    weeks_since_start.saturating_sub(LEAD_WEEKS).min(max_offset)
}

/// Adjust `offset` so `column` stays inside the visible window
pub fn keep_visible(offset: usize, column: usize, visible_weeks: usize) -> usize {
    if visible_weeks == 0 {
        return column;
    }
    if column < offset {
        column
    } else if column >= offset + visible_weeks {
        column + 1 - visible_weeks
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_past_year_scrolls_to_end() {
        assert_eq!(initial_scroll(2023, date(2024, 6, 15), 53, 20), 33);
    }

    #[test]
    fn test_past_year_fits_on_screen() {
        assert_eq!(initial_scroll(2023, date(2024, 6, 15), 53, 60), 0);
    }

    #[test]
    fn test_current_year_keeps_ten_weeks_of_history() {
        // 2024-06-15 is 166 days after Mon 2024-01-01: week 23
        let today = date(2024, 6, 15);
        assert_eq!(initial_scroll(2024, today, 24, 5), 13);
    }

    #[test]
    fn test_current_year_early_january() {
        let today = date(2024, 2, 1);
        assert_eq!(initial_scroll(2024, today, 5, 2), 0);
    }

    #[test]
    fn test_current_year_never_past_end() {
        let today = date(2024, 6, 15);
        assert_eq!(initial_scroll(2024, today, 24, 20), 4);
    }

    #[test]
    fn test_keep_visible() {
        assert_eq!(keep_visible(10, 5, 8), 5);
        assert_eq!(keep_visible(10, 12, 8), 10);
        assert_eq!(keep_visible(10, 17, 8), 10);
        assert_eq!(keep_visible(10, 18, 8), 11);
        assert_eq!(keep_visible(3, 7, 0), 7);
    }
}
