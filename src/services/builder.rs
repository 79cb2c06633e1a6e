//! Grid builder: counts in, week columns and month labels out

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

use super::classifier::classify;
use super::layout::{month_starts, partition_weeks};
use super::range::DateRange;
use crate::types::{CompletionMap, DayInfo, DayKey, LevelThresholds, MonthStart, Week};

/// Everything the grid view needs for one displayed year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionGrid {
    pub year: i32,
    #[serde(flatten)]
    pub range: DateRange,
    pub weeks: Vec<Week>,
    pub month_starts: Vec<MonthStart>,
}

impl ContributionGrid {
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// Cell at (week column, weekday row)
    pub fn cell(&self, week: usize, day: usize) -> Option<&DayInfo> {
        self.weeks.get(week).and_then(|w| w.get(day))
    }

    /// Look up a day by key
    pub fn day(&self, key: DayKey) -> Option<&DayInfo> {
        self.position_of(key).and_then(|(w, d)| self.cell(w, d))
    }

    /// (week column, weekday row) of `key`, if shown
    pub fn position_of(&self, key: DayKey) -> Option<(usize, usize)> {
        let date = key.date();
        if !self.range.contains(date) {
            return None;
        }
        let offset = (date - self.range.start).num_days() as usize;
        let (week, day) = (offset / 7, offset % 7);
        self.cell(week, day).map(|_| (week, day))
    }

    /// Key of the cell when it may be activated (padding never is)
    pub fn activate(&self, week: usize, day: usize) -> Option<DayKey> {
        self.cell(week, day)
            .filter(|d| !d.is_padding())
            .map(|d| d.key)
    }

    /// Days of the displayed year with at least one completion
    pub fn active_days(&self) -> usize {
        self.days().filter(|d| !d.is_padding() && d.count > 0).count()
    }

    /// Completions on days of the displayed year
    pub fn total_count(&self) -> u64 {
        self.days()
            .filter(|d| !d.is_padding())
            .map(|d| u64::from(d.count))
            .sum()
    }

    fn days(&self) -> impl Iterator<Item = &DayInfo> {
        self.weeks.iter().flat_map(|w| w.days().iter())
    }
}

/// Builds a [`ContributionGrid`] from completion counts
#[derive(Debug, Clone, Copy, Default)]
pub struct GridBuilder {
    thresholds: LevelThresholds,
}

impl GridBuilder {
    pub fn new(thresholds: LevelThresholds) -> Self {
        if !thresholds.is_ascending() {
            warn!(
                thresholds = %thresholds,
                "level thresholds are not ascending; later thresholds override earlier ones"
            );
        }
        Self { thresholds }
    }

    pub fn thresholds(&self) -> LevelThresholds {
        self.thresholds
    }

    /// Build the grid for `year` as seen on `today`.
    /// Returns an empty grid for years chrono cannot represent.
    pub fn build(&self, completions: &CompletionMap, year: i32, today: NaiveDate) -> ContributionGrid {
        let Some(range) = DateRange::for_year(year, today) else {
            warn!(year, "year out of range, building empty grid");
            return ContributionGrid {
                year,
                range: DateRange {
                    start: today,
                    end: today,
                },
                weeks: Vec::new(),
                month_starts: Vec::new(),
            };
        };

        let days = classify(&range, completions, self.thresholds, year, today);
        let weeks = partition_weeks(days);
        let month_starts = month_starts(&weeks);

        debug!(
            year,
            current = year == today.year(),
            weeks = weeks.len(),
            months = month_starts.len(),
            "built contribution grid"
        );

        ContributionGrid {
            year,
            range,
            weeks,
            month_starts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Aggregator;
    use crate::types::{Entry, EntryTime, Level};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::new(date(y, m, d))
    }

    fn sample_map() -> CompletionMap {
        let mut entries: Vec<Entry> = (0..3)
            .map(|_| Entry::new(EntryTime::Day(date(2024, 1, 15))))
            .collect();
        entries.push(Entry::new(EntryTime::Day(date(2024, 1, 16))));
        entries.push(Entry::missing());
        Aggregator::completions(&entries, &Utc)
    }

    #[test]
    fn test_build_past_year() {
        let grid = GridBuilder::default().build(&sample_map(), 2024, date(2026, 10, 17));

        assert_eq!(grid.year, 2024);
        assert_eq!(grid.week_count(), 53);
        assert_eq!(grid.month_starts.len(), 12);

        let d = grid.day(key(2024, 1, 15)).unwrap();
        assert_eq!((d.count, d.level), (3, Level::L2));
        let d = grid.day(key(2024, 1, 16)).unwrap();
        assert_eq!((d.count, d.level), (1, Level::L1));

        assert_eq!(grid.total_count(), 4);
        assert_eq!(grid.active_days(), 2);
    }

    #[test]
    fn test_build_empty_entries_all_zero() {
        let grid = GridBuilder::default().build(&CompletionMap::new(), 2023, date(2026, 1, 1));
        assert_eq!(grid.total_count(), 0);
        for week in &grid.weeks {
            for day in week.days() {
                assert_eq!(day.count, 0);
                assert!(matches!(day.level, Level::Empty | Level::Padding));
            }
        }
    }

    #[test]
    fn test_build_current_year_has_no_future() {
        let today = date(2024, 6, 15);
        let grid = GridBuilder::default().build(&CompletionMap::new(), 2024, today);

        assert!(grid.day(key(2024, 6, 16)).is_none());
        assert!(grid.day(key(2024, 6, 15)).is_some());
        // Saturday: final week has 6 days
        assert_eq!(grid.weeks.last().unwrap().len(), 6);
    }

    #[test]
    fn test_position_of() {
        let grid = GridBuilder::default().build(&CompletionMap::new(), 2024, date(2026, 1, 1));
        assert_eq!(grid.position_of(key(2024, 1, 1)), Some((0, 0)));
        assert_eq!(grid.position_of(key(2024, 1, 15)), Some((2, 0)));
        assert_eq!(grid.position_of(key(2024, 1, 7)), Some((0, 6)));
        assert_eq!(grid.position_of(key(2023, 6, 1)), None);
    }

    #[test]
    fn test_activate_ignores_padding() {
        // 2025 starts on a Wednesday; Mon/Tue of week 0 are 2024 padding
        let grid = GridBuilder::default().build(&CompletionMap::new(), 2025, date(2026, 1, 1));
        assert_eq!(grid.activate(0, 0), None);
        assert_eq!(grid.activate(0, 1), None);
        assert_eq!(grid.activate(0, 2), Some(key(2025, 1, 1)));
        assert_eq!(grid.activate(999, 0), None);
    }

    #[test]
    fn test_grid_json_shape() {
        let grid = GridBuilder::default().build(&sample_map(), 2024, date(2026, 1, 1));
        let json = serde_json::to_value(&grid).unwrap();

        assert_eq!(json["year"], 2024);
        assert_eq!(json["start"], "2024-01-01");
        assert_eq!(json["end"], "2025-01-05");
        assert_eq!(json["weeks"][2][0]["date"], "2024-01-15");
        assert_eq!(json["weeks"][2][0]["count"], 3);
        assert_eq!(json["weeks"][2][0]["level"], 2);
        assert_eq!(json["monthStarts"][0]["label"], "Jan");
        assert_eq!(json["monthStarts"][0]["weekIndex"], 0);
    }

    #[test]
    fn test_misordered_thresholds_still_build() {
        let builder = GridBuilder::new(LevelThresholds::new(6, 4, 2, 1));
        let grid = builder.build(&sample_map(), 2024, date(2026, 1, 1));
        // count 3: >=6 no, >=4 no, >=2 -> 3, >=1 -> 4
        assert_eq!(grid.day(key(2024, 1, 15)).unwrap().level, Level::L4);
    }
}
