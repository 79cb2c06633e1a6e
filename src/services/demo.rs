//! Generated sample data for trying the grid without real files

use chrono::{Duration, NaiveDateTime};

use crate::types::{Entry, EntryTime};

/// Days of history in the demo set
pub const DEMO_DAYS: usize = 90;

/// Entries for the last 90 days ending at `now`, with 1 to 8 per day
/// (`(i % 8) + 1` on the day `i` days back).
pub fn demo_entries(now: NaiveDateTime) -> Vec<Entry> {
    (0..DEMO_DAYS)
        .flat_map(|i| {
            let at = now - Duration::days(i as i64);
            let count = (i % 8) + 1;
            std::iter::repeat(Entry::new(EntryTime::Floating(at))).take(count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Aggregator;
    use crate::types::DayKey;
    use chrono::{NaiveDate, Utc};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_demo_entry_count() {
        // 90 days of (i % 8) + 1: eleven full cycles of 36 plus 1 + 2
        assert_eq!(demo_entries(now()).len(), 11 * 36 + 3);
    }

    #[test]
    fn test_demo_counts_per_day() {
        let map = Aggregator::completions(&demo_entries(now()), &Utc);
        let today = now().date();

        assert_eq!(map.len(), DEMO_DAYS);
        assert_eq!(map.get(DayKey::new(today)), 1);
        assert_eq!(map.get(DayKey::new(today - Duration::days(1))), 2);
        assert_eq!(map.get(DayKey::new(today - Duration::days(7))), 8);
        assert_eq!(map.get(DayKey::new(today - Duration::days(8))), 1);
        assert_eq!(map.get(DayKey::new(today - Duration::days(90))), 0);
    }
}
