//! Aggregator service for counting completions per local day

use chrono::{Local, TimeZone};

use crate::types::{CompletionMap, DayKey, Entry};

/// Aggregator for computing per-day completion counts
pub struct Aggregator;

impl Aggregator {
    /// Count entries per local calendar day in `tz`.
    /// Entries without a timestamp are skipped.
    pub fn completions<Tz: TimeZone>(entries: &[Entry], tz: &Tz) -> CompletionMap {
        let mut map = CompletionMap::new();
        for key in entries.iter().filter_map(|e| e.day_key(tz)) {
            map.increment(key);
        }
        map
    }

    /// Count entries per day in the system time zone
    pub fn completions_local(entries: &[Entry]) -> CompletionMap {
        Self::completions(entries, &Local)
    }

    /// Entries that fall on `key`, in input order
    pub fn entries_on<'a, Tz: TimeZone>(
        entries: &'a [Entry],
        key: DayKey,
        tz: &Tz,
    ) -> Vec<&'a Entry> {
        entries
            .iter()
            .filter(|e| e.day_key(tz) == Some(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryTime;
    use chrono::{FixedOffset, NaiveDate, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(s: &str) -> Entry {
        Entry::new(EntryTime::parse(s).unwrap())
    }

    // ========== completions() tests ==========

    #[test]
    fn test_completions_empty() {
        let map = Aggregator::completions(&[], &Utc);
        assert!(map.is_empty());
        assert_eq!(map.total(), 0);
    }

    #[test]
    fn test_completions_same_day_different_times() {
        let entries = vec![
            at("2024-01-15T00:00:01"),
            at("2024-01-15T12:00:00"),
            at("2024-01-15T23:59:59"),
            at("2024-01-16T08:00:00"),
        ];
        let map = Aggregator::completions(&entries, &Utc);

        assert_eq!(map.get(DayKey::new(date(2024, 1, 15))), 3);
        assert_eq!(map.get(DayKey::new(date(2024, 1, 16))), 1);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_completions_skip_missing_timestamps() {
        let entries = vec![
            Entry::missing(),
            at("2024-01-15"),
            Entry::missing(),
            at("2024-01-15T09:00:00Z"),
        ];
        let map = Aggregator::completions(&entries, &Utc);

        assert_eq!(map.total(), 2);
        assert_eq!(map.get(DayKey::new(date(2024, 1, 15))), 2);
    }

    #[test]
    fn test_completions_total_equals_valid_entries() {
        let mut entries = Vec::new();
        for i in 0..200u32 {
            if i % 7 == 0 {
                entries.push(Entry::missing());
            } else {
                let d = date(2024, 1, 1) + chrono::Days::new(u64::from(i % 45));
                entries.push(Entry::new(EntryTime::Day(d)));
            }
        }
        let valid = entries.iter().filter(|e| e.completed_at.is_some()).count();
        let map = Aggregator::completions(&entries, &Utc);
        assert_eq!(map.total(), valid as u64);
    }

    #[test]
    fn test_completions_use_local_calendar_day() {
        // 2024-01-15T20:00Z is already the 16th in UTC+9
        let entries = vec![at("2024-01-15T20:00:00Z")];
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        let utc_map = Aggregator::completions(&entries, &Utc);
        let tokyo_map = Aggregator::completions(&entries, &tokyo);

        assert_eq!(utc_map.get(DayKey::new(date(2024, 1, 15))), 1);
        assert_eq!(tokyo_map.get(DayKey::new(date(2024, 1, 16))), 1);
        assert_eq!(tokyo_map.get(DayKey::new(date(2024, 1, 15))), 0);
    }

    #[test]
    fn test_completions_order_insensitive() {
        let a = vec![at("2024-02-01"), at("2024-02-02"), at("2024-02-01")];
        let b = vec![at("2024-02-01"), at("2024-02-01"), at("2024-02-02")];
        assert_eq!(
            Aggregator::completions(&a, &Utc),
            Aggregator::completions(&b, &Utc)
        );
    }

    // ========== entries_on() tests ==========

    #[test]
    fn test_entries_on() {
        let entries = vec![
            at("2024-03-01T10:00:00"),
            at("2024-03-02T10:00:00"),
            at("2024-03-01T18:00:00"),
            Entry::missing(),
        ];
        let key = DayKey::new(date(2024, 3, 1));
        let found = Aggregator::entries_on(&entries, key, &Utc);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0], &entries[0]);
        assert_eq!(found[1], &entries[2]);
    }
}
