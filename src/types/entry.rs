//! Entry, day key and completion map types

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::GridError;

/// Naive date-time layouts accepted for floating (zone-less) timestamps
const FLOATING_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// When an entry was completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTime {
    /// Absolute moment carrying its own offset (RFC 3339, epoch millis)
    Instant(DateTime<FixedOffset>),
    /// Wall-clock time with no zone, already local
    Floating(NaiveDateTime),
    /// Bare calendar day
    Day(NaiveDate),
}

impl EntryTime {
    /// Parse a textual timestamp. Returns None for anything unrecognised.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::Instant(dt));
        }

        for fmt in FLOATING_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Self::Floating(dt));
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self::Day)
    }

    /// Build from Unix epoch milliseconds
    pub fn from_millis(ms: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(ms).map(|dt| Self::Instant(dt.fixed_offset()))
    }

    /// Local calendar day in `tz`.
    ///
    /// Instants are moved into `tz` before the calendar fields are read;
    /// floating times and bare days are already local and taken as-is.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        match self {
            Self::Instant(dt) => dt.with_timezone(tz).date_naive(),
            Self::Floating(dt) => dt.date(),
            Self::Day(date) => *date,
        }
    }
}

impl fmt::Display for EntryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Floating(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Raw JSON shapes a timestamp may arrive in
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Text(String),
    Millis(i64),
    FloatMillis(f64),
    Other(IgnoredAny),
}

/// Lenient timestamp field: bad or missing values become None, never an error
fn deserialize_lenient_time<'de, D>(deserializer: D) -> Result<Option<EntryTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawTime> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTime::Text(s)) => EntryTime::parse(&s),
        Some(RawTime::Millis(ms)) => EntryTime::from_millis(ms),
        Some(RawTime::FloatMillis(ms)) if ms.is_finite() => EntryTime::from_millis(ms as i64),
        _ => None,
    })
}

/// A completed item. Only its timestamp matters to the grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Entry {
    #[serde(
        rename = "completedAt",
        alias = "completed_at",
        default,
        deserialize_with = "deserialize_lenient_time"
    )]
    pub completed_at: Option<EntryTime>,
}

impl Entry {
    pub fn new(completed_at: EntryTime) -> Self {
        Self {
            completed_at: Some(completed_at),
        }
    }

    /// Entry with no usable timestamp (skipped by aggregation)
    pub fn missing() -> Self {
        Self { completed_at: None }
    }

    /// Local day key of this entry, if it has a timestamp
    pub fn day_key<Tz: TimeZone>(&self, tz: &Tz) -> Option<DayKey> {
        self.completed_at.map(|t| DayKey::new(t.local_date(tz)))
    }
}

/// Canonical `YYYY-MM-DD` key of a local calendar day.
///
/// Ordering matches the lexicographic order of the rendered string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for DayKey {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| GridError::Parse(format!("invalid day key '{}': {}", s, e)))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Number of entries completed on each local day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionMap {
    counts: HashMap<DayKey, u32>,
}

impl CompletionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more entry on `key`
    pub fn increment(&mut self, key: DayKey) {
        let count = self.counts.entry(key).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Count for `key` (0 when absent)
    pub fn get(&self, key: DayKey) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Number of distinct days with at least one entry
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// (key, count) pairs in chronological order
    pub fn iter_sorted(&self) -> Vec<(DayKey, u32)> {
        let mut pairs: Vec<(DayKey, u32)> = self.counts.iter().map(|(&k, &c)| (k, c)).collect();
        pairs.sort_unstable_by_key(|&(k, _)| k);
        pairs
    }
}
