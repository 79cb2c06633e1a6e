//! Grid cell, week and label types

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use super::{DayKey, GridError};

/// Weekday row labels, Monday first
pub const DAY_LABELS: [&str; 7] = ["M", "T", "W", "T", "F", "S", "S"];

/// Month column labels, January first
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Activity bucket of a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Day outside the displayed year, shown only for alignment
    Padding,
    /// No activity
    Empty,
    L1,
    L2,
    L3,
    L4,
}

impl Level {
    /// Levels a legend shows, least to most
    pub const SCALE: [Level; 5] = [Level::Empty, Level::L1, Level::L2, Level::L3, Level::L4];

    /// Numeric value: -1 for padding, 0..=4 otherwise
    pub fn value(self) -> i8 {
        match self {
            Self::Padding => -1,
            Self::Empty => 0,
            Self::L1 => 1,
            Self::L2 => 2,
            Self::L3 => 3,
            Self::L4 => 4,
        }
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Padding),
            0 => Some(Self::Empty),
            1 => Some(Self::L1),
            2 => Some(Self::L2),
            3 => Some(Self::L3),
            4 => Some(Self::L4),
            _ => None,
        }
    }

    pub fn is_padding(self) -> bool {
        self == Self::Padding
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

/// Minimum counts for levels 1 through 4.
///
/// No ordering is enforced: each threshold is checked in turn and a later
/// match overrides an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelThresholds(pub [u32; 4]);

impl Default for LevelThresholds {
    fn default() -> Self {
        Self([1, 2, 4, 6])
    }
}

impl LevelThresholds {
    pub fn new(t1: u32, t2: u32, t3: u32, t4: u32) -> Self {
        Self([t1, t2, t3, t4])
    }

    /// Bucket a count
    pub fn level_for(self, count: u32) -> Level {
        let [t1, t2, t3, t4] = self.0;
        let mut level = Level::Empty;
        if count >= t1 {
            level = Level::L1;
        }
        if count >= t2 {
            level = Level::L2;
        }
        if count >= t3 {
            level = Level::L3;
        }
        if count >= t4 {
            level = Level::L4;
        }
        level
    }

    /// Whether thresholds never decrease from t1 to t4
    pub fn is_ascending(self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }
}

impl fmt::Display for LevelThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [t1, t2, t3, t4] = self.0;
        write!(f, "{},{},{},{}", t1, t2, t3, t4)
    }
}

impl FromStr for LevelThresholds {
    type Err = GridError;

    /// Parse "1,2,4,6"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim().parse::<u32>().map_err(|e| {
                    GridError::Parse(format!("invalid threshold '{}': {}", part.trim(), e))
                })
            })
            .collect::<Result<Vec<u32>, GridError>>()?;

        let values: [u32; 4] = values.try_into().map_err(|v: Vec<u32>| {
            GridError::Parse(format!("expected 4 thresholds, got {}", v.len()))
        })?;
        Ok(Self(values))
    }
}

/// One classified day of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayInfo {
    #[serde(skip_serializing)]
    pub date: NaiveDate,
    #[serde(rename = "date")]
    pub key: DayKey,
    pub level: Level,
    pub count: u32,
}

impl DayInfo {
    pub fn is_padding(&self) -> bool {
        self.level.is_padding()
    }
}

/// A grid column: up to 7 consecutive days, Monday first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Week(pub Vec<DayInfo>);

impl Week {
    pub fn days(&self) -> &[DayInfo] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DayInfo> {
        self.0.get(index)
    }

    /// First non-padding day, falling back to the first day
    pub fn first_real_day(&self) -> Option<&DayInfo> {
        self.0
            .iter()
            .find(|d| !d.is_padding())
            .or_else(|| self.0.first())
    }
}

/// Week column where a month label goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStart {
    pub label: &'static str,
    pub week_index: usize,
}
