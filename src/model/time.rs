//! Simulation time: hours, minutes, seconds since the start of the script.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point on the simulation clock.
///
/// Parts are not range-checked: `Time::new(0, 90, 0)` is ninety minutes in,
/// and negative parts subtract. Ordering and equality go through
/// [`Time::to_seconds`], so `Time::new(0, 1, 0) == Time::new(0, 0, 60)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    pub hrs: i64,
    pub mins: i64,
    pub secs: i64,
}

impl Time {
    pub const fn new(hrs: i64, mins: i64, secs: i64) -> Self {
        Self { hrs, mins, secs }
    }

    /// Splits a raw second count into hours, minutes and seconds.
    pub const fn from_seconds(seconds: i64) -> Self {
        Self {
            hrs: seconds / 3600,
            mins: seconds % 3600 / 60,
            secs: seconds % 60,
        }
    }

    /// Total seconds: `secs + 60 * mins + 3600 * hrs`, saturating at the
    /// ends of `i64`. Parsed times never saturate.
    pub const fn to_seconds(self) -> i64 {
        self.secs
            .saturating_add(self.mins.saturating_mul(60))
            .saturating_add(self.hrs.saturating_mul(3600))
    }

    /// Total seconds, or `None` if the parts overflow `i64`.
    pub const fn checked_seconds(self) -> Option<i64> {
        let Some(mins) = self.mins.checked_mul(60) else {
            return None;
        };
        let Some(hrs) = self.hrs.checked_mul(3600) else {
            return None;
        };
        let Some(partial) = self.secs.checked_add(mins) else {
            return None;
        };
        partial.checked_add(hrs)
    }
}

/// Formats a raw second count as `HH:MM:SS`.
///
/// Negative counts keep their sign on each nonzero part, so `-1` formats
/// as `00:00:-1` and `-3661` as `-1:-1:-1`.
pub fn format_seconds(seconds: i64) -> String {
    Time::from_seconds(seconds).to_string()
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.to_seconds() == other.to_seconds()
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_seconds().cmp(&other.to_seconds())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hrs, self.mins, self.secs)
    }
}

/// Error returned when a clock reading can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time '{0}': expected HH:MM:SS, MM:SS, or a number of seconds")]
pub struct TimeParseError(String);

impl FromStr for Time {
    type Err = TimeParseError;

    /// Accepts `HH:MM:SS`, `MM:SS`, or a bare second count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeParseError(s.to_string());
        let parts = s
            .trim()
            .split(':')
            .map(|p| p.parse::<i64>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;

        let time = match parts[..] {
            [secs] => Self::from_seconds(secs),
            [mins, secs] => Self::new(0, mins, secs),
            [hrs, mins, secs] => Self::new(hrs, mins, secs),
            _ => return Err(err()),
        };
        time.checked_seconds().map(|_| time).ok_or_else(err)
    }
}

// Authored scripts write times the way the notebook displays them.
impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
