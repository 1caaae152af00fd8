//! Time units used to scale reported rates and durations.
//!
//! Rates arrive as events per second and durations as nanoseconds. A unit
//! renders as its upper-case name (`MILLISECONDS`), which is also the suffix
//! used in record names.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AimetricsError, Result};

/// Granularity used to scale reported rates and durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Nanoseconds in one unit.
    pub const fn nanos_per_unit(self) -> u64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
        }
    }

    /// Length of one unit in seconds (fractional below a second).
    pub fn seconds_per_unit(self) -> f64 {
        self.nanos_per_unit() as f64 / 1e9
    }

    /// Scale a per-second rate to a per-`self` rate.
    pub fn convert_rate(self, per_second: f64) -> f64 {
        per_second * self.seconds_per_unit()
    }

    /// Scale a nanosecond duration to `self`.
    pub fn convert_duration(self, nanos: f64) -> f64 {
        nanos / self.nanos_per_unit() as f64
    }

    /// Upper-case unit name, as used in record suffixes.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "NANOSECONDS",
            TimeUnit::Microseconds => "MICROSECONDS",
            TimeUnit::Milliseconds => "MILLISECONDS",
            TimeUnit::Seconds => "SECONDS",
            TimeUnit::Minutes => "MINUTES",
            TimeUnit::Hours => "HOURS",
            TimeUnit::Days => "DAYS",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = AimetricsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ns" | "nanos" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "micros" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "millis" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hours" => Ok(TimeUnit::Hours),
            "d" | "days" => Ok(TimeUnit::Days),
            _ => Err(AimetricsError::UnknownUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = AimetricsError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}
