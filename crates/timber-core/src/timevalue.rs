//! Signed time quantities with a compact textual form.
//!
//! A [`TimeValue`] is the unit of currency for offsets and durations: the
//! shell accepts values like `10m` or `-2h` to backdate a start or stop,
//! and reports accumulated time through the same type's display rules.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::error::Error;

/// Pre-compiled grammar for textual time values: signed digits plus an
/// optional unit suffix.
static TIME_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+)([smh])?$").unwrap());

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// A signed quantity of time, stored as fractional seconds.
///
/// Parsing accepts `<digits>` with an optional leading `-` and an optional
/// unit suffix (`s`, `m`, `h`); the unit defaults to minutes, and empty or
/// all-whitespace input reads as zero. Display picks the largest unit that
/// keeps the magnitude readable and always shows one fractional digit, so
/// `90` seconds renders as `1.5m` and `-15` seconds as `-15.0s`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct TimeValue(f64);

impl TimeValue {
    /// Zero seconds.
    pub const ZERO: Self = Self(0.0);

    /// Wraps a raw quantity of seconds.
    #[must_use]
    pub const fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    /// The signed span from `earlier` to `later`.
    #[allow(clippy::cast_precision_loss)]
    pub fn between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> Self {
        let span = later.signed_duration_since(earlier);
        let micros = span
            .num_microseconds()
            .unwrap_or_else(|| span.num_milliseconds().saturating_mul(1000));
        Self(micros as f64 / 1_000_000.0)
    }

    /// The quantity in seconds.
    #[must_use]
    pub const fn seconds(self) -> f64 {
        self.0
    }

    /// Returns this value plus `seconds`.
    #[must_use]
    pub const fn add(self, seconds: f64) -> Self {
        Self(self.0 + seconds)
    }

    /// Returns this value minus `seconds`.
    #[must_use]
    pub const fn subtract(self, seconds: f64) -> Self {
        Self(self.0 - seconds)
    }

    /// Converts to a [`chrono::Duration`] with microsecond precision, for
    /// applying this value as an offset to an instant.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn to_duration(self) -> Duration {
        Duration::microseconds((self.0 * 1_000_000.0) as i64)
    }
}

impl FromStr for TimeValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }

        let Some(caps) = TIME_VALUE_RE.captures(trimmed) else {
            return Err(Error::Parse {
                input: trimmed.to_string(),
            });
        };

        let coefficient: f64 = caps[1].parse().map_err(|_| Error::Parse {
            input: trimmed.to_string(),
        })?;
        let unit = match caps.get(2).map(|m| m.as_str()) {
            Some("s") => 1.0,
            Some("h") => SECONDS_PER_HOUR,
            // The grammar only admits s/m/h; minutes is also the default.
            _ => SECONDS_PER_MINUTE,
        };

        Ok(Self(coefficient * unit))
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.abs();
        let (scaled, unit) = if magnitude < 90.0 {
            (self.0, "s")
        } else if magnitude < 90.0 * SECONDS_PER_MINUTE {
            (self.0 / SECONDS_PER_MINUTE, "m")
        } else if magnitude < 30.0 * SECONDS_PER_HOUR {
            (self.0 / SECONDS_PER_HOUR, "h")
        } else {
            (self.0 / SECONDS_PER_DAY, "d")
        };
        write!(f, "{scaled:.1}{unit}")
    }
}
