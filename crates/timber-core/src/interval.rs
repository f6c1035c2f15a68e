//! A single timing record: when work started and, once stopped, when it ended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::timevalue::TimeValue;

/// One contiguous span of tracked time on a task.
///
/// An interval is open while `end` is unset; the open interval on a task is
/// what makes that task running. In the stored document both instants
/// travel as fractional epoch seconds, `end` as a number or null.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(with = "epoch::required")]
    start: DateTime<Utc>,
    #[serde(with = "epoch::optional")]
    end: Option<DateTime<Utc>>,
}

impl Interval {
    /// Opens a new interval starting at `now` shifted by `offset`.
    ///
    /// The start instant itself is not validated; backdating arbitrarily
    /// far into the past or the future is permitted.
    #[must_use]
    pub fn open_at(now: DateTime<Utc>, offset: TimeValue) -> Self {
        Self {
            start: now + offset.to_duration(),
            end: None,
        }
    }

    /// Closes the interval at `now` shifted by `offset`.
    ///
    /// A recorded end is never moved: closing twice fails with
    /// [`Error::AlreadyClosed`]. An end landing before the start fails with
    /// [`Error::StopBeforeStart`], which reports how far back the offset
    /// could still legally reach.
    pub fn close_at(&mut self, now: DateTime<Utc>, offset: TimeValue) -> Result<()> {
        if self.end.is_some() {
            return Err(Error::AlreadyClosed);
        }
        let candidate = now + offset.to_duration();
        if candidate < self.start {
            return Err(Error::StopBeforeStart {
                max_backdate: TimeValue::between(now, self.start),
            });
        }
        self.end = Some(candidate);
        Ok(())
    }

    /// When the interval started.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// When the interval ended, if it has.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Whether the interval is still running.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// The span covered so far, measuring open intervals up to `now`.
    #[must_use]
    pub fn duration(&self, now: DateTime<Utc>) -> TimeValue {
        TimeValue::between(self.start, self.end.unwrap_or(now))
    }
}

/// Serde adapters for timestamps stored as fractional epoch seconds.
///
/// Loaded values are taken at face value; only timestamps that cannot be
/// represented at all (NaN, out of chrono's range) fail deserialization.
mod epoch {
    use chrono::{DateTime, Utc};

    #[allow(clippy::cast_precision_loss)]
    pub(super) fn to_f64(value: DateTime<Utc>) -> f64 {
        value.timestamp_micros() as f64 / 1_000_000.0
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(super) fn from_f64(seconds: f64) -> Option<DateTime<Utc>> {
        if !seconds.is_finite() {
            return None;
        }
        DateTime::from_timestamp_micros((seconds * 1_000_000.0) as i64)
    }

    pub mod required {
        use super::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &DateTime<Utc>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_f64(super::to_f64(*value))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<DateTime<Utc>, D::Error> {
            let seconds = f64::deserialize(deserializer)?;
            super::from_f64(seconds).ok_or_else(|| {
                serde::de::Error::custom(format!("timestamp {seconds} is out of range"))
            })
        }
    }

    pub mod optional {
        use super::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            value.map(super::to_f64).serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<f64>::deserialize(deserializer)? {
                None => Ok(None),
                Some(seconds) => super::from_f64(seconds).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("timestamp {seconds} is out of range"))
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::minutes(minutes)
    }

    fn offset(s: &str) -> TimeValue {
        s.parse().expect("valid offset")
    }

    #[test]
    fn open_applies_the_offset_to_now() {
        let interval = Interval::open_at(ts(10), offset("-10"));
        assert_eq!(interval.start(), ts(0));
        assert!(interval.is_open());
    }

    #[test]
    fn open_permits_future_starts() {
        let interval = Interval::open_at(ts(0), offset("1h"));
        assert_eq!(interval.start(), ts(60));
    }

    #[test]
    fn close_records_the_shifted_end() {
        let mut interval = Interval::open_at(ts(0), TimeValue::ZERO);
        interval.close_at(ts(30), offset("-5")).unwrap();
        assert_eq!(interval.end(), Some(ts(25)));
        assert!(!interval.is_open());
    }

    #[test]
    fn close_rejects_an_end_before_the_start() {
        let mut interval = Interval::open_at(ts(0), TimeValue::ZERO);
        let err = interval.close_at(ts(30), offset("-31")).unwrap_err();
        match err {
            Error::StopBeforeStart { max_backdate } => {
                // Thirty minutes after starting, the stop can be backdated
                // by at most thirty minutes.
                assert_eq!(max_backdate.to_string(), "-30.0m");
            }
            other => panic!("expected StopBeforeStart, got {other:?}"),
        }
        // The rejected close must not have recorded anything.
        assert!(interval.is_open());
    }

    #[test]
    fn close_accepts_an_end_equal_to_the_start() {
        let mut interval = Interval::open_at(ts(0), TimeValue::ZERO);
        interval.close_at(ts(30), offset("-30")).unwrap();
        assert_eq!(interval.end(), Some(ts(0)));
    }

    #[test]
    fn close_never_moves_a_recorded_end() {
        let mut interval = Interval::open_at(ts(0), TimeValue::ZERO);
        interval.close_at(ts(30), TimeValue::ZERO).unwrap();

        let err = interval.close_at(ts(40), offset("-20")).unwrap_err();
        assert!(matches!(err, Error::AlreadyClosed));
        assert_eq!(interval.end(), Some(ts(30)));
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "whole-minute spans are exact")]
    fn duration_of_an_open_interval_runs_to_now() {
        let interval = Interval::open_at(ts(0), TimeValue::ZERO);
        assert_eq!(interval.duration(ts(45)).seconds(), 2700.0);

        let mut closed = interval;
        closed.close_at(ts(20), TimeValue::ZERO).unwrap();
        // A closed interval ignores the clock.
        assert_eq!(closed.duration(ts(45)).seconds(), 1200.0);
    }

    // ========== Wire Format ==========

    #[test]
    fn serializes_as_fractional_epoch_seconds() {
        let mut interval = Interval::open_at(ts(0), TimeValue::ZERO);
        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, r#"{"start":1740830400.0,"end":null}"#);

        interval.close_at(ts(0), offset("90s")).unwrap();
        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, r#"{"start":1740830400.0,"end":1740830490.0}"#);
    }

    #[test]
    fn deserializes_fractional_timestamps() {
        let interval: Interval =
            serde_json::from_str(r#"{"start":1740830400.25,"end":null}"#).unwrap();
        assert_eq!(
            interval.start(),
            ts(0) + Duration::milliseconds(250)
        );
        assert!(interval.is_open());
    }

    #[test]
    fn deserializing_trusts_stored_instants() {
        // A hand-edited record with end before start loads untouched.
        let interval: Interval =
            serde_json::from_str(r#"{"start":2000.0,"end":1000.0}"#).unwrap();
        assert!(!interval.is_open());
        assert!(interval.end().unwrap() < interval.start());
    }

    #[test]
    fn deserializing_rejects_unrepresentable_timestamps() {
        let result = serde_json::from_str::<Interval>(r#"{"start":1e300,"end":null}"#);
        assert!(result.is_err());
    }
}
