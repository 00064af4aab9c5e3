//! Millisecond timestamps and durations.
//!
//! Both types hold a non-negative millisecond count that fits in an `i64`,
//! which is the range the wire format can carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PrimitivesError;

const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

// ---------------------------------------------------------------------------
// TimeStamp
// ---------------------------------------------------------------------------

/// Milliseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TimeStamp(i64);

impl TimeStamp {
    pub const ZERO: TimeStamp = TimeStamp(0);
    pub const MAX: TimeStamp = TimeStamp(i64::MAX);

    /// # Returns
    /// `Some(TimeStamp)` when `millis` is non-negative.
    pub fn from_millis(millis: i64) -> Option<Self> {
        if millis >= 0 {
            Some(TimeStamp(millis))
        } else {
            None
        }
    }

    /// # Panics
    /// Panics when `millis` is negative.
    pub fn unchecked(millis: i64) -> Self {
        assert!(millis >= 0, "negative timestamp: {}", millis);
        TimeStamp(millis)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        TimeStamp(millis)
    }

    pub const fn millis(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn plus_millis(&self, millis: i64) -> Option<TimeStamp> {
        self.0.checked_add(millis).and_then(TimeStamp::from_millis)
    }

    pub fn plus_seconds(&self, seconds: i64) -> Option<TimeStamp> {
        seconds
            .checked_mul(MILLIS_PER_SECOND)
            .and_then(|millis| self.plus_millis(millis))
    }

    pub fn plus_minutes(&self, minutes: i64) -> Option<TimeStamp> {
        minutes
            .checked_mul(MILLIS_PER_MINUTE)
            .and_then(|millis| self.plus_millis(millis))
    }

    pub fn plus_hours(&self, hours: i64) -> Option<TimeStamp> {
        hours
            .checked_mul(MILLIS_PER_HOUR)
            .and_then(|millis| self.plus_millis(millis))
    }

    /// # Panics
    /// Panics when the result is negative or overflows.
    pub fn plus_millis_unchecked(&self, millis: i64) -> TimeStamp {
        self.plus_millis(millis)
            .unwrap_or_else(|| panic!("timestamp out of range: {} + {}ms", self.0, millis))
    }

    pub fn plus_seconds_unchecked(&self, seconds: i64) -> TimeStamp {
        self.plus_seconds(seconds)
            .unwrap_or_else(|| panic!("timestamp out of range: {} + {}s", self.0, seconds))
    }

    pub fn plus_minutes_unchecked(&self, minutes: i64) -> TimeStamp {
        self.plus_minutes(minutes)
            .unwrap_or_else(|| panic!("timestamp out of range: {} + {}m", self.0, minutes))
    }

    pub fn plus_hours_unchecked(&self, hours: i64) -> TimeStamp {
        self.plus_hours(hours)
            .unwrap_or_else(|| panic!("timestamp out of range: {} + {}h", self.0, hours))
    }

    pub fn add(&self, duration: Duration) -> Option<TimeStamp> {
        self.plus_millis(duration.0)
    }

    pub fn add_unchecked(&self, duration: Duration) -> TimeStamp {
        self.plus_millis_unchecked(duration.0)
    }

    pub fn sub(&self, duration: Duration) -> Option<TimeStamp> {
        TimeStamp::from_millis(self.0 - duration.0)
    }

    /// # Panics
    /// Panics when `duration` reaches before the epoch.
    pub fn sub_unchecked(&self, duration: Duration) -> TimeStamp {
        self.sub(duration)
            .unwrap_or_else(|| panic!("timestamp underflow: {} - {}ms", self.0, duration.0))
    }

    /// Time elapsed from `earlier` to `self`.
    ///
    /// # Returns
    /// `None` when `earlier` is after `self`.
    pub fn delta(&self, earlier: TimeStamp) -> Option<Duration> {
        Duration::from_millis(self.0 - earlier.0)
    }

    /// # Panics
    /// Panics when `earlier` is after `self`.
    pub fn delta_unchecked(&self, earlier: TimeStamp) -> Duration {
        Duration::unchecked(self.0 - earlier.0)
    }

    pub fn is_before(&self, that: TimeStamp) -> bool {
        self.0 < that.0
    }
}

impl TryFrom<i64> for TimeStamp {
    type Error = PrimitivesError;

    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        TimeStamp::from_millis(millis)
            .ok_or_else(|| PrimitivesError::OutOfRange(format!("negative timestamp {}", millis)))
    }
}

impl From<TimeStamp> for i64 {
    fn from(ts: TimeStamp) -> i64 {
        ts.0
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl fmt::Debug for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeStamp({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// A non-negative span of milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub fn from_millis(millis: i64) -> Option<Self> {
        if millis >= 0 {
            Some(Duration(millis))
        } else {
            None
        }
    }

    /// # Panics
    /// Panics when `millis` is negative.
    pub fn unchecked(millis: i64) -> Self {
        assert!(millis >= 0, "negative duration: {}", millis);
        Duration(millis)
    }

    pub fn of_seconds(seconds: i64) -> Option<Self> {
        seconds
            .checked_mul(MILLIS_PER_SECOND)
            .and_then(Duration::from_millis)
    }

    pub fn of_minutes(minutes: i64) -> Option<Self> {
        minutes
            .checked_mul(MILLIS_PER_MINUTE)
            .and_then(Duration::from_millis)
    }

    pub fn of_hours(hours: i64) -> Option<Self> {
        hours.checked_mul(MILLIS_PER_HOUR).and_then(Duration::from_millis)
    }

    pub const fn millis(&self) -> i64 {
        self.0
    }

    pub fn add(&self, that: Duration) -> Option<Duration> {
        self.0.checked_add(that.0).map(Duration)
    }

    pub fn sub(&self, that: Duration) -> Option<Duration> {
        Duration::from_millis(self.0 - that.0)
    }

    pub fn mul(&self, n: i64) -> Option<Duration> {
        self.0.checked_mul(n).and_then(Duration::from_millis)
    }

    pub fn div(&self, n: i64) -> Option<Duration> {
        self.0.checked_div(n).and_then(Duration::from_millis)
    }
}

impl TryFrom<i64> for Duration {
    type Error = PrimitivesError;

    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        Duration::from_millis(millis)
            .ok_or_else(|| PrimitivesError::OutOfRange(format!("negative duration {}", millis)))
    }
}

impl From<Duration> for i64 {
    fn from(d: Duration) -> i64 {
        d.0
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}ms)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_rejects_negative() {
        assert!(TimeStamp::from_millis(-1).is_none());
        assert_eq!(TimeStamp::from_millis(0), Some(TimeStamp::ZERO));
        assert!(TimeStamp::ZERO.is_zero());
    }

    #[test]
    fn test_plus_units() {
        let ts = TimeStamp::unchecked(1_000);
        assert_eq!(ts.plus_millis(5), Some(TimeStamp::unchecked(1_005)));
        assert_eq!(ts.plus_seconds(2), Some(TimeStamp::unchecked(3_000)));
        assert_eq!(ts.plus_minutes(1), Some(TimeStamp::unchecked(61_000)));
        assert_eq!(ts.plus_hours(1), Some(TimeStamp::unchecked(3_601_000)));
        assert!(ts.plus_millis(-1_001).is_none());
        assert!(TimeStamp::MAX.plus_millis(1).is_none());
        assert!(ts.plus_hours(i64::MAX).is_none());
    }

    #[test]
    fn test_duration_arithmetic() {
        let ts = TimeStamp::unchecked(10_000);
        let d = Duration::of_seconds(4).unwrap();
        assert_eq!(ts.add(d), Some(TimeStamp::unchecked(14_000)));
        assert_eq!(ts.sub(d), Some(TimeStamp::unchecked(6_000)));
        assert!(TimeStamp::unchecked(3_000).sub(d).is_none());
        assert_eq!(ts.delta(TimeStamp::unchecked(4_000)), Duration::from_millis(6_000));
        assert!(TimeStamp::unchecked(4_000).delta(ts).is_none());
    }

    #[test]
    fn test_is_before() {
        assert!(TimeStamp::unchecked(1).is_before(TimeStamp::unchecked(2)));
        assert!(!TimeStamp::unchecked(2).is_before(TimeStamp::unchecked(2)));
    }

    #[test]
    #[should_panic]
    fn test_delta_unchecked_panics() {
        let _ = TimeStamp::ZERO.delta_unchecked(TimeStamp::unchecked(1));
    }

    #[test]
    fn test_now_is_after_epoch() {
        assert!(TimeStamp::ZERO.is_before(TimeStamp::now()));
    }
}
