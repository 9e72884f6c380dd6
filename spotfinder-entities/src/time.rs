use std::{
    fmt,
    ops::{Add, Sub},
};

use time::{Duration, OffsetDateTime};

/// Unix timestamp with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn now() -> Self {
        OffsetDateTime::now_utc().into()
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    pub const fn as_secs(self) -> i64 {
        self.0.div_euclid(1_000)
    }

    /// Elapsed time since `earlier`, saturating at zero.
    pub fn duration_since(self, earlier: Self) -> Duration {
        Duration::milliseconds(self.0.saturating_sub(earlier.0).max(0))
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(from: OffsetDateTime) -> Self {
        let millis = from.unix_timestamp_nanos() / 1_000_000;
        Self(millis as i64)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs.whole_milliseconds() as i64))
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        Self(self.0.saturating_sub(rhs.whole_milliseconds() as i64))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * 1_000_000) {
            Ok(dt) => write!(f, "{dt}"),
            Err(_) => write!(f, "{}ms", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_subtract_durations() {
        let t = Timestamp::from_millis(1_000);
        assert_eq!((t + Duration::minutes(30)).as_millis(), 1_801_000);
        assert_eq!((t - Duration::seconds(1)).as_millis(), 0);
    }

    #[test]
    fn duration_since_saturates() {
        let t1 = Timestamp::from_millis(5_000);
        let t2 = Timestamp::from_millis(2_000);
        assert_eq!(t1.duration_since(t2), Duration::seconds(3));
        assert_eq!(t2.duration_since(t1), Duration::ZERO);
    }

    #[test]
    fn now_is_after_epoch() {
        assert!(Timestamp::now() > Timestamp::from_millis(0));
    }
}
