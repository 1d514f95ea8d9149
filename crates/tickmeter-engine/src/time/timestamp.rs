use std::fmt;
use std::time::Duration;

/// Monotonic frame-tick timestamp.
///
/// Measured from an arbitrary per-clock origin. Only differences between two
/// timestamps of the same clock are meaningful.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    pub const fn from_duration(since_origin: Duration) -> Self {
        Self(since_origin)
    }

    /// Builds a timestamp from floating-point seconds.
    ///
    /// Negative and NaN inputs saturate to zero, infinite inputs to `Duration::MAX`.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }

    pub const fn since_origin(self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Time elapsed from `earlier` to `self`, or `None` if `earlier` is later.
    pub fn checked_since(self, earlier: Timestamp) -> Option<Duration> {
        self.0.checked_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.0.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_secs_saturates_non_positive() {
        assert_eq!(Timestamp::from_secs_f64(-1.0), Timestamp::ZERO);
        assert_eq!(Timestamp::from_secs_f64(f64::NAN), Timestamp::ZERO);
    }

    #[test]
    fn checked_since_orders() {
        let a = Timestamp::from_secs_f64(0.25);
        let b = Timestamp::from_secs_f64(1.0);
        assert_eq!(b.checked_since(a), Some(Duration::from_millis(750)));
        assert_eq!(a.checked_since(b), None);
    }
}
