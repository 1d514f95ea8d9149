use std::time::Duration;

use crate::error::FpsError;

/// How often the counter emits a report.
///
/// Always strictly positive; construction rejects anything else.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ReportingInterval(Duration);

impl ReportingInterval {
    pub const DEFAULT: ReportingInterval = ReportingInterval(Duration::from_secs(1));

    pub fn new(interval: Duration) -> Result<Self, FpsError> {
        if interval.is_zero() {
            return Err(FpsError::InvalidConfiguration(0.0));
        }
        Ok(Self(interval))
    }

    pub fn from_secs_f64(secs: f64) -> Result<Self, FpsError> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(FpsError::InvalidConfiguration(secs));
        }
        let interval = Duration::try_from_secs_f64(secs).map_err(|_| FpsError::InvalidConfiguration(secs))?;
        Self::new(interval).map_err(|_| FpsError::InvalidConfiguration(secs))
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for ReportingInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<Duration> for ReportingInterval {
    type Error = FpsError;

    fn try_from(interval: Duration) -> Result<Self, Self::Error> {
        Self::new(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_second() {
        assert_eq!(ReportingInterval::default().as_duration(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_non_positive_and_non_finite() {
        for secs in [0.0, -0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                matches!(ReportingInterval::from_secs_f64(secs), Err(FpsError::InvalidConfiguration(_))),
                "{secs} should be rejected"
            );
        }
        assert!(ReportingInterval::new(Duration::ZERO).is_err());
    }

    #[test]
    fn rejects_values_that_round_to_zero() {
        // Below one nanosecond.
        assert!(ReportingInterval::from_secs_f64(1e-12).is_err());
    }

    #[test]
    fn accepts_fractional_seconds() {
        let interval = ReportingInterval::from_secs_f64(0.5).unwrap();
        assert_eq!(interval.as_duration(), Duration::from_millis(500));
    }
}
