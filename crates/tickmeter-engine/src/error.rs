use crate::time::ClockError;

/// Errors surfaced by the counter lifecycle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FpsError {
    /// The reporting interval was not a positive, finite number of seconds.
    #[error("invalid reporting interval: {0} s (must be positive and finite)")]
    InvalidConfiguration(f64),

    /// The frame clock refused the tick subscription.
    #[error("frame clock unavailable: {0}")]
    ClockSourceUnavailable(#[from] ClockError),
}
