use thiserror::Error;

/// Structural-validation failures for the checked transform entry point.
///
/// The default transform clamps instead of rejecting; these errors surface
/// only from `compute_next_state_checked`, which refuses to run the stages
/// on inconsistent input rather than silently repairing it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("timesCorrect ({correct}) exceeds timesEncountered ({encountered})")]
    InconsistentCounts { correct: u32, encountered: u32 },

    #[error("reviewInterval must be >= 1")]
    ZeroInterval,

    #[error("{field} is not finite ({value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("responseTimeMs must be >= 0 (got {0})")]
    NegativeResponseTime(i64),
}
