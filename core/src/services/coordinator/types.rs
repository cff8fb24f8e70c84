//! Result types for the verification coordinator

use serde::Serialize;

use crate::domain::AttemptStatus;

/// Result of starting a verification attempt.
#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    /// Provider-reported status of the new attempt, passed through
    /// unchanged. Expected initial value is `pending`.
    pub status: AttemptStatus,
}

/// Result of checking a submitted code.
///
/// A non-approved status (`pending`, `rejected`, `expired`, or anything the
/// provider reports that we do not recognize) is the documented
/// not-yet-verified outcome, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteOutcome {
    /// Whether the check was approved and the phone binding written.
    pub approved: bool,
    /// Raw provider status the decision was based on.
    pub status: AttemptStatus,
}
