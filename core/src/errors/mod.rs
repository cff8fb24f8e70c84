//! Error taxonomy for the verification coordinator.
//!
//! Every failure category surfaces to the caller as a typed result; nothing
//! is retried or swallowed inside the core. A non-approved check is not an
//! error at all — it is carried in the success outcome with the raw provider
//! status.

use thiserror::Error;

/// Errors returned by the verification coordinator.
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// Missing or malformed caller input. Recovered locally; no external
    /// system is ever called on this path.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The caller's credential failed resolution (missing, malformed,
    /// expired, or invalid). Aborts before any provider call so
    /// unauthenticated code guessing cannot burn provider quota.
    #[error("credential could not be authenticated")]
    Unauthenticated,

    /// The provider rejected or failed the start call. Carries the
    /// provider's message verbatim; not retried here.
    #[error("verification start failed: {message}")]
    VerificationStartFailed { message: String },

    /// The provider rejected or failed the check call. Carries the
    /// provider's message verbatim; not retried here.
    #[error("verification check failed: {message}")]
    VerificationCheckFailed { message: String },

    /// The phone binding write failed. No claim write was attempted, so the
    /// directory is unchanged for claims.
    #[error("phone binding write failed: {message}")]
    DirectoryWriteFailed { message: String },

    /// The binding write succeeded but the claim read-modify-write did not.
    /// The directory is left binding-present / claim-stale; an operator can
    /// repair by re-deriving the claim from the binding. Reported distinctly
    /// so the partial state is never masked as a generic failure.
    #[error("phone binding recorded but claim update failed: {message}")]
    ClaimUpdateFailed { message: String },
}

impl CoordinatorError {
    /// Stable machine-readable code for transport-layer mapping.
    pub fn code(&self) -> &'static str {
        match self {
            CoordinatorError::InvalidInput { .. } => "INVALID_INPUT",
            CoordinatorError::Unauthenticated => "UNAUTHENTICATED",
            CoordinatorError::VerificationStartFailed { .. } => "VERIFICATION_START_FAILED",
            CoordinatorError::VerificationCheckFailed { .. } => "VERIFICATION_CHECK_FAILED",
            CoordinatorError::DirectoryWriteFailed { .. } => "DIRECTORY_WRITE_FAILED",
            CoordinatorError::ClaimUpdateFailed { .. } => "CLAIM_UPDATE_FAILED",
        }
    }
}

pub type VerificationResult<T> = Result<T, CoordinatorError>;

/// Errors surfaced by an identity directory client.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The credential could not be resolved to a principal.
    #[error("credential rejected: {reason}")]
    InvalidCredential { reason: String },

    /// The directory could not be reached or refused the request.
    #[error("directory request failed: {message}")]
    Unavailable { message: String },
}

/// Error surfaced by a verification provider client, carrying the provider's
/// own message verbatim.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
