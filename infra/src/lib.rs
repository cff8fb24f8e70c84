//! # Infrastructure Layer
//!
//! Concrete client implementations for the PhoneVerify backend:
//!
//! - **Verify**: Twilio Verify v2 REST client implementing
//!   `pv_core::VerificationProvider`
//! - **Directory**: Google Identity Platform / Firestore REST client
//!   implementing `pv_core::DirectoryClient`
//!
//! Both are constructed once at startup (`from_env`) and injected into the
//! coordinator; nothing here holds process-global state.

use thiserror::Error;

/// Identity directory implementations
pub mod directory;

/// Verification provider implementations
pub mod verify;

/// Infrastructure-local errors, mapped into the core client error types at
/// the trait boundary.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),
}
