//! Verification coordinator
//!
//! Implements the two-step verification protocol against the provider and
//! directory client abstractions: `start_verification` begins an attempt,
//! `complete_verification` checks a submitted code and, on approval, binds
//! the verified phone number to the authenticated principal.

mod service;
mod types;

#[cfg(test)]
mod tests;

pub use service::VerificationCoordinator;
pub use types::{CompleteOutcome, StartOutcome};
