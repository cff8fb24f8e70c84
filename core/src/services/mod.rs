//! Business services

pub mod coordinator;

pub use coordinator::{CompleteOutcome, StartOutcome, VerificationCoordinator};
