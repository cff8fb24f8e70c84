//! Verification provider implementations

pub mod twilio;

pub use twilio::{TwilioVerifyClient, TwilioVerifyConfig};
