//! # PhoneVerify Core
//!
//! Domain layer for the PhoneVerify backend. This crate contains the domain
//! entities, the client trait abstractions for the two external systems
//! (verification provider and identity directory), the verification
//! coordinator, and the error taxonomy. It performs no I/O of its own; the
//! concrete clients live in `pv_infra`.

pub mod clients;
pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use clients::*;
pub use domain::*;
pub use errors::*;
pub use services::*;
