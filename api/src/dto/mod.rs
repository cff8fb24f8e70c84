//! Request and response DTOs

pub mod error;
pub mod verification;
