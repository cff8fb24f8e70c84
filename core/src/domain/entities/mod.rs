//! Domain entities

pub mod attempt;
pub mod binding;
pub mod phone_number;

pub use attempt::{AttemptStatus, Channel};
pub use binding::{PhoneBinding, Principal, PHONE_VERIFIED_CLAIM};
pub use phone_number::PhoneNumber;
