//! # PhoneVerify API
//!
//! actix-web transport for the verification coordinator: request/response
//! DTOs, the two verification routes, error-to-HTTP mapping, and CORS.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
