//! Error handling for route handlers

pub mod error;
