//! Mapping from coordinator errors to HTTP responses.
//!
//! The coordinator returns typed errors; this is the one place they become
//! user-visible responses. Provider failures map to 502 because this service
//! acts as a gateway to the provider; the two directory-write failures map
//! to 500 so the distinct `CLAIM_UPDATE_FAILED` code remains visible to
//! operators watching for the binding-present/claim-stale state.

use actix_web::{http::StatusCode, HttpResponse};

use pv_core::errors::CoordinatorError;

use crate::dto::error::ErrorResponse;

pub fn status_for(error: &CoordinatorError) -> StatusCode {
    match error {
        CoordinatorError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        CoordinatorError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CoordinatorError::VerificationStartFailed { .. }
        | CoordinatorError::VerificationCheckFailed { .. } => StatusCode::BAD_GATEWAY,
        CoordinatorError::DirectoryWriteFailed { .. }
        | CoordinatorError::ClaimUpdateFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn handle_coordinator_error(error: CoordinatorError) -> HttpResponse {
    HttpResponse::build(status_for(&error)).json(ErrorResponse::new(error.code(), &error))
}

/// 401 for requests that never reached the coordinator because no bearer
/// credential was supplied.
pub fn missing_credential() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(
        CoordinatorError::Unauthenticated.code(),
        "missing or malformed Authorization header",
    ))
}

/// 400 for request bodies that fail DTO validation.
pub fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("INVALID_INPUT", errors))
}
