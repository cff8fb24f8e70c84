//! Verification route handlers
//!
//! One canonical route set for the two-step protocol:
//! - `POST /api/v1/verification/start` — begin an OTP attempt
//! - `POST /api/v1/verification/check` — submit the code (bearer credential
//!   required)

pub mod check;
pub mod start;

use std::sync::Arc;

use actix_web::web;

use pv_core::clients::{DirectoryClient, VerificationProvider};
use pv_core::services::VerificationCoordinator;

/// Application state shared by the verification handlers.
pub struct AppState<D, P>
where
    D: DirectoryClient,
    P: VerificationProvider,
{
    pub coordinator: Arc<VerificationCoordinator<D, P>>,
}

/// Register the verification routes.
pub fn configure<D, P>(cfg: &mut web::ServiceConfig)
where
    D: DirectoryClient + 'static,
    P: VerificationProvider + 'static,
{
    cfg.service(
        web::scope("/api/v1/verification")
            .route("/start", web::post().to(start::start_verification::<D, P>))
            .route("/check", web::post().to(check::check_verification::<D, P>)),
    );
}
