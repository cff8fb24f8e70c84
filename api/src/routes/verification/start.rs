use actix_web::{web, HttpResponse};
use validator::Validate;

use pv_core::clients::{DirectoryClient, VerificationProvider};
use pv_core::domain::Channel;

use crate::dto::verification::{StartVerificationRequest, StartVerificationResponse};
use crate::handlers::error::{handle_coordinator_error, validation_failed};

use super::AppState;

/// Handler for `POST /api/v1/verification/start`
///
/// Begins an OTP verification attempt for the given phone number. The
/// channel defaults to SMS when omitted.
///
/// # Request Body
///
/// ```json
/// { "phone": "+15551234567", "channel": "sms" }
/// ```
///
/// # Responses
/// - 200 OK: `{ "status": "pending" }` (provider status passed through)
/// - 400 Bad Request: invalid phone or unknown channel
/// - 502 Bad Gateway: the provider rejected or failed the start call
pub async fn start_verification<D, P>(
    state: web::Data<AppState<D, P>>,
    request: web::Json<StartVerificationRequest>,
) -> HttpResponse
where
    D: DirectoryClient + 'static,
    P: VerificationProvider + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failed(errors);
    }

    // The DTO validator already vetted the channel name.
    let channel = request.channel.as_deref().and_then(Channel::parse);

    match state
        .coordinator
        .start_verification(&request.phone, channel)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(StartVerificationResponse {
            status: outcome.status,
        }),
        Err(error) => handle_coordinator_error(error),
    }
}
