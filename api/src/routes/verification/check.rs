use actix_web::{http::header, web, HttpRequest, HttpResponse};
use validator::Validate;

use pv_core::clients::{DirectoryClient, VerificationProvider};

use crate::dto::verification::{CheckVerificationRequest, CheckVerificationResponse};
use crate::handlers::error::{handle_coordinator_error, missing_credential, validation_failed};

use super::AppState;

/// Handler for `POST /api/v1/verification/check`
///
/// Submits an OTP code for the pending attempt. Requires the caller's
/// directory credential as a bearer token; on an approved check the verified
/// phone number is bound to the authenticated account.
///
/// # Request
///
/// `Authorization: Bearer <id token>`
///
/// ```json
/// { "phone": "+15551234567", "code": "123456" }
/// ```
///
/// # Responses
/// - 200 OK: `{ "approved": true, "status": "approved" }` — or
///   `{ "approved": false, "status": "..." }` for the not-yet-verified
///   outcome (`pending`/`rejected`/`expired`), which is not an error
/// - 400 Bad Request: invalid phone or code shape
/// - 401 Unauthorized: missing or unresolvable credential
/// - 502 Bad Gateway: the provider check call failed
/// - 500 Internal Server Error: directory write failures, including the
///   distinct `CLAIM_UPDATE_FAILED` partial-failure code
pub async fn check_verification<D, P>(
    req: HttpRequest,
    state: web::Data<AppState<D, P>>,
    request: web::Json<CheckVerificationRequest>,
) -> HttpResponse
where
    D: DirectoryClient + 'static,
    P: VerificationProvider + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failed(errors);
    }

    let Some(credential) = bearer_token(&req) else {
        return missing_credential();
    };

    match state
        .coordinator
        .complete_verification(credential, &request.phone, &request.code)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(CheckVerificationResponse {
            approved: outcome.approved,
            status: outcome.status,
        }),
        Err(error) => handle_coordinator_error(error),
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
