use serde::{Deserialize, Serialize};
use validator::Validate;

use pv_core::domain::AttemptStatus;

/// Body of `POST /api/v1/verification/start`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartVerificationRequest {
    #[validate(length(min = 8, max = 20))]
    pub phone: String,
    /// Delivery channel; omitted means SMS.
    #[validate(custom(function = validate_channel))]
    pub channel: Option<String>,
}

/// Body of `POST /api/v1/verification/check`. The credential travels in the
/// `Authorization` header, not the body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckVerificationRequest {
    #[validate(length(min = 8, max = 20))]
    pub phone: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartVerificationResponse {
    pub status: AttemptStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckVerificationResponse {
    pub approved: bool,
    pub status: AttemptStatus,
}

fn validate_channel(channel: &str) -> Result<(), validator::ValidationError> {
    match channel {
        "sms" | "voice" | "whatsapp" => Ok(()),
        _ => Err(validator::ValidationError::new("unknown_channel")),
    }
}
