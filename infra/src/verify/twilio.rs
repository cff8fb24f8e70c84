//! Twilio Verify Implementation
//!
//! Verification provider backed by the Twilio Verify v2 REST API. Twilio
//! owns the full attempt lifecycle (code generation, delivery, expiry,
//! attempt limits); this client only starts attempts and checks submitted
//! codes. Provider errors are surfaced with Twilio's own message and are
//! never retried here — retry policy belongs to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info};

use pv_core::clients::VerificationProvider;
use pv_core::domain::{AttemptStatus, Channel, PhoneNumber};
use pv_core::errors::ProviderError;

use crate::InfrastructureError;

const VERIFY_API_BASE: &str = "https://verify.twilio.com/v2";

/// Twilio Verify service configuration
#[derive(Debug, Clone)]
pub struct TwilioVerifyConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// Verify service SID (the `VA...` resource the attempts live under)
    pub verify_service_sid: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl TwilioVerifyConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let verify_service_sid = std::env::var("TWILIO_VERIFY_SERVICE_SID").map_err(|_| {
            InfrastructureError::Config("TWILIO_VERIFY_SERVICE_SID not set".to_string())
        })?;

        if !verify_service_sid.starts_with("VA") {
            return Err(InfrastructureError::Config(
                "TWILIO_VERIFY_SERVICE_SID must be a Verify service SID (starting with 'VA')"
                    .to_string(),
            ));
        }

        Ok(Self {
            account_sid,
            auth_token,
            verify_service_sid,
            request_timeout_secs: std::env::var("TWILIO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

/// Subset of a Twilio Verification / VerificationCheck resource.
#[derive(Debug, Deserialize)]
struct VerificationResource {
    sid: String,
    status: String,
}

/// Twilio REST error body.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: String,
    code: Option<i64>,
}

/// Twilio Verify client
pub struct TwilioVerifyClient {
    http: reqwest::Client,
    config: TwilioVerifyConfig,
}

impl TwilioVerifyClient {
    /// Create a new Twilio Verify client
    pub fn new(config: TwilioVerifyConfig) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::Http(e.to_string()))?;

        info!(
            verify_service_sid = %config.verify_service_sid,
            "Twilio Verify client initialized"
        );

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(TwilioVerifyConfig::from_env()?)
    }

    /// Twilio's Verify API spells the voice channel "call".
    fn wire_channel(channel: Channel) -> &'static str {
        match channel {
            Channel::Sms => "sms",
            Channel::Voice => "call",
            Channel::Whatsapp => "whatsapp",
        }
    }

    async fn post_form(
        &self,
        resource: &str,
        form: &[(&str, &str)],
    ) -> Result<VerificationResource, ProviderError> {
        let url = format!(
            "{}/Services/{}/{}",
            VERIFY_API_BASE, self.config.verify_service_sid, resource
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(form)
            .send()
            .await
            .map_err(|e| ProviderError::new(format!("Twilio request failed: {e}")))?;

        let http_status = response.status();
        if http_status.is_success() {
            response
                .json::<VerificationResource>()
                .await
                .map_err(|e| ProviderError::new(format!("Unexpected Twilio response: {e}")))
        } else {
            // Surface Twilio's own message verbatim when the body parses.
            let message = match response.json::<TwilioErrorBody>().await {
                Ok(body) => match body.code {
                    Some(code) => format!("{} (Twilio error {code})", body.message),
                    None => body.message,
                },
                Err(_) => format!("Twilio returned HTTP {http_status}"),
            };
            Err(ProviderError::new(message))
        }
    }
}

#[async_trait]
impl VerificationProvider for TwilioVerifyClient {
    async fn start_attempt(
        &self,
        phone: &PhoneNumber,
        channel: Channel,
    ) -> Result<AttemptStatus, ProviderError> {
        debug!(
            phone = %phone.masked(),
            channel = %channel,
            "Creating Twilio verification"
        );

        let resource = self
            .post_form(
                "Verifications",
                &[
                    ("To", phone.as_str()),
                    ("Channel", Self::wire_channel(channel)),
                ],
            )
            .await
            .map_err(|e| {
                error!(phone = %phone.masked(), error = %e, "Twilio verification start failed");
                e
            })?;

        debug!(
            phone = %phone.masked(),
            sid = %resource.sid,
            status = %resource.status,
            "Twilio verification created"
        );

        Ok(AttemptStatus::parse(&resource.status))
    }

    async fn check_attempt(
        &self,
        phone: &PhoneNumber,
        code: &str,
    ) -> Result<AttemptStatus, ProviderError> {
        debug!(phone = %phone.masked(), "Checking Twilio verification code");

        let resource = self
            .post_form(
                "VerificationCheck",
                &[("To", phone.as_str()), ("Code", code)],
            )
            .await
            .map_err(|e| {
                error!(phone = %phone.masked(), error = %e, "Twilio verification check failed");
                e
            })?;

        info!(
            phone = %phone.masked(),
            status = %resource.status,
            "Twilio verification check completed"
        );

        Ok(AttemptStatus::parse(&resource.status))
    }
}
