//! Verification coordinator implementation

use std::sync::Arc;

use serde_json::Value;

use crate::clients::{DirectoryClient, VerificationProvider};
use crate::domain::{Channel, PhoneBinding, PhoneNumber, PHONE_VERIFIED_CLAIM};
use crate::errors::{CoordinatorError, VerificationResult};

use super::types::{CompleteOutcome, StartOutcome};

/// Coordinates OTP verification between the verification provider and the
/// identity directory.
///
/// Holds no state beyond the two injected clients; each call is independent
/// and all durable state lives in the external systems. Consistency relies
/// on the directory's single-record merge-write atomicity, not on any lock
/// held here.
pub struct VerificationCoordinator<D: DirectoryClient, P: VerificationProvider> {
    directory: Arc<D>,
    provider: Arc<P>,
}

impl<D: DirectoryClient, P: VerificationProvider> VerificationCoordinator<D, P> {
    pub fn new(directory: Arc<D>, provider: Arc<P>) -> Self {
        Self {
            directory,
            provider,
        }
    }

    /// Start a verification attempt for the phone number.
    ///
    /// The channel defaults to SMS when absent. Exactly one provider call is
    /// made and its reported status is returned unchanged; there are no
    /// local writes and no retries (retry policy belongs to the caller).
    pub async fn start_verification(
        &self,
        phone: &str,
        channel: Option<Channel>,
    ) -> VerificationResult<StartOutcome> {
        let phone = PhoneNumber::new(phone)?;
        let channel = channel.unwrap_or_default();

        tracing::info!(
            phone = %phone.masked(),
            channel = %channel,
            event = "verification_start",
            "Starting verification attempt"
        );

        let status = self
            .provider
            .start_attempt(&phone, channel)
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %phone.masked(),
                    error = %e,
                    event = "verification_start_failed",
                    "Provider rejected verification start"
                );
                CoordinatorError::VerificationStartFailed {
                    message: e.to_string(),
                }
            })?;

        Ok(StartOutcome { status })
    }

    /// Check a submitted code and, on approval, bind the verified phone
    /// number to the authenticated principal.
    ///
    /// Stages run strictly in order, each a hard dependency on the previous:
    /// authenticate, check the code, write the phone binding, then merge the
    /// `phoneVerified` claim from a fresh claim read. A failure at any stage
    /// skips everything after it; only the claim stage can leave partial
    /// state, which is reported distinctly as `ClaimUpdateFailed`.
    ///
    /// Repeated approved completions for the same principal are last-write-
    /// wins idempotent: the binding and claim are simply re-asserted.
    pub async fn complete_verification(
        &self,
        credential: &str,
        phone: &str,
        code: &str,
    ) -> VerificationResult<CompleteOutcome> {
        let phone = PhoneNumber::new(phone)?;
        if code.trim().is_empty() {
            return Err(CoordinatorError::InvalidInput {
                message: "verification code must not be empty".to_string(),
            });
        }
        // Missing credential short-circuits locally; no directory round trip.
        if credential.trim().is_empty() {
            return Err(CoordinatorError::Unauthenticated);
        }

        let principal = self
            .directory
            .resolve_credential(credential)
            .await
            .map_err(|e| {
                tracing::warn!(
                    phone = %phone.masked(),
                    error = %e,
                    event = "credential_rejected",
                    "Credential failed resolution; provider check skipped"
                );
                CoordinatorError::Unauthenticated
            })?;

        let status = self
            .provider
            .check_attempt(&phone, code)
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %phone.masked(),
                    principal = %principal,
                    error = %e,
                    event = "verification_check_failed",
                    "Provider check call failed"
                );
                CoordinatorError::VerificationCheckFailed {
                    message: e.to_string(),
                }
            })?;

        if !status.is_approved() {
            tracing::info!(
                phone = %phone.masked(),
                principal = %principal,
                status = %status,
                event = "verification_not_approved",
                "Verification not approved; no directory writes"
            );
            return Ok(CompleteOutcome {
                approved: false,
                status,
            });
        }

        // Binding write first; the claim below is derived from it.
        let binding = PhoneBinding::new(phone.clone());
        self.directory
            .merge_attributes(&principal, binding.to_attributes())
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %phone.masked(),
                    principal = %principal,
                    error = %e,
                    event = "binding_write_failed",
                    "Phone binding write failed; claims untouched"
                );
                CoordinatorError::DirectoryWriteFailed {
                    message: e.to_string(),
                }
            })?;

        // Claims are read fresh here rather than cached so that concurrent
        // unrelated claim changes on the same principal are not clobbered.
        let mut claims =
            self.directory
                .get_claims(&principal)
                .await
                .map_err(|e| CoordinatorError::ClaimUpdateFailed {
                    message: e.to_string(),
                })?;
        claims.insert(PHONE_VERIFIED_CLAIM.to_string(), Value::Bool(true));
        self.directory
            .merge_claims(&principal, claims)
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %phone.masked(),
                    principal = %principal,
                    error = %e,
                    event = "claim_update_failed",
                    "Binding recorded but claim update failed"
                );
                CoordinatorError::ClaimUpdateFailed {
                    message: e.to_string(),
                }
            })?;

        tracing::info!(
            phone = %phone.masked(),
            principal = %principal,
            event = "phone_verified",
            "Phone number verified and bound to principal"
        );

        Ok(CompleteOutcome {
            approved: true,
            status,
        })
    }
}
