//! Client trait abstractions for the two external systems.
//!
//! All durable state lives behind these traits: the verification provider
//! owns the attempt state machine, the identity directory owns accounts,
//! attributes, and claims. Concrete implementations live in `pv_infra`; the
//! coordinator is injected with them via `Arc` and is trivially testable
//! with substitutes.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{AttemptStatus, Channel, PhoneNumber, Principal};
use crate::errors::{DirectoryError, ProviderError};

/// Identity directory: validates credentials and holds per-principal
/// attributes and authorization claims.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Resolve a bearer credential to the authenticated principal.
    async fn resolve_credential(&self, credential: &str) -> Result<Principal, DirectoryError>;

    /// Read the principal's current claim set.
    async fn get_claims(
        &self,
        principal: &Principal,
    ) -> Result<HashMap<String, Value>, DirectoryError>;

    /// Merge attributes into the principal's record. Must be atomic at the
    /// single-record level and must not delete unrelated fields.
    async fn merge_attributes(
        &self,
        principal: &Principal,
        attributes: Map<String, Value>,
    ) -> Result<(), DirectoryError>;

    /// Replace the principal's claim set with the given (already merged)
    /// claims.
    async fn merge_claims(
        &self,
        principal: &Principal,
        claims: HashMap<String, Value>,
    ) -> Result<(), DirectoryError>;
}

/// Verification provider: issues and validates one-time codes over a
/// delivery channel.
#[async_trait]
pub trait VerificationProvider: Send + Sync {
    /// Start a verification attempt for the phone number; returns the
    /// attempt's initial status (expected `pending`).
    async fn start_attempt(
        &self,
        phone: &PhoneNumber,
        channel: Channel,
    ) -> Result<AttemptStatus, ProviderError>;

    /// Check a submitted code against the pending attempt; returns the
    /// resulting status snapshot.
    async fn check_attempt(
        &self,
        phone: &PhoneNumber,
        code: &str,
    ) -> Result<AttemptStatus, ProviderError>;
}
