//! Principal and phone binding types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::phone_number::PhoneNumber;

/// Claim key asserted on a principal once its phone number is verified.
///
/// The claim is denormalized from the phone binding so downstream
/// authorization checks can read it straight off the credential; it may lag
/// the binding write briefly.
pub const PHONE_VERIFIED_CLAIM: &str = "phoneVerified";

/// Opaque identifier of an authenticated account, resolved from a credential
/// by the identity directory. Immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The durable fact that a principal's phone number was verified at a given
/// time. Stored in the identity directory; at most one active binding exists
/// per principal, with later verifications overwriting earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneBinding {
    pub phone: PhoneNumber,
    pub verified_at: DateTime<Utc>,
}

impl PhoneBinding {
    pub fn new(phone: PhoneNumber) -> Self {
        Self {
            phone,
            verified_at: Utc::now(),
        }
    }

    /// Attribute map for the directory merge-write.
    ///
    /// Written with merge/upsert semantics: repeated approvals re-assert the
    /// same keys and unrelated fields on the principal's record survive.
    pub fn to_attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert(
            "phoneNumber".to_string(),
            Value::String(self.phone.as_str().to_string()),
        );
        attributes.insert("phoneVerified".to_string(), Value::Bool(true));
        attributes.insert(
            "phoneVerifiedAt".to_string(),
            Value::String(self.verified_at.to_rfc3339()),
        );
        attributes
    }
}
