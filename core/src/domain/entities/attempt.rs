//! Verification attempt types.
//!
//! A verification attempt is owned and persisted by the verification
//! provider; the coordinator only observes a status snapshot per call and
//! holds no durable copy.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Delivery channel for a verification code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Default channel when the caller does not specify one.
    #[default]
    Sms,
    Voice,
    Whatsapp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Voice => "voice",
            Channel::Whatsapp => "whatsapp",
        }
    }

    /// Parse a caller-supplied channel name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sms" => Some(Channel::Sms),
            "voice" => Some(Channel::Voice),
            "whatsapp" => Some(Channel::Whatsapp),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-reported status of a verification attempt.
///
/// The provider owns the attempt state machine (`pending -> approved |
/// rejected | expired`); the coordinator reacts once to whatever snapshot the
/// provider returns. Unrecognized statuses are carried verbatim in `Other`
/// and treated as non-approval, never as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
    Other(String),
}

impl AttemptStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => AttemptStatus::Pending,
            "approved" => AttemptStatus::Approved,
            "rejected" => AttemptStatus::Rejected,
            "expired" => AttemptStatus::Expired,
            other => AttemptStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AttemptStatus::Pending => "pending",
            AttemptStatus::Approved => "approved",
            AttemptStatus::Rejected => "rejected",
            AttemptStatus::Expired => "expired",
            AttemptStatus::Other(raw) => raw,
        }
    }

    /// Only an `approved` snapshot triggers the phone binding.
    pub fn is_approved(&self) -> bool {
        matches!(self, AttemptStatus::Approved)
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AttemptStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AttemptStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AttemptStatus::parse(&raw))
    }
}
