//! Phone number value type.
//!
//! Phone numbers are treated as opaque E.164-style strings at this layer;
//! deliverability and full format validation are the verification provider's
//! responsibility. The only local rule is that a number must be non-blank.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoordinatorError;

/// An E.164-formatted phone number (e.g., "+15551234567").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a phone number from caller input.
    ///
    /// Rejects empty or whitespace-only input with `InvalidInput`; anything
    /// else is passed through unchanged for the provider to judge.
    pub fn new(phone: &str) -> Result<Self, CoordinatorError> {
        let trimmed = phone.trim();
        if trimmed.is_empty() {
            return Err(CoordinatorError::InvalidInput {
                message: "phone number must not be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for log output (e.g., "+15****4567").
    ///
    /// Raw phone numbers must never appear in logs; use this everywhere a
    /// number is logged. The number is opaque beyond being non-empty, so
    /// masking works on characters, not bytes.
    pub fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count >= 7 {
            let head: String = self.0.chars().take(3).collect();
            let tail: String = self.0.chars().skip(count - 4).collect();
            format!("{head}****{tail}")
        } else {
            "****".to_string()
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_e164_number() {
        let phone = PhoneNumber::new("+15551234567").unwrap();
        assert_eq!(phone.as_str(), "+15551234567");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let phone = PhoneNumber::new("  +15551234567 ").unwrap();
        assert_eq!(phone.as_str(), "+15551234567");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            PhoneNumber::new(""),
            Err(CoordinatorError::InvalidInput { .. })
        ));
        assert!(matches!(
            PhoneNumber::new("   "),
            Err(CoordinatorError::InvalidInput { .. })
        ));
    }

    #[test]
    fn masks_all_but_edges() {
        let phone = PhoneNumber::new("+15551234567").unwrap();
        assert_eq!(phone.masked(), "+15****4567");
    }

    #[test]
    fn masks_non_ascii_numbers_without_panicking() {
        // Numbers are opaque beyond non-empty, so multi-byte input must
        // mask cleanly instead of splitting a character.
        let phone = PhoneNumber::new("ab€cdefgh").unwrap();
        assert_eq!(phone.masked(), "ab€****efgh");

        let phone = PhoneNumber::new("+49 555 ①②③④").unwrap();
        assert!(phone.masked().contains("****"));
    }

    #[test]
    fn masks_short_numbers_entirely() {
        let phone = PhoneNumber::new("+1234").unwrap();
        assert_eq!(phone.masked(), "****");
    }
}
