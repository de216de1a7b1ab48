//! Phone number value type.
//!
//! The messaging provider expects recipients in `+`-prefixed international
//! form. Producers publish numbers both with and without the prefix, so the
//! dispatch path normalizes every recipient through this type.

use serde::{Deserialize, Serialize};

/// A phone number in `+`-prefixed international form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes a raw phone string by prefixing `+` when absent.
    ///
    /// This is the only normalization performed: no locale-aware formatting
    /// and no digit-count validation. Callers must supply a valid number.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        if raw.starts_with('+') {
            Self(raw.to_string())
        } else {
            Self(format!("+{raw}"))
        }
    }

    /// Returns the normalized string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("919999999999", "+919999999999")]
    #[case("+919999999999", "+919999999999")]
    #[case("15551234567", "+15551234567")]
    #[case("+15551234567", "+15551234567")]
    fn test_normalize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(PhoneNumber::normalize(raw).as_str(), expected);
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = PhoneNumber::normalize("919999999999");
        let twice = PhoneNumber::normalize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_display_matches_inner() {
        let phone = PhoneNumber::normalize("15551234567");
        assert_eq!(phone.to_string(), "+15551234567");
    }

    proptest! {
        // Normalization always yields a leading `+` and is idempotent.
        #[test]
        fn prop_normalize_idempotent(raw in "[0-9]{6,15}") {
            let once = PhoneNumber::normalize(&raw);
            prop_assert!(once.as_str().starts_with('+'));

            let twice = PhoneNumber::normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        // Only the prefix changes: the digits pass through untouched.
        #[test]
        fn prop_normalize_preserves_digits(raw in "[0-9]{6,15}") {
            let normalized = PhoneNumber::normalize(&raw);
            prop_assert_eq!(&normalized.as_str()[1..], raw.as_str());
        }
    }
}
