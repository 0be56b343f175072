//! Derivation of the exact strings encoded into each QR code.

use serde::{Deserialize, Serialize};

/// Prefix of a dialing URI.
pub const TEL_PREFIX: &str = "tel:+";

/// The profile payload is the URL exactly as entered.
#[must_use]
pub fn derive_profile_payload(profile_url: &str) -> String {
    profile_url.to_string()
}

/// Turn a phone number into a `tel:+<digits>` dialing URI.
///
/// Every character other than an ASCII digit is dropped and the remaining
/// digits keep their order. Input without digits yields the bare `tel:+`.
///
/// ```
/// use networqr::payload::derive_phone_payload;
///
/// assert_eq!(derive_phone_payload("+1 (555) 123-4567"), "tel:+15551234567");
/// assert_eq!(derive_phone_payload("N/A"), "tel:+");
/// ```
#[must_use]
pub fn derive_phone_payload(phone_number: &str) -> String {
    let digits: String = phone_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    format!("{TEL_PREFIX}{digits}")
}

/// Whether a dialing URI carries no digits at all.
#[must_use]
pub fn is_degenerate_phone_payload(payload: &str) -> bool {
    payload == TEL_PREFIX
}

/// What to do with a phone number that contains no digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhonePolicy {
    /// Drop the phone channel; a bare `tel:+` dials nothing.
    #[default]
    SkipDegenerate,
    /// Encode `tel:+` anyway.
    EncodeDegenerate,
}

impl PhonePolicy {
    /// Whether a phone channel with this payload should be produced.
    #[must_use]
    pub fn allows(self, phone_payload: &str) -> bool {
        match self {
            Self::SkipDegenerate => !is_degenerate_phone_payload(phone_payload),
            Self::EncodeDegenerate => true,
        }
    }
}

impl std::fmt::Display for PhonePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkipDegenerate => write!(f, "skip_degenerate"),
            Self::EncodeDegenerate => write!(f, "encode_degenerate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_payload_is_identity() {
        let url = "https://linkedin.com/in/janedoe?trk=public";
        assert_eq!(derive_profile_payload(url), url);
        assert_eq!(derive_profile_payload(" linkedin.com/in/x "), " linkedin.com/in/x ");
    }

    #[test]
    fn test_phone_payload_strips_punctuation() {
        assert_eq!(derive_phone_payload("+1 555 123 4567"), "tel:+15551234567");
        assert_eq!(derive_phone_payload("(020) 7946-0958"), "tel:+02079460958");
        assert_eq!(derive_phone_payload("44.20.7946.0958"), "tel:+442079460958");
    }

    #[test]
    fn test_phone_payload_without_digits() {
        assert_eq!(derive_phone_payload("N/A"), "tel:+");
        assert_eq!(derive_phone_payload(""), "tel:+");
        assert!(is_degenerate_phone_payload(&derive_phone_payload("N/A")));
    }

    #[test]
    fn test_phone_payload_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not dialable ASCII digits.
        assert_eq!(derive_phone_payload("١٢٣ 45"), "tel:+45");
    }

    #[test]
    fn test_phone_policy_default_skips() {
        assert_eq!(PhonePolicy::default(), PhonePolicy::SkipDegenerate);
        assert!(!PhonePolicy::SkipDegenerate.allows("tel:+"));
        assert!(PhonePolicy::SkipDegenerate.allows("tel:+1"));
        assert!(PhonePolicy::EncodeDegenerate.allows("tel:+"));
    }

    #[test]
    fn test_phone_policy_serde() {
        let json = serde_json::to_string(&PhonePolicy::EncodeDegenerate).unwrap();
        assert_eq!(json, "\"encode_degenerate\"");
        let policy: PhonePolicy = serde_json::from_str("\"skip_degenerate\"").unwrap();
        assert_eq!(policy, PhonePolicy::SkipDegenerate);
        assert_eq!(policy.to_string(), "skip_degenerate");
    }
}
