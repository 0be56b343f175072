//! Contact record types.
//!
//! A [`ContactRecord`] is the validated tuple of name, profile URL and an
//! optional phone number. Everything downstream (persistence, transfer
//! parameters, QR channels) starts from one of these.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Field name used in errors for the full name.
pub const FIELD_FULL_NAME: &str = "full_name";

/// Field name used in errors for the profile URL.
pub const FIELD_PROFILE_URL: &str = "profile_url";

/// Field name used in errors for the phone number.
pub const FIELD_PHONE_NUMBER: &str = "phone_number";

/// A person's shareable contact details.
///
/// Construct with [`ContactRecord::new`], which rejects an empty name or
/// profile URL. The profile URL and phone number are kept exactly as
/// entered; the phone number is only normalized when a QR payload is
/// derived from it. Deserialization applies the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContact")]
pub struct ContactRecord {
    full_name: String,
    profile_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
}

impl ContactRecord {
    /// Create a validated contact record.
    ///
    /// An empty phone number is treated the same as no phone number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if the name is blank after trimming or
    /// the profile URL is blank.
    pub fn new(
        full_name: impl Into<String>,
        profile_url: impl Into<String>,
        phone_number: Option<String>,
    ) -> Result<Self> {
        let full_name = full_name.into();
        let profile_url = profile_url.into();

        if full_name.trim().is_empty() {
            return Err(Error::missing_field(FIELD_FULL_NAME));
        }
        if profile_url.trim().is_empty() {
            return Err(Error::missing_field(FIELD_PROFILE_URL));
        }

        Ok(Self {
            full_name,
            profile_url,
            phone_number: phone_number.filter(|p| !p.is_empty()),
        })
    }

    /// The person's full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The profile URL, verbatim.
    #[must_use]
    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    /// The raw phone number, if one was given.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Whether a phone number is present.
    #[must_use]
    pub fn has_phone(&self) -> bool {
        self.phone_number.is_some()
    }

    /// Require a phone number, for setups where the form treats it as
    /// mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if no phone number is present.
    pub fn ensure_phone(&self) -> Result<()> {
        if self.has_phone() {
            Ok(())
        } else {
            Err(Error::missing_field(FIELD_PHONE_NUMBER))
        }
    }
}

#[derive(Deserialize)]
struct RawContact {
    full_name: String,
    profile_url: String,
    #[serde(default)]
    phone_number: Option<String>,
}

impl TryFrom<RawContact> for ContactRecord {
    type Error = Error;

    fn try_from(raw: RawContact) -> Result<Self> {
        Self::new(raw.full_name, raw.profile_url, raw.phone_number)
    }
}

impl std::fmt::Display for ContactRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name:     {}", self.full_name)?;
        writeln!(f, "LinkedIn: {}", self.profile_url)?;
        write!(f, "Phone:    {}", self.phone_number().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ContactRecord {
        ContactRecord::new(
            "Jane Doe",
            "https://linkedin.com/in/janedoe",
            Some("+1 555 123 4567".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_valid_record() {
        let record = jane();
        assert_eq!(record.full_name(), "Jane Doe");
        assert_eq!(record.profile_url(), "https://linkedin.com/in/janedoe");
        assert_eq!(record.phone_number(), Some("+1 555 123 4567"));
        assert!(record.has_phone());
    }

    #[test]
    fn test_new_rejects_blank_name() {
        let err = ContactRecord::new("   ", "https://linkedin.com/in/x", None).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                field: FIELD_FULL_NAME
            }
        ));
    }

    #[test]
    fn test_new_rejects_empty_profile_url() {
        let err = ContactRecord::new("Jane", "", None).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                field: FIELD_PROFILE_URL
            }
        ));
    }

    #[test]
    fn test_empty_phone_becomes_none() {
        let record =
            ContactRecord::new("Jane", "https://linkedin.com/in/x", Some(String::new())).unwrap();
        assert!(!record.has_phone());
        assert_eq!(record.phone_number(), None);
    }

    #[test]
    fn test_malformed_phone_is_kept_verbatim() {
        let record =
            ContactRecord::new("Jane", "https://linkedin.com/in/x", Some("N/A".to_string()))
                .unwrap();
        assert_eq!(record.phone_number(), Some("N/A"));
    }

    #[test]
    fn test_profile_url_not_trimmed() {
        let record = ContactRecord::new("Jane", " linkedin.com/in/x ", None).unwrap();
        assert_eq!(record.profile_url(), " linkedin.com/in/x ");
    }

    #[test]
    fn test_ensure_phone() {
        assert!(jane().ensure_phone().is_ok());

        let no_phone = ContactRecord::new("Jane", "https://linkedin.com/in/x", None).unwrap();
        let err = no_phone.ensure_phone().unwrap_err();
        assert!(err.is_missing_field());
        assert!(err.to_string().contains(FIELD_PHONE_NUMBER));
    }

    #[test]
    fn test_deserialize_validates_like_new() {
        let err = serde_json::from_str::<ContactRecord>(r#"{"full_name": "", "profile_url": "x"}"#)
            .unwrap_err();
        assert!(err.to_string().contains(FIELD_FULL_NAME));

        let record: ContactRecord = serde_json::from_str(
            r#"{"full_name": "Jane", "profile_url": "https://linkedin.com/in/x", "phone_number": ""}"#,
        )
        .unwrap();
        assert!(!record.has_phone());
    }

    #[test]
    fn test_serialization_skips_missing_phone() {
        let record = ContactRecord::new("Jane", "https://linkedin.com/in/x", None).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("phone_number"));
    }

    #[test]
    fn test_display() {
        let text = jane().to_string();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("+1 555 123 4567"));
    }
}
