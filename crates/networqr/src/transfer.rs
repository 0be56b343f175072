//! Transfer parameters carrying a contact across a view transition.
//!
//! The parameters are an ordered list of `name`, `linkedin` and optionally
//! `phone`, serialized as an `application/x-www-form-urlencoded` query
//! string so they can ride along in a link.

use url::form_urlencoded;

use crate::contact::{ContactRecord, FIELD_FULL_NAME, FIELD_PROFILE_URL};
use crate::error::{Error, Result};

/// Parameter carrying the full name.
pub const PARAM_NAME: &str = "name";

/// Parameter carrying the profile URL.
pub const PARAM_LINKEDIN: &str = "linkedin";

/// Parameter carrying the phone number.
pub const PARAM_PHONE: &str = "phone";

/// Ordered string-to-string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferParams {
    pairs: Vec<(String, String)>,
}

/// Build the transfer parameters for a record.
///
/// Always `name` then `linkedin`; `phone` follows only when the record has a
/// phone number.
#[must_use]
pub fn build_transfer_params(record: &ContactRecord) -> TransferParams {
    let mut params = TransferParams::default();
    params.push(PARAM_NAME, record.full_name());
    params.push(PARAM_LINKEDIN, record.profile_url());
    if let Some(phone) = record.phone_number() {
        params.push(PARAM_PHONE, phone);
    }
    params
}

impl TransferParams {
    /// Parse parameters from a query string or a full link.
    ///
    /// For a link, everything up to and including the `?` is dropped. A
    /// bare query is taken as is, even when a value contains a raw `?`. A
    /// trailing `#fragment` is ignored either way.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let query = match (input.find('?'), input.find('=')) {
            (Some(q), Some(eq)) if q < eq => &input[q + 1..],
            (Some(q), None) => &input[q + 1..],
            _ => input,
        };
        let query = query.split_once('#').map_or(query, |(q, _)| q);

        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Append a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parameter names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize as a form-urlencoded query string (no leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Join `base` and the query string into a link.
    #[must_use]
    pub fn link(&self, base: &str) -> String {
        if self.is_empty() {
            return base.to_string();
        }
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}{}", self.to_query_string())
    }

    /// Rebuild the contact record on the receiving side.
    ///
    /// Missing values are read as empty strings, the same way the receiving
    /// view treats them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `name` or `linkedin` is missing or
    /// empty.
    pub fn to_contact(&self) -> Result<ContactRecord> {
        let name = self.get(PARAM_NAME).unwrap_or_default();
        let linkedin = self.get(PARAM_LINKEDIN).unwrap_or_default();
        let phone = self.get(PARAM_PHONE).map(str::to_string);

        if name.is_empty() {
            return Err(Error::missing_field(FIELD_FULL_NAME));
        }
        if linkedin.is_empty() {
            return Err(Error::missing_field(FIELD_PROFILE_URL));
        }
        ContactRecord::new(name, linkedin, phone)
    }
}

impl std::fmt::Display for TransferParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
