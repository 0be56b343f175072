//! Local persistence for contact details.
//!
//! The store is a plain string key-value abstraction ([`KeyValueStore`])
//! with a durable `SQLite` backend and an in-memory one. Contact details are
//! kept under three stable keys and never transmitted anywhere.
//!
//! # Example
//!
//! ```
//! use networqr::store::{load_stored_contact, save_contact, MemoryStore};
//! use networqr::ContactRecord;
//!
//! let store = MemoryStore::new();
//! let record = ContactRecord::new("Jane Doe", "https://linkedin.com/in/janedoe", None).unwrap();
//!
//! save_contact(&store, &record);
//! assert_eq!(load_stored_contact(&store), Some(record));
//! ```

mod memory;
mod schema;
mod sqlite;

use tracing::{debug, warn};

use crate::contact::ContactRecord;
use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the full name.
pub const KEY_FULL_NAME: &str = "networqr_fullname";

/// Key holding the profile URL.
pub const KEY_PROFILE_URL: &str = "networqr_linkedin";

/// Key holding the phone number (empty string when absent).
pub const KEY_PHONE_NUMBER: &str = "networqr_phone";

/// A string key-value store.
///
/// Implementations own their lifecycle; callers only get and set values.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Store several values at once.
    ///
    /// Either every entry is written or none is; a failure part way through
    /// leaves the previous values in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove `key`. Returns whether a value was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<bool>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).set_many(entries)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

/// Load the saved contact, if there is a usable one.
///
/// A record comes back only when both the name and the profile URL are
/// present and non-empty; a missing phone never blocks it. Store failures
/// are logged and treated as "nothing saved".
pub fn load_stored_contact<S: KeyValueStore + ?Sized>(store: &S) -> Option<ContactRecord> {
    match try_load_stored_contact(store) {
        Ok(record) => record,
        Err(e) => {
            warn!("Could not read saved contact: {}", e);
            None
        }
    }
}

/// Like [`load_stored_contact`] but surfaces store errors.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn try_load_stored_contact<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<ContactRecord>> {
    let full_name = store.get(KEY_FULL_NAME)?;
    let profile_url = store.get(KEY_PROFILE_URL)?;
    let phone_number = store.get(KEY_PHONE_NUMBER)?;

    let (Some(full_name), Some(profile_url)) = (full_name, profile_url) else {
        debug!("No saved contact found");
        return Ok(None);
    };

    // Incomplete leftovers are not an error, just nothing usable.
    Ok(ContactRecord::new(full_name, profile_url, phone_number).ok())
}

/// Save the contact, overwriting previous values.
///
/// Best effort: a failing store is logged and otherwise ignored.
pub fn save_contact<S: KeyValueStore + ?Sized>(store: &S, record: &ContactRecord) {
    if let Err(e) = try_save_contact(store, record) {
        warn!("Could not save contact details: {}", e);
    }
}

/// Like [`save_contact`] but surfaces store errors.
///
/// # Errors
///
/// Returns an error if the store cannot be written, in which case the
/// previously saved contact is left untouched.
pub fn try_save_contact<S: KeyValueStore + ?Sized>(
    store: &S,
    record: &ContactRecord,
) -> Result<()> {
    store.set_many(&[
        (KEY_FULL_NAME, record.full_name()),
        (KEY_PROFILE_URL, record.profile_url()),
        (KEY_PHONE_NUMBER, record.phone_number().unwrap_or_default()),
    ])?;
    debug!("Saved contact details for {}", record.full_name());
    Ok(())
}

/// Remove the saved contact. Returns whether anything was removed.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn forget_contact<S: KeyValueStore + ?Sized>(store: &S) -> Result<bool> {
    let mut removed = false;
    for key in [KEY_FULL_NAME, KEY_PROFILE_URL, KEY_PHONE_NUMBER] {
        removed |= store.remove(key)?;
    }
    Ok(removed)
}
