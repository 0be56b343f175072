//! Error types for networqr.
//!
//! This module defines all error types used throughout the networqr crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for networqr operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The key-value store is disabled or could not be opened.
    #[error("key-value store unavailable: {reason}")]
    StoreUnavailable {
        /// Why the store cannot be used.
        reason: String,
    },

    /// The database was written by a newer release with a different layout.
    #[error("contact store was written by a newer version (schema {found}, supported {supported})")]
    SchemaTooNew {
        /// Layout version found in the file.
        found: i32,
        /// Highest layout version this release reads.
        supported: i32,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Contact Errors ===
    /// A required contact field was empty or missing.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    // === Encoding Errors ===
    /// A color string could not be parsed as a hex color.
    #[error("invalid hex color '{value}': {reason}")]
    InvalidColor {
        /// The rejected color string.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The QR encoder rejected a payload.
    #[error("failed to encode QR code for '{payload}': {message}")]
    Encode {
        /// The payload that could not be encoded.
        payload: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Writing the raster image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for networqr operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a store unavailable error.
    #[must_use]
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an encode error for the given payload.
    #[must_use]
    pub fn encode(payload: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            payload: payload.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a missing required field.
    #[must_use]
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }

    /// Check if this error came from the QR encoder.
    #[must_use]
    pub fn is_encode_error(&self) -> bool {
        matches!(self, Self::Encode { .. } | Self::Image(_))
    }
}
