//! Error types for rosterbook.
//!
//! This module defines all error types used throughout the rosterbook crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rosterbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Roster Errors ===
    /// An add was attempted with an ID that is already in the roster.
    #[error("a student with ID '{id}' already exists")]
    DuplicateId {
        /// The conflicting ID.
        id: String,
    },

    /// An update or delete referenced an ID that is not in the roster.
    #[error("no student with ID '{id}'")]
    StudentNotFound {
        /// The ID that was looked up.
        id: String,
    },

    // === Storage Errors ===
    /// Failed to read the roster file.
    #[error("failed to read roster at {path}: {source}")]
    StoreOpen {
        /// Path to the roster file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The roster file exists but could not be parsed.
    #[error("malformed roster file at {path}: {source}")]
    StoreParse {
        /// Path to the roster file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the roster file.
    #[error("failed to write roster at {path}: {source}")]
    StorePersist {
        /// Path that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
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

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rosterbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate-ID error.
    #[must_use]
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a student-not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::StudentNotFound { id: id.into() }
    }

    /// Check if this error is a duplicate-ID rejection.
    #[must_use]
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::DuplicateId { .. })
    }

    /// Check if this error is a missing-student lookup.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StudentNotFound { .. })
    }
}
