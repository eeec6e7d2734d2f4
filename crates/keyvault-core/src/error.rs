//! Error types for `keyvault-core`.
//!
//! Errors never carry the personal fields of a signup, only field names and
//! storage keys, so they are safe to log.

use keyvault_storage::StorageError;

/// Errors from waitlist operations.
#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    /// A required signup field was empty.
    #[error("field '{field}' is required")]
    MissingField { field: &'static str },

    /// The collection could not be encoded for storage.
    #[error("failed to encode waitlist: {reason}")]
    Serialization { reason: String },

    /// The underlying storage backend returned an error.
    #[error("waitlist storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from the admin gate.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The submitted password did not match.
    #[error("invalid password")]
    InvalidPassword,

    /// The request carried no session, or a session that was closed.
    #[error("admin session missing or closed")]
    NotAuthenticated,
}
