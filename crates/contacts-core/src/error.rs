//! Error types for contact storage
//!
//! Store failures are opaque to HTTP clients; they carry enough detail for
//! logs and nothing else.

use thiserror::Error;

/// Errors that can occur when interacting with a contact store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing database reported a failure
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// A stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store cannot currently serve requests
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Persisted data violates the contact invariants
    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StoreError::Unavailable(msg.into())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
