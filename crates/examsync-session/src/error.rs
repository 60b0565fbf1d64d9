//! Session storage error types.

use examsync_core::error::AttemptError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The persistence backend failed to read or write.
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be encoded or decoded.
    #[error("failed to (de)serialize attempt record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key cannot be stored (empty attempt id, unencodable name).
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The attempt-start payload was rejected.
    #[error(transparent)]
    Attempt(#[from] AttemptError),
}
