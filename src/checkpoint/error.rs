//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur while saving or restoring an episode checkpoint
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckpointError {
    /// Encoding the episode as JSON or bincode failed
    #[error("Checkpoint serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding a JSON or bincode checkpoint failed
    #[error("Checkpoint deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint was written by an incompatible format version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Checkpoint does not fit the machine it is restored into
    #[error("Checkpoint does not match machine: {0}")]
    ValidationFailed(String),
}
