//! Checkpoint error types.

use crate::core::MachineError;
use thiserror::Error;

/// Errors that can occur while saving or resuming a machine
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding the checkpoint as JSON or bincode failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding a checkpoint from JSON or bincode failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint was written by an incompatible format version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The checkpointed state was declared at another position in the template
    #[error("State '{state}' is at index {expected} in the template but {found} in the checkpoint")]
    StateIndexMismatch {
        state: String,
        expected: usize,
        found: usize,
    },

    /// The recorded history mentions states the template does not declare
    #[error("Checkpoint history does not match the template: {0}")]
    HistoryMismatch(String),

    /// The template rejected the checkpoint
    #[error(transparent)]
    Machine(#[from] MachineError),
}
