//! Checkpoint and resume for instance machines.
//!
//! A checkpoint captures what an instance owns: its current state and its
//! transition history. States, events and actions live in the template and
//! are not part of it, so a checkpoint is resumed against a template.

use crate::core::{State, TransitionHistory};
use crate::machine::{Machine, Template};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of an instance machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Current state of the machine
    pub state: State,

    /// Position of `state` in the template's declaration order
    pub state_index: usize,

    /// Complete transition history
    pub history: TransitionHistory,
}

impl Checkpoint {
    /// Serialize checkpoint to JSON format
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Deserialize checkpoint from JSON, rejecting other format versions
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Serialize checkpoint to compact binary format
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Deserialize checkpoint from binary, rejecting other format versions
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl<H> Machine<H> {
    /// Snapshot the current state and history.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            state: self.current_state().clone(),
            state_index: self.current_index(),
            history: self.history().clone(),
        }
    }
}

impl<H> Template<H> {
    /// Recreate an instance machine from a checkpoint.
    ///
    /// The checkpointed state must exist in this template at the same index,
    /// and every state in the history must be declared here.
    pub fn resume(
        self: &Arc<Self>,
        checkpoint: &Checkpoint,
    ) -> Result<Machine<H>, CheckpointError> {
        checkpoint.check_version()?;

        let index = self.state_index_by_name(checkpoint.state.name())?;
        if index != checkpoint.state_index {
            return Err(CheckpointError::StateIndexMismatch {
                state: checkpoint.state.name().to_string(),
                expected: index,
                found: checkpoint.state_index,
            });
        }

        for record in checkpoint.history.records() {
            for state in [&record.from, &record.to] {
                if self.state_by_name(state.name()).is_err() {
                    return Err(CheckpointError::HistoryMismatch(format!(
                        "event '{}' refers to undeclared state '{}'",
                        record.event, state
                    )));
                }
            }
        }

        let mut machine = self.instantiate()?;
        machine.restore(index)?;
        machine.restore_history(checkpoint.history.clone());

        debug!(
            checkpoint = %checkpoint.id,
            state = %checkpoint.state,
            "Resumed machine from checkpoint"
        );
        Ok(machine)
    }
}
