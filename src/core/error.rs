//! Errors raised while declaring, instantiating and driving state machines.

use crate::sync::Representation;
use thiserror::Error;

/// Errors that can occur when declaring or running a state machine.
///
/// Declaration errors (`DuplicateState`, `DuplicateEvent`, `UndefinedState`,
/// `InvalidTransition` for a missing target) abort the declaring statement and
/// leave the builder as it was. Runtime errors leave the current state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("Initial state not specified. Call declare_initial_state(name) before instantiating")]
    InitialStateRequired,

    #[error("State '{0}' is already declared")]
    DuplicateState(String),

    #[error("Event '{0}' is already declared")]
    DuplicateEvent(String),

    #[error("State '{0}' is not declared")]
    UndefinedState(String),

    #[error("Event '{0}' is not declared")]
    UndefinedEvent(String),

    #[error("Invalid transition: {reason}")]
    InvalidTransition { reason: String },

    #[error("State index {index} is out of range ({len} states declared)")]
    StateIndexOutOfRange { index: usize, len: usize },

    #[error("Property '{property}' is bound as {expected:?} but its strategy stores {found:?}")]
    InvalidBinding {
        property: String,
        expected: Representation,
        found: Representation,
    },

    #[error("No state machine template registered for '{0}'")]
    UnregisteredType(&'static str),

    #[error("Event action failed: {0}")]
    ActionFailed(String),
}

impl MachineError {
    pub(crate) fn invalid_transition(reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for actions that need to report a failure.
    pub fn action_failed(message: impl Into<String>) -> Self {
        Self::ActionFailed(message.into())
    }
}
