//! Core value types of the state machine.
//!
//! This module contains the immutable building blocks shared by templates
//! and instance machines:
//! - `State`: a named point in the state space
//! - `Transition`: allowed origins plus a target, validated against the current state
//! - `Event`: a named trigger with an optional transition and action
//! - `TransitionHistory`: the record of committed transitions of one instance

mod error;
mod event;
mod history;
mod state;
mod transition;

pub use error::MachineError;
pub use event::{Action, Event};
pub use history::{TransitionHistory, TransitionRecord};
pub use state::State;
pub use transition::Transition;
