//! Origin/target rules applied by events.

use super::error::MachineError;
use super::state::State;

/// The rule an event applies to the current state.
///
/// An empty `origins` list is a wildcard: the transition may fire from any
/// state. A transition without a target never fails validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    origins: Vec<State>,
    target: Option<State>,
}

impl Transition {
    /// Create a transition from the given origins to `target`.
    pub fn new(origins: Vec<State>, target: Option<State>) -> Self {
        Self { origins, target }
    }

    /// Transition allowed from any state.
    pub fn any(target: State) -> Self {
        Self::new(Vec::new(), Some(target))
    }

    /// States the transition may start from; empty means any.
    pub fn origins(&self) -> &[State] {
        &self.origins
    }

    pub fn target(&self) -> Option<&State> {
        self.target.as_ref()
    }

    /// Whether the transition accepts every origin.
    pub fn is_wildcard(&self) -> bool {
        self.origins.is_empty()
    }

    /// Check whether this transition may fire from `current`.
    ///
    /// Never mutates anything; the caller applies the target only after
    /// validation succeeds.
    pub fn validate(&self, current: &State) -> Result<(), MachineError> {
        if self.target.is_none() || self.origins.is_empty() {
            return Ok(());
        }

        if self.origins.iter().any(|origin| origin.same_as(current)) {
            Ok(())
        } else {
            let allowed: Vec<&str> = self.origins.iter().map(State::name).collect();
            Err(MachineError::invalid_transition(format!(
                "cannot leave '{}' (allowed from: {})",
                current,
                allowed.join(", ")
            )))
        }
    }
}
