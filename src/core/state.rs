//! Named states.
//!
//! A `State` is an immutable value identified only by its name. Two states
//! with the same name are the same state, wherever they were constructed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named point in a machine's state space.
///
/// # Example
///
/// ```rust
/// use ssm::core::State;
///
/// let closed = State::new("closed");
/// assert_eq!(closed.name(), "closed");
/// assert!(closed.same_as(&State::new("closed")));
/// assert!(!closed.same_as(&State::new("opened")));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    name: String,
}

impl State {
    /// Create a state with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The state's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both states carry the same name.
    pub fn same_as(&self, other: &State) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(State::new("first_state").name(), "first_state");
        assert_eq!(State::from(String::from("second")).name(), "second");
    }

    #[test]
    fn same_instance_is_same_state() {
        let state = State::new("a_state");
        assert!(state.same_as(&state));
    }

    #[test]
    fn distinct_instances_with_same_name_are_equal() {
        let state_1 = State::new("a_state");
        let state_2 = State::new("a_state");

        assert!(state_1.same_as(&state_2));
        assert_eq!(state_1, state_2);
        assert_ne!(state_1, State::new("other"));
    }

    #[test]
    fn state_serializes_as_its_name() {
        let state = State::new("opened");
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"opened\"");

        let deserialized: State = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn display_prints_name() {
        assert_eq!(State::new("closed").to_string(), "closed");
    }
}
