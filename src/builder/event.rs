//! Declaration of a single event.

use crate::core::{Action, Event, MachineError, State, Transition};
use serde_json::Value;
use std::sync::Arc;

/// Builder for declaring an event by state names.
///
/// Names are resolved against the states already declared on the machine
/// when the declaration is registered, so states must be declared first.
///
/// ```rust
/// use ssm::builder::{EventDeclaration, StateMachineBuilder};
/// use serde_json::Value;
///
/// struct Door;
///
/// let mut builder = StateMachineBuilder::<Door>::new();
/// builder.declare_initial_state("closed").unwrap();
/// builder.declare_state("opened").unwrap();
/// builder
///     .declare_event(
///         EventDeclaration::new("open")
///             .from(["closed"])
///             .to("opened")
///             .action(|_door: &mut Door, _args: &[Value]| Ok(Value::Null)),
///     )
///     .unwrap();
/// ```
pub struct EventDeclaration<H> {
    name: String,
    from: Vec<String>,
    to: Option<String>,
    action: Option<Action<H>>,
}

impl<H> EventDeclaration<H> {
    /// Start declaring the event `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: Vec::new(),
            to: None,
            action: None,
        }
    }

    /// Set the allowed origin states. Leaving this empty allows the event
    /// from any state.
    pub fn from<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from = states.into_iter().map(Into::into).collect();
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Set the action run after a successful transition (optional).
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut H, &[Value]) -> Result<Value, MachineError> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Name of the event being declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the declaration into an event against the declared states.
    pub(crate) fn resolve(self, states: &[State]) -> Result<Event<H>, MachineError> {
        let to = self.to.ok_or_else(|| {
            MachineError::invalid_transition(format!(
                "event '{}' has no target state; use a plain method if no transition is needed",
                self.name
            ))
        })?;

        let origins = self
            .from
            .iter()
            .map(|name| lookup(states, name))
            .collect::<Result<Vec<_>, _>>()?;
        let target = lookup(states, &to)?;

        let mut event = Event::new(self.name).with_transition(Transition::new(origins, Some(target)));
        if let Some(action) = self.action {
            event.set_action(action);
        }
        Ok(event)
    }
}

fn lookup(states: &[State], name: &str) -> Result<State, MachineError> {
    states
        .iter()
        .find(|state| state.name() == name)
        .cloned()
        .ok_or_else(|| MachineError::UndefinedState(name.to_string()))
}
