//! Builder for state machine templates.

use crate::builder::event::EventDeclaration;
use crate::core::{Event, MachineError, State};
use crate::machine::Template;
use crate::sync::{PersistenceStrategy, PropertyBinding, Representation};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A state machine under declaration.
///
/// Every registration either succeeds or leaves the builder exactly as it
/// was. Once complete, `build()` freezes it into a [`Template`] that cannot be
/// structurally changed any more.
pub struct StateMachineBuilder<H> {
    states: Vec<State>,
    events: Vec<Event<H>>,
    initial: Option<usize>,
    binding: Option<PropertyBinding<H>>,
    history_limit: Option<usize>,
}

impl<H> StateMachineBuilder<H> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            events: Vec::new(),
            initial: None,
            binding: None,
            history_limit: None,
        }
    }

    /// Register a state. Fails if a state with the same name exists.
    pub fn register_state(&mut self, state: State) -> Result<&mut Self, MachineError> {
        if self.states.iter().any(|existing| existing.same_as(&state)) {
            return Err(MachineError::DuplicateState(state.name().to_string()));
        }
        self.states.push(state);
        Ok(self)
    }

    /// Register an event. Fails if an event with the same name exists.
    pub fn register_event(&mut self, event: Event<H>) -> Result<&mut Self, MachineError> {
        if self.events.iter().any(|existing| existing.same_as(&event)) {
            return Err(MachineError::DuplicateEvent(event.name().to_string()));
        }
        self.events.push(event);
        Ok(self)
    }

    /// Register `state` and make it the initial state.
    ///
    /// Calling this again registers another state and moves the initial
    /// pointer to it; the previous initial state stays registered.
    pub fn set_initial_state(&mut self, state: State) -> Result<&mut Self, MachineError> {
        self.register_state(state)?;
        self.initial = Some(self.states.len() - 1);
        Ok(self)
    }

    /// Declare the initial state by name.
    ///
    /// ```rust
    /// use ssm::StateMachineBuilder;
    ///
    /// let mut builder = StateMachineBuilder::<()>::new();
    /// builder.declare_initial_state("closed").unwrap();
    /// assert_eq!(builder.initial_state().unwrap().name(), "closed");
    /// ```
    pub fn declare_initial_state(
        &mut self,
        name: impl Into<String>,
    ) -> Result<&mut Self, MachineError> {
        self.set_initial_state(State::new(name))
    }

    /// Declare an additional state by name.
    pub fn declare_state(&mut self, name: impl Into<String>) -> Result<&mut Self, MachineError> {
        self.register_state(State::new(name))
    }

    /// Resolve and register an event declaration.
    pub fn declare_event(
        &mut self,
        declaration: EventDeclaration<H>,
    ) -> Result<&mut Self, MachineError> {
        let event = declaration.resolve(&self.states)?;
        self.register_event(event)
    }

    /// Attach (or replace) the action of an already declared event.
    pub fn action<F>(&mut self, event: &str, action: F) -> Result<&mut Self, MachineError>
    where
        F: Fn(&mut H, &[Value]) -> Result<Value, MachineError> + Send + Sync + 'static,
    {
        let event = self
            .events
            .iter_mut()
            .find(|existing| existing.name() == event)
            .ok_or_else(|| MachineError::UndefinedEvent(event.to_string()))?;
        event.set_action(Arc::new(action));
        Ok(self)
    }

    /// Bind a host property that mirrors the current state.
    ///
    /// Fails with `InvalidBinding` when the strategy can only store a
    /// different representation.
    pub fn bind_property<S>(
        &mut self,
        property: impl Into<String>,
        representation: Representation,
        strategy: S,
    ) -> Result<&mut Self, MachineError>
    where
        S: PersistenceStrategy<H> + 'static,
    {
        let property = property.into();
        if let Some(found) = strategy.representation() {
            if found != representation {
                return Err(MachineError::InvalidBinding {
                    property,
                    expected: representation,
                    found,
                });
            }
        }
        self.binding = Some(PropertyBinding::new(
            property,
            representation,
            Arc::new(strategy),
        ));
        Ok(self)
    }

    /// Keep at most `limit` transition records per instance.
    ///
    /// Instances keep their whole history when no limit is set.
    pub fn limit_history(&mut self, limit: usize) -> &mut Self {
        self.history_limit = Some(limit);
        self
    }

    /// Look up a declared state by name.
    pub fn state_by_name(&self, name: &str) -> Result<&State, MachineError> {
        self.states
            .iter()
            .find(|state| state.name() == name)
            .ok_or_else(|| MachineError::UndefinedState(name.to_string()))
    }

    /// Position of the named state in declaration order.
    pub fn state_index_by_name(&self, name: &str) -> Result<usize, MachineError> {
        self.states
            .iter()
            .position(|state| state.name() == name)
            .ok_or_else(|| MachineError::UndefinedState(name.to_string()))
    }

    /// Look up a declared event by name.
    pub fn event_by_name(&self, name: &str) -> Result<&Event<H>, MachineError> {
        self.events
            .iter()
            .find(|event| event.name() == name)
            .ok_or_else(|| MachineError::UndefinedEvent(name.to_string()))
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Declared events in declaration order.
    pub fn events(&self) -> &[Event<H>] {
        &self.events
    }

    /// The current initial state, if one was declared.
    pub fn initial_state(&self) -> Option<&State> {
        self.initial.map(|index| &self.states[index])
    }

    /// Freeze the declarations into a template.
    ///
    /// A missing initial state is not an error here; it is reported when the
    /// template is first instantiated.
    pub fn build(self) -> Template<H> {
        debug!(
            states = self.states.len(),
            events = self.events.len(),
            initial = ?self.initial_state().map(State::name),
            bound_property = ?self.binding.as_ref().map(PropertyBinding::property),
            history_limit = ?self.history_limit,
            "Built state machine template"
        );
        Template::from_parts(
            self.states,
            self.events,
            self.initial,
            self.binding,
            self.history_limit,
        )
    }
}

impl<H> Default for StateMachineBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for StateMachineBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachineBuilder")
            .field("states", &self.states)
            .field("events", &self.events)
            .field("initial", &self.initial_state())
            .field("binding", &self.binding)
            .finish()
    }
}
