//! Frozen machine definitions shared by all instances of a host type.

use super::instance::Machine;
use crate::core::{Event, MachineError, State};
use crate::sync::PropertyBinding;
use std::fmt;
use std::sync::Arc;

/// The declaration-time machine of a host type.
///
/// A template has no mutating methods: once built it is shared read-only,
/// usually behind an `Arc`, by every instance machine created from it.
pub struct Template<H> {
    states: Vec<State>,
    events: Vec<Event<H>>,
    initial: Option<usize>,
    binding: Option<PropertyBinding<H>>,
    history_limit: Option<usize>,
}

impl<H> Template<H> {
    pub(crate) fn from_parts(
        states: Vec<State>,
        events: Vec<Event<H>>,
        initial: Option<usize>,
        binding: Option<PropertyBinding<H>>,
        history_limit: Option<usize>,
    ) -> Self {
        Self {
            states,
            events,
            initial,
            binding,
            history_limit,
        }
    }

    /// Check that the template can be instantiated.
    pub fn validate(&self) -> Result<(), MachineError> {
        match self.initial {
            Some(_) => Ok(()),
            None => Err(MachineError::InitialStateRequired),
        }
    }

    /// Validate, then produce an instance machine in the initial state.
    ///
    /// The instance shares this template's states and events and owns its
    /// current-state cell exclusively.
    pub fn instantiate(self: &Arc<Self>) -> Result<Machine<H>, MachineError> {
        self.validate()?;
        Machine::clone_and_freeze(Arc::clone(self))
    }

    /// States in declaration order; a state's position is its index.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Events in declaration order.
    pub fn events(&self) -> &[Event<H>] {
        &self.events
    }

    /// The state every new instance starts in.
    pub fn initial_state(&self) -> Option<&State> {
        self.initial.map(|index| &self.states[index])
    }

    pub(crate) fn initial_index(&self) -> Option<usize> {
        self.initial
    }

    /// The bound host property, if any.
    pub fn binding(&self) -> Option<&PropertyBinding<H>> {
        self.binding.as_ref()
    }

    /// Maximum number of transition records an instance keeps.
    pub fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }

    /// Look up a state by name, failing with `UndefinedState`.
    pub fn state_by_name(&self, name: &str) -> Result<&State, MachineError> {
        self.state_index_by_name(name)
            .map(|index| &self.states[index])
    }

    /// Position of the named state in declaration order.
    pub fn state_index_by_name(&self, name: &str) -> Result<usize, MachineError> {
        self.states
            .iter()
            .position(|state| state.name() == name)
            .ok_or_else(|| MachineError::UndefinedState(name.to_string()))
    }

    /// The state at `index` in declaration order.
    ///
    /// ```rust
    /// use ssm::{MachineError, StateMachineBuilder};
    ///
    /// let mut builder = StateMachineBuilder::<()>::new();
    /// builder.declare_initial_state("s1").unwrap().declare_state("s2").unwrap();
    /// let template = builder.build();
    ///
    /// assert_eq!(template.state_by_index(1).unwrap().name(), "s2");
    /// assert_eq!(
    ///     template.state_by_index(2),
    ///     Err(MachineError::StateIndexOutOfRange { index: 2, len: 2 })
    /// );
    /// ```
    pub fn state_by_index(&self, index: usize) -> Result<&State, MachineError> {
        self.states
            .get(index)
            .ok_or(MachineError::StateIndexOutOfRange {
                index,
                len: self.states.len(),
            })
    }

    /// Look up an event by name, failing with `UndefinedEvent`.
    pub fn event_by_name(&self, name: &str) -> Result<&Event<H>, MachineError> {
        self.events
            .iter()
            .find(|event| event.name() == name)
            .ok_or_else(|| MachineError::UndefinedEvent(name.to_string()))
    }
}

impl<H> fmt::Debug for Template<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("states", &self.states)
            .field("events", &self.events)
            .field("initial", &self.initial_state())
            .field("binding", &self.binding)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}
