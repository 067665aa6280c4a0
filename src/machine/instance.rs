//! Instance machines: one per host object.

use super::template::Template;
use crate::core::{Action, MachineError, State, Transition, TransitionHistory, TransitionRecord};
use crate::sync::{PropertyBinding, PropertyValue, Representation};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// State machine owned by a single host instance.
///
/// States and events are read from the shared [`Template`]; the current
/// state index and the transition history belong to this machine alone.
pub struct Machine<H> {
    template: Arc<Template<H>>,
    current: usize,
    history: TransitionHistory,
}

impl<H> Machine<H> {
    /// Attach a fresh instance to `template` and put it in the initial state.
    pub(crate) fn clone_and_freeze(template: Arc<Template<H>>) -> Result<Self, MachineError> {
        let history = match template.history_limit() {
            Some(limit) => TransitionHistory::with_limit(limit),
            None => TransitionHistory::new(),
        };
        let mut machine = Self {
            template,
            current: 0,
            history,
        };
        machine.init()?;
        Ok(machine)
    }

    /// Reset the current state to the template's initial state.
    pub fn init(&mut self) -> Result<(), MachineError> {
        self.current = self
            .template
            .initial_index()
            .ok_or(MachineError::InitialStateRequired)?;
        Ok(())
    }

    /// The shared template this machine was cloned from.
    pub fn template(&self) -> &Arc<Template<H>> {
        &self.template
    }

    /// The state this instance is in, without resynchronising.
    pub fn current_state(&self) -> &State {
        &self.template.states()[self.current]
    }

    /// Position of the current state in declaration order.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Whether the current state has the given name.
    pub fn is(&self, state: &str) -> bool {
        self.current_state().name() == state
    }

    /// Whether the current state has a different name.
    pub fn is_not(&self, state: &str) -> bool {
        !self.is(state)
    }

    /// The property binding declared on the template.
    pub fn binding(&self) -> Option<&PropertyBinding<H>> {
        self.template.binding()
    }

    /// Committed transitions, oldest first.
    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Drain the recorded transitions, e.g. to persist them elsewhere.
    pub fn take_history(&mut self) -> TransitionHistory {
        self.history.take()
    }

    /// Forget all recorded transitions.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Replace the history, applying this template's cap.
    pub(crate) fn restore_history(&mut self, mut history: TransitionHistory) {
        history.set_limit(self.template.history_limit());
        self.history = history;
    }

    /// Validate `transition` against the current state and apply it.
    ///
    /// On failure the current state is left unchanged.
    pub fn apply_transition(&mut self, transition: &Transition) -> Result<(), MachineError> {
        transition.validate(self.current_state())?;
        if let Some(target) = transition.target() {
            self.current = self.template.state_index_by_name(target.name())?;
        }
        Ok(())
    }

    /// Fire the named event's transition and record it.
    ///
    /// Only transitions with a target are recorded; an event without one
    /// leaves both the state and the history alone. Returns the event's
    /// action, if any, for the caller to run against the owning host.
    pub fn fire(&mut self, event: &str) -> Result<Option<Action<H>>, MachineError> {
        let template = Arc::clone(&self.template);
        let event = template.event_by_name(event)?;

        if let Some(transition) = event.transition() {
            let from = self.current_state().clone();
            if let Err(err) = self.apply_transition(transition) {
                debug!(event = event.name(), from = %from, error = %err, "Transition rejected");
                return Err(err);
            }

            if transition.target().is_some() {
                let to = self.current_state().clone();
                debug!(event = event.name(), from = %from, to = %to, "Transition committed");
                self.history.record(TransitionRecord {
                    event: event.name().to_string(),
                    from,
                    to,
                    timestamp: Utc::now(),
                });
            }
        }

        Ok(event.action().cloned())
    }

    /// The current state in the given representation.
    pub fn represent(&self, representation: Representation) -> PropertyValue {
        match representation {
            Representation::Name => PropertyValue::Name(self.current_state().name().to_string()),
            Representation::Index => PropertyValue::Index(self.current),
        }
    }

    /// Index of the state a property value designates.
    pub fn resolve(&self, value: &PropertyValue) -> Result<usize, MachineError> {
        match value {
            PropertyValue::Index(index) => {
                self.template.state_by_index(*index)?;
                Ok(*index)
            }
            PropertyValue::Name(name) => self.template.state_index_by_name(name),
        }
    }

    /// Move to the state at `index` without any transition check.
    ///
    /// Used to adopt a value read from the bound property.
    pub(crate) fn restore(&mut self, index: usize) -> Result<(), MachineError> {
        self.template.state_by_index(index)?;
        self.current = index;
        Ok(())
    }
}

impl<H> fmt::Debug for Machine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", self.current_state())
            .field("transitions", &self.history.len())
            .finish_non_exhaustive()
    }
}
