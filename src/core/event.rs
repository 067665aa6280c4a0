//! Named events and their actions.

use super::error::MachineError;
use super::transition::Transition;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Callback run after an event's transition succeeds.
///
/// The owning host is passed explicitly along with the caller's arguments.
/// Whatever the action returns is handed back from `trigger`.
pub type Action<H> = Arc<dyn Fn(&mut H, &[Value]) -> Result<Value, MachineError> + Send + Sync>;

/// A named trigger carrying an optional transition and an optional action.
///
/// Events compare equal when their names match.
///
/// # Example
///
/// ```rust
/// use ssm::core::{Event, State, Transition};
/// use serde_json::Value;
///
/// struct Door {
///     slams: u32,
/// }
///
/// let slam = Event::<Door>::new("slam")
///     .with_transition(Transition::any(State::new("closed")))
///     .with_action(|door, _args| {
///         door.slams += 1;
///         Ok(Value::Null)
///     });
///
/// assert!(slam.transition().unwrap().is_wildcard());
/// assert!(slam.same_as(&Event::new("slam")));
/// ```
pub struct Event<H> {
    name: String,
    transition: Option<Transition>,
    action: Option<Action<H>>,
}

impl<H> Event<H> {
    /// Create an event with neither transition nor action.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transition: None,
            action: None,
        }
    }

    /// Attach the transition this event applies.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Attach the action run after a committed transition.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut H, &[Value]) -> Result<Value, MachineError> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The transition, `None` for events that never move.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// The action, if one was attached.
    pub fn action(&self) -> Option<&Action<H>> {
        self.action.as_ref()
    }

    pub(crate) fn set_action(&mut self, action: Action<H>) {
        self.action = Some(action);
    }

    /// True when both events carry the same name.
    pub fn same_as(&self, other: &Event<H>) -> bool {
        self.name == other.name
    }
}

impl<H> Clone for Event<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            transition: self.transition.clone(),
            action: self.action.as_ref().map(Arc::clone),
        }
    }
}

impl<H> PartialEq for Event<H> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<H> fmt::Debug for Event<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("transition", &self.transition)
            .field("action", &self.action.is_some())
            .finish()
    }
}
