//! Runtime surface for host objects that own a state machine.

use crate::core::MachineError;
use crate::machine::{Machine, Template};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// A host object that owns an instance [`Machine`].
///
/// Implementors only provide access to their machine; triggering events,
/// state queries and property synchronisation come from the provided methods.
///
/// ```rust
/// use ssm::builder::{EventDeclaration, StateMachineBuilder};
/// use ssm::host::{instantiate, Stateful};
/// use ssm::machine::Machine;
/// use std::sync::Arc;
///
/// struct Door {
///     machine: Machine<Door>,
/// }
///
/// impl Stateful for Door {
///     fn state_machine(&self) -> &Machine<Self> {
///         &self.machine
///     }
///
///     fn state_machine_mut(&mut self) -> &mut Machine<Self> {
///         &mut self.machine
///     }
/// }
///
/// let mut builder = StateMachineBuilder::new();
/// builder.declare_initial_state("closed").unwrap();
/// builder.declare_state("opened").unwrap();
/// builder
///     .declare_event(EventDeclaration::new("open").from(["closed"]).to("opened"))
///     .unwrap();
/// let template = Arc::new(builder.build());
///
/// let mut door = instantiate(&template, |machine| Door { machine }).unwrap();
/// door.trigger("open", &[]).unwrap();
/// assert!(door.is("opened").unwrap());
/// assert!(door.trigger("open", &[]).is_err());
/// ```
pub trait Stateful: Sized {
    fn state_machine(&self) -> &Machine<Self>;

    fn state_machine_mut(&mut self) -> &mut Machine<Self>;

    /// Reconcile the machine with the bound property, if any.
    ///
    /// An unset property is initialised from the current state. A set
    /// property that designates another state wins and becomes the current
    /// state. Fails when the property designates no declared state.
    fn synchronize_state(&mut self) -> Result<(), MachineError> {
        let Some(binding) = self.state_machine().binding().cloned() else {
            return Ok(());
        };

        match binding.strategy().get(self, binding.property()) {
            None => {
                let value = self.state_machine().represent(binding.representation());
                trace!(property = binding.property(), %value, "Initialising unset state property");
                binding.strategy().set(self, binding.property(), value);
            }
            Some(value) => {
                let machine = self.state_machine_mut();
                let index = machine.resolve(&value)?;
                if index != machine.current_index() {
                    debug!(
                        property = binding.property(),
                        %value,
                        from = %machine.current_state(),
                        "Adopting state from property"
                    );
                    machine.restore(index)?;
                }
            }
        }
        Ok(())
    }

    /// Write the current state into the bound property, if any.
    fn write_state_property(&mut self) {
        if let Some(binding) = self.state_machine().binding().cloned() {
            let value = self.state_machine().represent(binding.representation());
            trace!(property = binding.property(), %value, "Writing state property");
            binding.strategy().set(self, binding.property(), value);
        }
    }

    /// Fire the named event.
    ///
    /// Resynchronises, validates and applies the transition, writes the bound
    /// property, then runs the event's action with `args` and returns its
    /// result (`Value::Null` when the event has no action). A rejected
    /// transition changes neither the state nor the property.
    fn trigger(&mut self, event: &str, args: &[Value]) -> Result<Value, MachineError> {
        self.synchronize_state()?;
        let action = self.state_machine_mut().fire(event)?;
        self.write_state_property();
        match action {
            Some(action) => action(self, args),
            None => Ok(Value::Null),
        }
    }

    fn is(&mut self, state: &str) -> Result<bool, MachineError> {
        self.synchronize_state()?;
        Ok(self.state_machine().is(state))
    }

    fn is_not(&mut self, state: &str) -> Result<bool, MachineError> {
        self.synchronize_state()?;
        Ok(self.state_machine().is_not(state))
    }

    fn current_state_name(&mut self) -> Result<String, MachineError> {
        self.synchronize_state()?;
        Ok(self.state_machine().current_state().name().to_string())
    }
}

/// Create a host instance around a fresh machine cloned from `template`.
///
/// `build` receives the machine and returns the host. The binding strategy's
/// `setup` runs next, followed by a first synchronisation unless `setup`
/// deferred it, so a host built from persisted data starts in the persisted
/// state.
pub fn instantiate<H, F>(template: &Arc<Template<H>>, build: F) -> Result<H, MachineError>
where
    H: Stateful,
    F: FnOnce(Machine<H>) -> H,
{
    let machine = template.instantiate()?;
    let mut host = build(machine);

    let synchronize = match host.state_machine().binding().cloned() {
        Some(binding) => binding.strategy().setup(&mut host, binding.property()),
        None => true,
    };
    if synchronize {
        host.synchronize_state()?;
    }
    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{EventDeclaration, StateMachineBuilder};
    use crate::sync::{IndexBacked, NameBacked, PersistenceStrategy, PropertyValue, Representation};

    struct Baz {
        machine: Machine<Baz>,
        my_state: Option<usize>,
        opened: usize,
    }

    impl Stateful for Baz {
        fn state_machine(&self) -> &Machine<Self> {
            &self.machine
        }

        fn state_machine_mut(&mut self) -> &mut Machine<Self> {
            &mut self.machine
        }
    }

    fn baz_template() -> Arc<Template<Baz>> {
        let mut builder = StateMachineBuilder::new();
        builder.declare_initial_state("first_state").unwrap();
        builder.declare_state("second_state").unwrap();
        builder.declare_state("third_state").unwrap();
        builder
            .declare_event(
                EventDeclaration::new("open")
                    .from(["first_state"])
                    .to("second_state")
                    .action(|baz: &mut Baz, _| {
                        baz.opened += 1;
                        Ok(Value::from(baz.opened))
                    }),
            )
            .unwrap();
        builder
            .declare_event(
                EventDeclaration::new("echo")
                    .to("first_state")
                    .action(|_, args| Ok(Value::Array(args.to_vec()))),
            )
            .unwrap();
        builder
            .declare_event(
                EventDeclaration::new("jam")
                    .from(["first_state"])
                    .to("third_state")
                    .action(|_, _| Err(MachineError::action_failed("hinge jammed"))),
            )
            .unwrap();
        builder
            .bind_property(
                "my_state",
                Representation::Index,
                IndexBacked::new(|b: &Baz| b.my_state, |b: &mut Baz, i| b.my_state = Some(i)),
            )
            .unwrap();
        Arc::new(builder.build())
    }

    fn new_baz() -> Baz {
        instantiate(&baz_template(), |machine| Baz {
            machine,
            my_state: None,
            opened: 0,
        })
        .unwrap()
    }

    #[test]
    fn instantiation_initialises_property() {
        let baz = new_baz();
        assert_eq!(baz.my_state, Some(0));
    }

    #[test]
    fn instantiation_adopts_loaded_property() {
        let baz = instantiate(&baz_template(), |machine| Baz {
            machine,
            my_state: Some(2),
            opened: 0,
        })
        .unwrap();

        assert!(baz.state_machine().is("third_state"));
    }

    #[test]
    fn trigger_runs_action_and_updates_property() {
        let mut baz = new_baz();

        let result = baz.trigger("open", &[]).unwrap();

        assert_eq!(result, Value::from(1));
        assert_eq!(baz.my_state, Some(1));
        assert!(baz.is("second_state").unwrap());
    }

    #[test]
    fn failed_trigger_leaves_state_property_and_host_untouched() {
        let mut baz = new_baz();
        baz.trigger("open", &[]).unwrap();

        let result = baz.trigger("open", &[]);

        assert!(matches!(result, Err(MachineError::InvalidTransition { .. })));
        assert_eq!(baz.my_state, Some(1));
        assert_eq!(baz.opened, 1);
    }

    #[test]
    fn failing_action_reports_error_after_commit() {
        let mut baz = new_baz();

        let result = baz.trigger("jam", &[]);

        assert_eq!(result, Err(MachineError::ActionFailed("hinge jammed".into())));
        assert!(baz.state_machine().is("third_state"));
        assert_eq!(baz.my_state, Some(2));
        assert_eq!(baz.state_machine().history().last().unwrap().event, "jam");
    }

    #[test]
    fn actions_receive_arguments() {
        let mut baz = new_baz();
        let args = [Value::from(1), Value::from(2), Value::from(3)];

        assert_eq!(baz.trigger("echo", &args).unwrap(), serde_json::json!([1, 2, 3]));
        assert_eq!(
            baz.trigger("echo", &[serde_json::json!({"one": 1})]).unwrap(),
            serde_json::json!([{"one": 1}])
        );
    }

    #[test]
    fn queries_follow_external_property_changes() {
        let mut baz = new_baz();
        assert!(!baz.is("second_state").unwrap());

        baz.my_state = Some(1);

        assert!(baz.is_not("first_state").unwrap());
        assert_eq!(baz.current_state_name().unwrap(), "second_state");
    }

    #[test]
    fn unset_property_is_reinitialised() {
        let mut baz = new_baz();
        baz.my_state = None;

        baz.synchronize_state().unwrap();

        assert_eq!(baz.my_state, Some(0));
        assert!(baz.state_machine().is("first_state"));
    }

    #[test]
    fn out_of_range_property_is_reported() {
        let mut baz = new_baz();
        baz.my_state = Some(7);

        assert!(matches!(
            baz.is("first_state"),
            Err(MachineError::StateIndexOutOfRange { index: 7, len: 3 })
        ));
    }

    struct Deferred;

    impl PersistenceStrategy<Baz> for Deferred {
        fn setup(&self, _host: &mut Baz, _property: &str) -> bool {
            false
        }

        fn get(&self, host: &Baz, _property: &str) -> Option<PropertyValue> {
            host.my_state.map(PropertyValue::Index)
        }

        fn set(&self, host: &mut Baz, _property: &str, value: PropertyValue) {
            if let PropertyValue::Index(index) = value {
                host.my_state = Some(index);
            }
        }
    }

    fn deferred_template() -> Arc<Template<Baz>> {
        let mut builder = StateMachineBuilder::new();
        builder.declare_initial_state("first_state").unwrap();
        builder.declare_state("second_state").unwrap();
        builder
            .bind_property("my_state", Representation::Index, Deferred)
            .unwrap();
        Arc::new(builder.build())
    }

    #[test]
    fn setup_can_defer_first_synchronisation() {
        let mut fresh = instantiate(&deferred_template(), |machine| Baz {
            machine,
            my_state: None,
            opened: 0,
        })
        .unwrap();
        assert_eq!(fresh.my_state, None);

        assert!(fresh.is("first_state").unwrap());
        assert_eq!(fresh.my_state, Some(0));

        let mut loaded = instantiate(&deferred_template(), |machine| Baz {
            machine,
            my_state: Some(1),
            opened: 0,
        })
        .unwrap();
        assert!(loaded.state_machine().is("first_state"));

        assert_eq!(loaded.current_state_name().unwrap(), "second_state");
    }

    #[test]
    fn deferred_setup_skips_invalid_stored_value_until_accessed() {
        let mut loaded = instantiate(&deferred_template(), |machine| Baz {
            machine,
            my_state: Some(9),
            opened: 0,
        })
        .unwrap();

        assert!(matches!(
            loaded.is("first_state"),
            Err(MachineError::StateIndexOutOfRange { index: 9, len: 2 })
        ));
    }

    struct Lamp {
        machine: Machine<Lamp>,
        status: Option<String>,
    }

    impl Stateful for Lamp {
        fn state_machine(&self) -> &Machine<Self> {
            &self.machine
        }

        fn state_machine_mut(&mut self) -> &mut Machine<Self> {
            &mut self.machine
        }
    }

    #[test]
    fn name_backed_property_tracks_state_names() {
        let mut builder = StateMachineBuilder::new();
        builder.declare_initial_state("off").unwrap();
        builder.declare_state("on").unwrap();
        builder
            .declare_event(EventDeclaration::new("switch_on").from(["off"]).to("on"))
            .unwrap();
        builder
            .bind_property(
                "status",
                Representation::Name,
                NameBacked::new(|l: &Lamp| l.status.clone(), |l: &mut Lamp, n| l.status = Some(n)),
            )
            .unwrap();
        let template = Arc::new(builder.build());

        let mut lamp = instantiate(&template, |machine| Lamp {
            machine,
            status: None,
        })
        .unwrap();
        assert_eq!(lamp.status.as_deref(), Some("off"));

        lamp.trigger("switch_on", &[]).unwrap();
        assert_eq!(lamp.status.as_deref(), Some("on"));
    }
}
