//! Registry of state machine templates keyed by host type.
//!
//! The registry is an explicit object rather than ambient global state:
//! whoever sets up host types owns it and hands it to the code that creates
//! instances. Lifecycle per host type:
//!
//! - `adopt` declares the template the first time; later calls are no-ops
//! - `redeclare` always builds a fresh template and replaces the old one
//! - after that the entry is only read, once per instantiation

use crate::builder::StateMachineBuilder;
use crate::core::MachineError;
use crate::host::{self, Stateful};
use crate::machine::{Machine, Template};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Templates for every host type that adopted a state machine.
#[derive(Default)]
pub struct TemplateRegistry {
    templates: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the template for `H` unless one is already registered.
    ///
    /// Adopting an already registered type returns the existing template
    /// without running `declare`.
    pub fn adopt<H, F>(&mut self, declare: F) -> Result<Arc<Template<H>>, MachineError>
    where
        H: 'static,
        F: FnOnce(&mut StateMachineBuilder<H>) -> Result<(), MachineError>,
    {
        if let Some(existing) = self.template::<H>() {
            trace!(host = type_name::<H>(), "State machine already adopted");
            return Ok(existing);
        }
        self.redeclare(declare)
    }

    /// Declare `H` from scratch, replacing any previous template.
    ///
    /// The previous template is never reused or merged. If `declare` fails
    /// the type is left without a template.
    pub fn redeclare<H, F>(&mut self, declare: F) -> Result<Arc<Template<H>>, MachineError>
    where
        H: 'static,
        F: FnOnce(&mut StateMachineBuilder<H>) -> Result<(), MachineError>,
    {
        let replaced = self.templates.remove(&TypeId::of::<H>()).is_some();

        let mut builder = StateMachineBuilder::new();
        declare(&mut builder)?;
        let template = Arc::new(builder.build());

        self.templates
            .insert(TypeId::of::<H>(), Arc::clone(&template) as Arc<dyn Any + Send + Sync>);
        debug!(host = type_name::<H>(), replaced, "Registered state machine template");
        Ok(template)
    }

    /// The template registered for `H`, if any.
    pub fn template<H: 'static>(&self) -> Option<Arc<Template<H>>> {
        self.templates
            .get(&TypeId::of::<H>())
            .cloned()
            .and_then(|template| template.downcast::<Template<H>>().ok())
    }

    /// Whether `H` currently has a template.
    pub fn contains<H: 'static>(&self) -> bool {
        self.templates.contains_key(&TypeId::of::<H>())
    }

    /// Forget the template for `H`. Returns whether one was registered.
    pub fn remove<H: 'static>(&mut self) -> bool {
        self.templates.remove(&TypeId::of::<H>()).is_some()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Create a host instance from the template registered for `H`.
    pub fn instantiate<H, F>(&self, build: F) -> Result<H, MachineError>
    where
        H: Stateful + 'static,
        F: FnOnce(Machine<H>) -> H,
    {
        let template = self
            .template::<H>()
            .ok_or(MachineError::UnregisteredType(type_name::<H>()))?;
        host::instantiate(&template, build)
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.templates.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EventDeclaration;

    struct Door {
        machine: Machine<Door>,
    }

    impl Stateful for Door {
        fn state_machine(&self) -> &Machine<Self> {
            &self.machine
        }

        fn state_machine_mut(&mut self) -> &mut Machine<Self> {
            &mut self.machine
        }
    }

    struct Window;

    fn declare_door(builder: &mut StateMachineBuilder<Door>) -> Result<(), MachineError> {
        builder.declare_initial_state("closed")?.declare_state("opened")?;
        builder.declare_event(EventDeclaration::new("open").from(["closed"]).to("opened"))?;
        Ok(())
    }

    #[test]
    fn adopt_registers_template_once() {
        let mut registry = TemplateRegistry::new();

        let first = registry.adopt(declare_door).unwrap();
        let second = registry
            .adopt::<Door, _>(|_| panic!("declaration must not run twice"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn redeclare_replaces_template() {
        let mut registry = TemplateRegistry::new();
        let original = registry.adopt(declare_door).unwrap();

        let replacement = registry
            .redeclare::<Door, _>(|builder| {
                builder.declare_initial_state("ajar")?;
                Ok(())
            })
            .unwrap();

        assert!(!Arc::ptr_eq(&original, &replacement));
        assert_eq!(registry.template::<Door>().unwrap().states().len(), 1);
        assert_eq!(original.states().len(), 2);
    }

    #[test]
    fn failed_declaration_leaves_type_unusable() {
        let mut registry = TemplateRegistry::new();
        registry.adopt(declare_door).unwrap();

        let result = registry.redeclare::<Door, _>(|builder| {
            builder.declare_state("active")?;
            builder.declare_state("active")?;
            Ok(())
        });

        assert!(matches!(result, Err(MachineError::DuplicateState(_))));
        assert!(!registry.contains::<Door>());
        assert!(matches!(
            registry.instantiate(|machine| Door { machine }),
            Err(MachineError::UnregisteredType(_))
        ));
    }

    #[test]
    fn templates_are_kept_per_type() {
        let mut registry = TemplateRegistry::new();
        registry.adopt(declare_door).unwrap();
        registry
            .adopt::<Window, _>(|builder| {
                builder.declare_initial_state("shut")?;
                Ok(())
            })
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.template::<Window>().unwrap().initial_state().unwrap().name(),
            "shut"
        );
        assert!(registry.remove::<Window>());
        assert!(!registry.remove::<Window>());
    }

    #[test]
    fn instantiate_uses_registered_template() {
        let mut registry = TemplateRegistry::new();
        registry.adopt(declare_door).unwrap();

        let mut door = registry.instantiate(|machine| Door { machine }).unwrap();
        door.trigger("open", &[]).unwrap();

        assert!(door.is("opened").unwrap());
    }

    #[test]
    fn instantiation_requires_initial_state() {
        let mut registry = TemplateRegistry::new();
        registry
            .adopt::<Door, _>(|builder| {
                builder.declare_state("foo_state")?;
                Ok(())
            })
            .unwrap();

        assert_eq!(
            registry.instantiate(|machine| Door { machine }).err(),
            Some(MachineError::InitialStateRequired)
        );
    }
}
