//! SSM: a simple finite-state machine engine.
//!
//! A host type declares a fixed set of named states, an initial state and
//! named events that move its instances between states while running an
//! action. The declarations form a shared, read-only template; every host
//! instance owns its own machine cloned from that template.
//!
//! # Core Concepts
//!
//! - **State / Event / Transition**: immutable values compared by name
//! - **Template**: the frozen per-type definition built by a [`StateMachineBuilder`]
//! - **Machine**: the per-instance clone holding the current state
//! - **Registry**: explicit map from host type to template
//! - **Property synchronisation**: mirrors the current state into a host
//!   property through a [`PersistenceStrategy`]
//!
//! # Example
//!
//! ```rust
//! use ssm::{EventDeclaration, Machine, MachineError, Stateful, TemplateRegistry};
//! use serde_json::Value;
//!
//! struct Door {
//!     machine: Machine<Door>,
//!     opened: u32,
//! }
//!
//! impl Stateful for Door {
//!     fn state_machine(&self) -> &Machine<Self> {
//!         &self.machine
//!     }
//!
//!     fn state_machine_mut(&mut self) -> &mut Machine<Self> {
//!         &mut self.machine
//!     }
//! }
//!
//! let mut registry = TemplateRegistry::new();
//! registry
//!     .adopt::<Door, _>(|builder| {
//!         builder.declare_initial_state("closed")?.declare_state("opened")?;
//!         builder.declare_event(
//!             EventDeclaration::new("open")
//!                 .from(["closed"])
//!                 .to("opened")
//!                 .action(|door: &mut Door, _args: &[Value]| {
//!                     door.opened += 1;
//!                     Ok(Value::Null)
//!                 }),
//!         )?;
//!         builder.declare_event(EventDeclaration::new("close").from(["opened"]).to("closed"))?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let mut door = registry
//!     .instantiate(|machine| Door { machine, opened: 0 })
//!     .unwrap();
//!
//! door.trigger("open", &[]).unwrap();
//! assert!(door.is("opened").unwrap());
//! assert!(matches!(
//!     door.trigger("open", &[]),
//!     Err(MachineError::InvalidTransition { .. })
//! ));
//! door.trigger("close", &[]).unwrap();
//! assert_eq!(door.opened, 1);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod host;
pub mod machine;
pub mod registry;
pub mod sync;

// Re-export commonly used types
pub use builder::{EventDeclaration, StateMachineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use config::{ConfigError, MachineDefinition};
pub use self::core::{Action, Event, MachineError, State, Transition, TransitionHistory};
pub use host::{instantiate, Stateful};
pub use machine::{Machine, Template};
pub use registry::TemplateRegistry;
pub use sync::{PersistenceStrategy, PropertyBinding, PropertyValue, Representation};
