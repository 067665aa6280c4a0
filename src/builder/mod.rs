//! Declaration API for state machine templates.
//!
//! A host type declares its states, events and optional property binding on
//! a [`StateMachineBuilder`], then freezes it into a template with `build()`
//! (or lets a [`TemplateRegistry`](crate::registry::TemplateRegistry) do so).

mod event;
mod machine;

pub use event::EventDeclaration;
pub use machine::StateMachineBuilder;
