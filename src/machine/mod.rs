//! Templates and the instance machines cloned from them.
//!
//! A [`Template`] is the frozen definition of a host type's machine. Each host
//! instance owns a [`Machine`], which points at the shared template and keeps
//! its own current state, so instances never observe each other's transitions.

mod instance;
mod template;

pub use instance::Machine;
pub use template::Template;
