//! Synchronisation between a machine's current state and a host-owned property.
//!
//! A host may bind one of its properties (typically a persisted column) to the
//! machine. The property stores the current state either by name or by its
//! index in declaration order. The machine writes the property after every
//! committed transition and, before any read or trigger, reconciles itself
//! with whatever the property holds:
//!
//! - property unset: the property is initialised from the current state
//! - property set and different: the property wins and the current state is
//!   recomputed from it
//!
//! Reading and writing the property is delegated to a [`PersistenceStrategy`],
//! so the engine never knows how values are stored.

mod strategies;

pub use strategies::{AttributeStrategy, Attributes, IndexBacked, NameBacked, NoOp};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How the current state is represented in the bound property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// The state's name
    #[default]
    Name,
    /// The state's position in declaration order
    Index,
}

/// Value held by a bound property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Index(usize),
    Name(String),
}

impl PropertyValue {
    /// Which representation this value uses.
    pub fn representation(&self) -> Representation {
        match self {
            Self::Index(_) => Representation::Index,
            Self::Name(_) => Representation::Name,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for PropertyValue {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PropertyValue {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Reads and writes the host property that mirrors the current state.
///
/// Implementations only move values around; deciding when to read or write
/// is the engine's job.
pub trait PersistenceStrategy<H>: Send + Sync {
    /// Called once when a host instance is created.
    ///
    /// Returns whether the engine should synchronise right away. Returning
    /// `false` defers the first synchronisation to the first query or
    /// trigger, e.g. for records whose stored value is not loaded yet.
    fn setup(&self, _host: &mut H, _property: &str) -> bool {
        true
    }

    /// Current value of the property, `None` when unset.
    fn get(&self, host: &H, property: &str) -> Option<PropertyValue>;

    /// Store a new value in the property.
    fn set(&self, host: &mut H, property: &str, value: PropertyValue);

    /// The only representation this strategy can store, if it is fixed.
    fn representation(&self) -> Option<Representation> {
        None
    }
}

/// Property binding configured on a template.
pub struct PropertyBinding<H> {
    property: String,
    representation: Representation,
    strategy: Arc<dyn PersistenceStrategy<H>>,
}

impl<H> PropertyBinding<H> {
    pub(crate) fn new(
        property: String,
        representation: Representation,
        strategy: Arc<dyn PersistenceStrategy<H>>,
    ) -> Self {
        Self {
            property,
            representation,
            strategy,
        }
    }

    /// Name of the bound host property.
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Strategy that reads and writes the property.
    pub fn strategy(&self) -> &Arc<dyn PersistenceStrategy<H>> {
        &self.strategy
    }
}

impl<H> Clone for PropertyBinding<H> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            representation: self.representation,
            strategy: Arc::clone(&self.strategy),
        }
    }
}

impl<H> fmt::Debug for PropertyBinding<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("property", &self.property)
            .field("representation", &self.representation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representation_defaults_to_name() {
        assert_eq!(Representation::default(), Representation::Name);
    }

    #[test]
    fn representation_uses_snake_case() {
        let json = serde_json::to_string(&Representation::Index).unwrap();
        assert_eq!(json, "\"index\"");
        let parsed: Representation = serde_json::from_str("\"name\"").unwrap();
        assert_eq!(parsed, Representation::Name);
    }

    #[test]
    fn property_value_is_untagged() {
        let index: PropertyValue = serde_json::from_str("2").unwrap();
        let name: PropertyValue = serde_json::from_str("\"opened\"").unwrap();

        assert_eq!(index, PropertyValue::Index(2));
        assert_eq!(name, PropertyValue::from("opened"));
        assert_eq!(index.representation(), Representation::Index);
        assert_eq!(name.representation(), Representation::Name);
    }

    #[test]
    fn property_value_display() {
        assert_eq!(PropertyValue::from(3).to_string(), "3");
        assert_eq!(PropertyValue::from("closed").to_string(), "closed");
    }
}
