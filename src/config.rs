//! Machine definitions loaded from configuration documents.
//!
//! A definition describes states, events and the property binding as data,
//! e.g. in JSON:
//!
//! ```json
//! {
//!   "initial_state": "closed",
//!   "states": ["opened"],
//!   "events": [
//!     { "name": "open", "from": ["closed"], "to": "opened" },
//!     { "name": "close", "from": ["opened"], "to": "closed" }
//!   ],
//!   "property": { "name": "state", "representation": "index" }
//! }
//! ```
//!
//! Actions and persistence strategies are code, so they are attached to the
//! builder after the definition is applied.

use crate::builder::{EventDeclaration, StateMachineBuilder};
use crate::core::MachineError;
use crate::sync::{PersistenceStrategy, Representation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a machine definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse machine definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid machine definition: {0}")]
    Declaration(#[from] MachineError),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    #[serde(default)]
    pub initial_state: Option<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub events: Vec<EventDefinition>,
    #[serde(default)]
    pub property: Option<PropertyDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    #[serde(default)]
    pub from: Vec<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(default)]
    pub representation: Representation,
}

impl MachineDefinition {
    /// Parse a definition from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the definition as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Declare the initial state, the states, then the events, in order.
    ///
    /// The property definition, if any, is ignored; use [`apply_with`] to
    /// bind it.
    ///
    /// [`apply_with`]: MachineDefinition::apply_with
    pub fn apply<H>(&self, builder: &mut StateMachineBuilder<H>) -> Result<(), MachineError> {
        if let Some(initial) = &self.initial_state {
            builder.declare_initial_state(initial.as_str())?;
        }
        for state in &self.states {
            builder.declare_state(state.as_str())?;
        }
        for event in &self.events {
            let mut declaration =
                EventDeclaration::new(event.name.as_str()).from(event.from.iter().cloned());
            if let Some(to) = &event.to {
                declaration = declaration.to(to.as_str());
            }
            builder.declare_event(declaration)?;
        }
        Ok(())
    }

    /// Like [`apply`](MachineDefinition::apply), then bind the defined
    /// property through `strategy`.
    pub fn apply_with<H, S>(
        &self,
        builder: &mut StateMachineBuilder<H>,
        strategy: S,
    ) -> Result<(), MachineError>
    where
        S: PersistenceStrategy<H> + 'static,
    {
        self.apply(builder)?;
        if let Some(property) = &self.property {
            builder.bind_property(property.name.as_str(), property.representation, strategy)?;
        }
        Ok(())
    }

    /// Parse `json` and declare it on a fresh builder.
    pub fn load<H>(json: &str) -> Result<StateMachineBuilder<H>, ConfigError> {
        let definition = Self::from_json(json)?;
        let mut builder = StateMachineBuilder::new();
        definition.apply(&mut builder)?;
        Ok(builder)
    }
}
