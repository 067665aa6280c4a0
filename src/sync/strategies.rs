//! Built-in persistence strategies.

use super::{PersistenceStrategy, PropertyValue, Representation};

/// Strategy that stores nothing; the machine state lives in memory only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOp;

impl<H> PersistenceStrategy<H> for NoOp {
    fn get(&self, _host: &H, _property: &str) -> Option<PropertyValue> {
        None
    }

    fn set(&self, _host: &mut H, _property: &str, _value: PropertyValue) {}
}

/// Stores the state index in a host field.
///
/// ```rust
/// use ssm::sync::IndexBacked;
///
/// struct Door {
///     state: Option<usize>,
/// }
///
/// let strategy = IndexBacked::new(|door: &Door| door.state, |door: &mut Door, index| {
///     door.state = Some(index)
/// });
/// # let _ = strategy;
/// ```
pub struct IndexBacked<H> {
    get: fn(&H) -> Option<usize>,
    set: fn(&mut H, usize),
}

impl<H> IndexBacked<H> {
    /// Create a strategy from a field getter and setter.
    pub fn new(get: fn(&H) -> Option<usize>, set: fn(&mut H, usize)) -> Self {
        Self { get, set }
    }
}

impl<H> PersistenceStrategy<H> for IndexBacked<H> {
    fn get(&self, host: &H, _property: &str) -> Option<PropertyValue> {
        (self.get)(host).map(PropertyValue::Index)
    }

    fn set(&self, host: &mut H, _property: &str, value: PropertyValue) {
        if let PropertyValue::Index(index) = value {
            (self.set)(host, index);
        }
    }

    fn representation(&self) -> Option<Representation> {
        Some(Representation::Index)
    }
}

/// Stores the state name in a host field.
pub struct NameBacked<H> {
    get: fn(&H) -> Option<String>,
    set: fn(&mut H, String),
}

impl<H> NameBacked<H> {
    pub fn new(get: fn(&H) -> Option<String>, set: fn(&mut H, String)) -> Self {
        Self { get, set }
    }
}

impl<H> PersistenceStrategy<H> for NameBacked<H> {
    fn get(&self, host: &H, _property: &str) -> Option<PropertyValue> {
        (self.get)(host).map(PropertyValue::Name)
    }

    fn set(&self, host: &mut H, _property: &str, value: PropertyValue) {
        if let PropertyValue::Name(name) = value {
            (self.set)(host, name);
        }
    }

    fn representation(&self) -> Option<Representation> {
        Some(Representation::Name)
    }
}

/// Hosts that expose named, dynamically typed attributes, such as a record
/// loaded from a database row.
pub trait Attributes {
    fn read_attribute(&self, name: &str) -> Option<PropertyValue>;

    fn write_attribute(&mut self, name: &str, value: PropertyValue);

    /// Make sure the attribute exists before it is first synchronised.
    fn define_attribute(&mut self, _name: &str) {}
}

/// Strategy that reads and writes the bound property by name through
/// [`Attributes`].
///
/// Setup only defines the attribute; the record is reconciled on first
/// access, once its stored columns are in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributeStrategy;

impl<H: Attributes> PersistenceStrategy<H> for AttributeStrategy {
    fn setup(&self, host: &mut H, property: &str) -> bool {
        host.define_attribute(property);
        false
    }

    fn get(&self, host: &H, property: &str) -> Option<PropertyValue> {
        host.read_attribute(property)
    }

    fn set(&self, host: &mut H, property: &str, value: PropertyValue) {
        host.write_attribute(property, value);
    }
}
