//! Host value model
//!
//! A small, host-agnostic description of the runtime values an interception
//! layer hands to the engine. Interception itself (proxies, decorators,
//! reflection) is up to the host.

use std::collections::BTreeMap;

use crate::core::location::Location;
use crate::core::types::Type;
use crate::errors::{Result, TypeError};

#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<HostValue>),
    Dict(Vec<(HostValue, HostValue)>),
    /// Instance of a user class; `fields` are its inspectable members
    Instance {
        class: String,
        fields: BTreeMap<String, HostValue>,
    },
    /// A function or bound method
    Callable { name: String },
    /// A class object itself
    Class { name: String },
}

impl HostValue {
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn instance(class: impl Into<String>) -> Self {
        Self::Instance {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: HostValue) -> Self {
        if let Self::Instance { fields, .. } = &mut self {
            fields.insert(name.into(), value);
        }
        self
    }

    /// Runtime class name, spelled the way the host reports it
    pub fn class_name(&self) -> &str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Instance { class, .. } => class,
            Self::Callable { .. } => "function",
            Self::Class { .. } => "type",
        }
    }

    /// Whether the value carries its own member dictionary
    pub fn has_members(&self) -> bool {
        matches!(self, Self::Instance { .. } | Self::Class { .. })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Callable { .. } | Self::Class { .. })
    }

    pub fn field(&self, name: &str) -> Option<&HostValue> {
        match self {
            Self::Instance { fields, .. } => fields.get(name),
            _ => None,
        }
    }
}

/// How a nominal type's name is taken from a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NominalSource {
    /// The value is the name itself and must be a string
    Name,
    /// The value is an instance; its runtime class names the type
    Instance,
}

impl Type {
    pub fn nominal_from(value: &HostValue, source: NominalSource) -> Result<Type> {
        match (source, value) {
            (NominalSource::Instance, v) => Ok(Type::nominal(v.class_name())),
            (NominalSource::Name, HostValue::Str(name)) => Ok(Type::nominal(name.as_str())),
            (NominalSource::Name, other) => Err(TypeError::invalid_argument(format!(
                "{} value",
                other.class_name()
            ))),
        }
    }
}

/// Capability the observation layer needs from the host: produce a type
/// describing a live value.
pub trait Describe {
    fn describe(&self) -> Type;

    fn describe_at(&self, location: &Location) -> Type {
        let mut ty = self.describe();
        ty.add_loc(location);
        ty
    }
}

impl Describe for HostValue {
    /// Values with members start as an empty record that later observations
    /// fill in; everything else is named by its class.
    fn describe(&self) -> Type {
        if self.has_members() {
            Type::empty_object()
        } else {
            Type::nominal(self.class_name())
        }
    }
}
