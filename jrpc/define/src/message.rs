//! Message and field definitions.
//!
//! A [`Message`] owns an ordered list of [`Field`]s. A field may refer to
//! another message by identity through [`FieldType::Message`]; the reference
//! is resolved by the generator, never by this crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Scalar kinds a field can declare.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    String,
    Bytes,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl ScalarKind {
    /// Returns `true` for the signed and unsigned integer kinds.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::Int64 | Self::Uint32 | Self::Uint64
        )
    }

    /// Returns `true` for the floating point kinds.
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Returns `true` if numeric bounds may be declared on this kind.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Inclusive range of values an integer kind can hold.
    ///
    /// Returns `None` for non-integer kinds.
    pub fn integer_range(self) -> Option<(i128, i128)> {
        match self {
            Self::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::Uint32 => Some((0, u32::MAX as i128)),
            Self::Uint64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }
}

/// The declared type of a field.
///
/// ## Examples
///
/// ```
/// use jrpc_define::{FieldType, ScalarKind};
///
/// let ids = FieldType::repeated(FieldType::Scalar(ScalarKind::Uint32));
/// assert!(ids.is_collection());
///
/// let labels = FieldType::map(ScalarKind::String, FieldType::message("Label"));
/// assert!(labels.is_collection());
/// assert!(!FieldType::message("Scene").is_collection());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A built-in scalar.
    Scalar(ScalarKind),
    /// A reference to another message by dotted identity, optionally
    /// prefixed by an import alias (e.g., `Scene.Action`, `devicedef.Device`).
    Message(String),
    /// An ordered collection of the element type.
    Repeated(Box<FieldType>),
    /// A keyed collection.
    Map {
        key: ScalarKind,
        value: Box<FieldType>,
    },
}

impl FieldType {
    /// Shorthand for a message reference.
    pub fn message(name: impl Into<String>) -> Self {
        Self::Message(name.into())
    }

    /// Shorthand for a repeated field of `element`.
    pub fn repeated(element: FieldType) -> Self {
        Self::Repeated(Box::new(element))
    }

    /// Shorthand for a map field.
    pub fn map(key: ScalarKind, value: FieldType) -> Self {
        Self::Map {
            key,
            value: Box::new(value),
        }
    }

    /// Returns `true` for repeated and map fields.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Repeated(_) | Self::Map { .. })
    }
}

/// A numeric bound declared through the `min`/`max` options.
///
/// Deserializes untagged, so `3` is an integer bound and `3.5` a float bound.
/// Integers above `i64::MAX` land in [`Bound::UInt`] so `uint64` fields can
/// be bounded across their whole range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Bound {
    /// The bound as a float, used when either side of a comparison is fractional.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// The bound as an exact integer, or `None` for float bounds.
    pub fn as_i128(self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(i128::from(v)),
            Self::UInt(v) => Some(i128::from(v)),
            Self::Float(_) => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Options declared on a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// The field must be present for the message to be valid.
    pub required: bool,
    /// Inclusive lower bound (numeric fields only).
    pub min: Option<Bound>,
    /// Inclusive upper bound (numeric fields only).
    pub max: Option<Bound>,
}

/// A member of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Declared name. This is also the external (wire) name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Declared options.
    #[serde(default)]
    pub options: FieldOptions,
}

impl Field {
    /// Creates a field with no options.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            options: FieldOptions::default(),
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.options.required = true;
        self
    }

    /// Sets the inclusive lower bound.
    pub fn min(mut self, bound: Bound) -> Self {
        self.options.min = Some(bound);
        self
    }

    /// Sets the inclusive upper bound.
    pub fn max(mut self, bound: Bound) -> Self {
        self.options.max = Some(bound);
        self
    }
}

/// Marks a message as an asynchronous domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOptions {
    /// Fixed name the event is published and subscribed under
    /// (e.g., `set-scene`).
    pub name: String,
}

/// A message definition.
///
/// ## Examples
///
/// ```
/// use jrpc_define::Message;
///
/// let action = Message::new("Action", vec![]).nested_in(["Scene"]);
/// assert_eq!(action.full_name(), "Scene.Action");
/// assert_eq!(action.type_name(), "Scene_Action");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Declared name.
    pub name: String,
    /// Names of enclosing messages, outermost first.
    #[serde(default)]
    pub lineage: Vec<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Present when the message is published as an event.
    #[serde(default)]
    pub event: Option<EventOptions>,
}

impl Message {
    /// Creates a top-level message.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            lineage: Vec::new(),
            fields,
            event: None,
        }
    }

    /// Places the message inside the given enclosing messages.
    pub fn nested_in<I, S>(mut self, lineage: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lineage = lineage.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the message as an event published under `name`.
    pub fn event(mut self, name: impl Into<String>) -> Self {
        self.event = Some(EventOptions { name: name.into() });
        self
    }

    /// Lineage and name joined with `.`; the identity used by references.
    pub fn full_name(&self) -> String {
        self.parts().join(".")
    }

    /// Lineage and name joined with `_`; the flattened type name.
    pub fn type_name(&self) -> String {
        self.parts().join("_")
    }

    fn parts(&self) -> Vec<&str> {
        self.lineage
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect()
    }
}
