//! Node modifiers: named key/value input stacks attached to objects.

use std::fmt;

use im::OrdMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use datablock_foundation::{Error, Result};

/// Value of one modifier input socket.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModifierValue {
    /// Integer input.
    Int(i64),
    /// Floating point input.
    Float(f64),
    /// Boolean input.
    Bool(bool),
    /// Text input.
    String(String),
}

impl ModifierValue {
    /// The integer payload, if this is an integer input.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The float payload, if this is a float input.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean input.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is a text input.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ModifierValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for ModifierValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ModifierValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ModifierValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ModifierValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// A named modifier with keyed input values.
///
/// Inputs are stored name-ordered so listings are deterministic.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeModifier {
    name: String,
    inputs: OrdMap<String, ModifierValue>,
}

impl NodeModifier {
    /// Creates an empty modifier with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: OrdMap::new(),
        }
    }

    /// Returns the modifier's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of an input key.
    ///
    /// Returns `Err` with the modifier and key names if the key is absent.
    pub fn input(&self, key: &str) -> Result<&ModifierValue> {
        self.inputs
            .get(key)
            .ok_or_else(|| Error::modifier_input_not_found(&self.name, key))
    }

    /// Sets the value of an input key, creating it if absent.
    pub fn set_input(&mut self, key: impl Into<String>, value: impl Into<ModifierValue>) {
        self.inputs.insert(key.into(), value.into());
    }

    /// Returns all input keys in name order.
    #[must_use]
    pub fn input_keys(&self) -> Vec<String> {
        self.inputs.keys().cloned().collect()
    }

    /// Returns true if the modifier has no inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
