//! Element type descriptors for attribute classification.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-element value type of an attribute.
///
/// The element type fixes the trailing-dimension width of the attribute's
/// buffer and the storage family of its payload.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementType {
    /// Scalar floating point.
    Float,
    /// Scalar signed integer.
    Int,
    /// Scalar boolean.
    Bool,
    /// Two-component float vector (e.g. UV coordinates).
    Float2,
    /// Two-component integer vector.
    Int2,
    /// Three-component float vector.
    FloatVector,
    /// Four-component float color (RGBA).
    FloatColor,
    /// Four-component rotation quaternion.
    Quaternion,
}

/// Storage family of an attribute payload.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataFamily {
    /// 32-bit floating point storage.
    Float,
    /// 32-bit signed integer storage.
    Int,
    /// Boolean storage.
    Bool,
}

impl ElementType {
    /// Returns the trailing-dimension width of one element.
    ///
    /// Scalars and booleans are width 1, vectors 3, colors and
    /// quaternions 4.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Float | Self::Int | Self::Bool => 1,
            Self::Float2 | Self::Int2 => 2,
            Self::FloatVector => 3,
            Self::FloatColor | Self::Quaternion => 4,
        }
    }

    /// Returns the storage family of this element type.
    #[must_use]
    pub const fn family(self) -> DataFamily {
        match self {
            Self::Float
            | Self::Float2
            | Self::FloatVector
            | Self::FloatColor
            | Self::Quaternion => DataFamily::Float,
            Self::Int | Self::Int2 => DataFamily::Int,
            Self::Bool => DataFamily::Bool,
        }
    }

    /// Infers an element type from a payload family and an observed width.
    ///
    /// Width 4 maps to [`ElementType::FloatColor`], never to
    /// [`ElementType::Quaternion`]; quaternion attributes must be declared
    /// explicitly. Returns `None` for combinations with no element type
    /// (e.g. boolean width 3, or any width above 4).
    #[must_use]
    pub const fn infer(family: DataFamily, width: usize) -> Option<Self> {
        match (family, width) {
            (DataFamily::Float, 1) => Some(Self::Float),
            (DataFamily::Float, 2) => Some(Self::Float2),
            (DataFamily::Float, 3) => Some(Self::FloatVector),
            (DataFamily::Float, 4) => Some(Self::FloatColor),
            (DataFamily::Int, 1) => Some(Self::Int),
            (DataFamily::Int, 2) => Some(Self::Int2),
            (DataFamily::Bool, 1) => Some(Self::Bool),
            _ => None,
        }
    }

    /// Returns true if this element type stores floating point values.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self.family(), DataFamily::Float)
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::Float2 => write!(f, "float2"),
            Self::Int2 => write!(f, "int2"),
            Self::FloatVector => write!(f, "float-vector"),
            Self::FloatColor => write!(f, "float-color"),
            Self::Quaternion => write!(f, "quaternion"),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Debug for DataFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

impl fmt::Display for DataFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
