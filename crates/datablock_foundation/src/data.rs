//! Typed attribute payloads and conversions to/from working buffers.
//!
//! The store keeps attribute contents in their native representation
//! (`f32`/`i32`/`bool`); the access layer works on `f64` matrices and
//! converts at the store boundary.

// Narrowing casts are the conversion semantics here: working values are
// f64 and the store representations are 32-bit.
#![allow(clippy::cast_possible_truncation)]

use ndarray::Array2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::element::DataFamily;
use crate::error::{Error, Result};

/// Flat, typed attribute payload as held by the store.
///
/// Payloads are row-major: an attribute of width `w` over `n` elements
/// stores `n * w` values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeData {
    /// 32-bit floating point payload.
    Float(Vec<f32>),
    /// 32-bit signed integer payload.
    Int(Vec<i32>),
    /// Boolean payload.
    Bool(Vec<bool>),
}

impl AttributeData {
    /// Returns the storage family of this payload.
    #[must_use]
    pub const fn family(&self) -> DataFamily {
        match self {
            Self::Float(_) => DataFamily::Float,
            Self::Int(_) => DataFamily::Int,
            Self::Bool(_) => DataFamily::Bool,
        }
    }

    /// Returns the number of stored values (rows times width).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    /// Returns true if the payload holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of rows for the given element width.
    ///
    /// Returns `None` if the payload length is not divisible by `width`.
    #[must_use]
    pub fn row_count(&self, width: usize) -> Option<usize> {
        if width == 0 || self.len() % width != 0 {
            None
        } else {
            Some(self.len() / width)
        }
    }

    /// Materializes this payload as a row-major `f64` matrix.
    ///
    /// Fails if the payload length is not divisible by `width`; the store
    /// never holds such payloads, so hitting this indicates corruption.
    pub fn to_matrix(&self, width: usize) -> Result<Array2<f64>> {
        let rows = self.row_count(width).ok_or_else(|| {
            Error::internal(format!(
                "payload of {} values is not divisible by width {width}",
                self.len()
            ))
        })?;

        let values: Vec<f64> = match self {
            Self::Float(v) => v.iter().map(|x| f64::from(*x)).collect(),
            Self::Int(v) => v.iter().map(|x| f64::from(*x)).collect(),
            Self::Bool(v) => v.iter().map(|x| f64::from(u8::from(*x))).collect(),
        };

        Array2::from_shape_vec((rows, width), values)
            .map_err(|e| Error::internal(format!("payload reshape failed: {e}")))
    }

    /// Builds a payload from a row-major `f64` matrix, casting to the
    /// requested family's representation.
    ///
    /// Casts follow the working-buffer conventions: float narrows to
    /// `f32`, int truncates toward zero, bool is `!= 0.0`.
    #[must_use]
    pub fn from_matrix(matrix: &Array2<f64>, family: DataFamily) -> Self {
        match family {
            DataFamily::Float => Self::Float(matrix.iter().map(|v| *v as f32).collect()),
            DataFamily::Int => Self::Int(matrix.iter().map(|v| *v as i32).collect()),
            DataFamily::Bool => Self::Bool(matrix.iter().map(|v| *v != 0.0).collect()),
        }
    }

    /// Builds a float payload from rows of 3-component positions.
    #[must_use]
    pub fn from_positions(positions: &[[f32; 3]]) -> Self {
        Self::Float(positions.iter().flat_map(|p| p.iter().copied()).collect())
    }
}
