//! Index forms and assignment operators for attribute arrays.
//!
//! Every access expression names its position explicitly through
//! [`Index`], so array dispatch is a single `match` at the call boundary
//! instead of runtime shape sniffing.

use std::ops::Range;

use ndarray::Array2;

/// A position in an attribute array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Index {
    /// A single element at `(row, col)`.
    Element {
        /// Row position.
        row: usize,
        /// Column position.
        col: usize,
    },
    /// One full row.
    Row(usize),
    /// One full column, all rows.
    Column(usize),
    /// A contiguous run of rows.
    Rows(Range<usize>),
    /// The whole array.
    Full,
}

/// Compound assignment operators applied through an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
}

impl AssignOp {
    /// Applies the operator to one value.
    ///
    /// Division follows IEEE semantics, so dividing by zero yields an
    /// infinity or NaN rather than failing.
    #[must_use]
    pub fn apply(self, current: f64, operand: f64) -> f64 {
        match self {
            Self::Add => current + operand,
            Self::Sub => current - operand,
            Self::Mul => current * operand,
            Self::Div => current / operand,
        }
    }
}

/// Applies `op` to a cell, or plainly overwrites it when there is none.
pub(crate) fn combine(op: Option<AssignOp>, current: f64, operand: f64) -> f64 {
    match op {
        Some(op) => op.apply(current, operand),
        None => operand,
    }
}

/// A value carried into a write or comparison.
///
/// Scalars broadcast over the selection; flat runs fill it in row-major
/// order; matrices must match the selection's shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayValue {
    /// A scalar broadcast over the selection.
    Scalar(f64),
    /// A flat run of values.
    Values(Vec<f64>),
    /// A two-dimensional block.
    Matrix(Array2<f64>),
}

impl ArrayValue {
    /// Number of values carried.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Values(values) => values.len(),
            Self::Matrix(matrix) => matrix.len(),
        }
    }

    /// Returns true if no values are carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<f64> for ArrayValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for ArrayValue {
    fn from(values: Vec<f64>) -> Self {
        Self::Values(values)
    }
}

impl From<&[f64]> for ArrayValue {
    fn from(values: &[f64]) -> Self {
        Self::Values(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ArrayValue {
    fn from(values: [f64; N]) -> Self {
        Self::Values(values.to_vec())
    }
}

impl From<Array2<f64>> for ArrayValue {
    fn from(matrix: Array2<f64>) -> Self {
        Self::Matrix(matrix)
    }
}
