//! Column views onto attribute arrays.
//!
//! A proxy is transient: it borrows the parent array for one access
//! expression and reads through to the parent's live buffer rather than
//! freezing a copy. Mutations land in the parent buffer and write back
//! through the parent, so a column operation is indistinguishable from
//! the equivalent full-array slice assignment.

// Allow usize to f64 casts - row counts are far below 2^53
#![allow(clippy::cast_precision_loss)]
// Allow exact float comparison - probe matching is defined on exact equality
#![allow(clippy::float_cmp)]

use ndarray::Array2;

use datablock_foundation::{ElementType, Error, Result};

use crate::array::AttributeArray;
use crate::index::{ArrayValue, AssignOp, combine};

/// Result of a capability forwarded to the column slice.
#[derive(Clone, Debug, PartialEq)]
pub enum Forwarded {
    /// A numeric reduction.
    Number(f64),
    /// An element count.
    Count(usize),
    /// The parent's element type.
    Kind(ElementType),
}

/// A live handle onto one column of an [`AttributeArray`].
#[derive(Debug)]
pub struct ColumnProxy<'a> {
    parent: &'a mut AttributeArray,
    column: usize,
}

impl<'a> ColumnProxy<'a> {
    pub(crate) fn new(parent: &'a mut AttributeArray, column: usize) -> Self {
        Self { parent, column }
    }

    /// The column position inside the parent.
    #[must_use]
    pub fn column_index(&self) -> usize {
        self.column
    }

    /// Number of rows in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.rows()
    }

    /// Returns true if the parent has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// The column's current contents, copied out of the live parent
    /// buffer.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.parent.matrix().column(self.column).to_vec()
    }

    /// One element of the column.
    pub fn get(&self, row: usize) -> Result<f64> {
        if row >= self.len() {
            return Err(Error::index_out_of_bounds(row, self.len()));
        }
        Ok(self.parent.matrix()[[row, self.column]])
    }

    /// Overwrites the column, then writes the parent back.
    pub fn assign(&mut self, value: impl Into<ArrayValue>) -> Result<()> {
        let value = value.into();
        self.mutate(None, &value)
    }

    /// Read-modify-writes the column, then writes the parent back.
    pub fn compound_assign(&mut self, op: AssignOp, value: impl Into<ArrayValue>) -> Result<()> {
        let value = value.into();
        self.mutate(Some(op), &value)
    }

    /// `column += operand`
    pub fn add_assign(&mut self, operand: f64) -> Result<()> {
        self.compound_assign(AssignOp::Add, operand)
    }

    /// `column -= operand`
    pub fn sub_assign(&mut self, operand: f64) -> Result<()> {
        self.compound_assign(AssignOp::Sub, operand)
    }

    /// `column *= operand`
    pub fn mul_assign(&mut self, operand: f64) -> Result<()> {
        self.compound_assign(AssignOp::Mul, operand)
    }

    /// `column /= operand`
    pub fn div_assign(&mut self, operand: f64) -> Result<()> {
        self.compound_assign(AssignOp::Div, operand)
    }

    fn mutate(&mut self, op: Option<AssignOp>, value: &ArrayValue) -> Result<()> {
        let rows = self.len();
        let operands: Vec<f64> = match value {
            ArrayValue::Scalar(operand) => vec![*operand; rows],
            ArrayValue::Values(values) => {
                if values.len() != rows {
                    return Err(Error::row_count_mismatch(
                        self.parent.name(),
                        rows,
                        values.len(),
                    ));
                }
                values.clone()
            }
            ArrayValue::Matrix(matrix) => {
                if matrix.ncols() != 1 {
                    return Err(Error::width_mismatch(self.parent.name(), 1, matrix.ncols()));
                }
                if matrix.nrows() != rows {
                    return Err(Error::row_count_mismatch(
                        self.parent.name(),
                        rows,
                        matrix.nrows(),
                    ));
                }
                matrix.column(0).to_vec()
            }
        };

        // Mutate the parent's column in place
        {
            let mut column = self.parent.buffer_mut().column_mut(self.column);
            for (cell, operand) in column.iter_mut().zip(&operands) {
                *cell = combine(op, *cell, *operand);
            }
        }

        // Stage the collapsed column; the parent's reconciliation swaps
        // in its full-width buffer before anything reaches the store
        let staged = Array2::from_shape_vec((rows, 1), self.values())
            .map_err(|error| Error::internal(format!("column staging failed: {error}")))?;
        self.parent.push_column_result(staged)
    }

    /// Sum of the column.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.parent.matrix().column(self.column).sum()
    }

    /// Mean of the column.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.sum() / self.len() as f64
    }

    /// Smallest value in the column.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.parent
            .matrix()
            .column(self.column)
            .iter()
            .copied()
            .fold(f64::NAN, f64::min)
    }

    /// Largest value in the column.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.parent
            .matrix()
            .column(self.column)
            .iter()
            .copied()
            .fold(f64::NAN, f64::max)
    }

    /// Compares the column against a probe value.
    ///
    /// Scalars compare against every element; flat runs compare
    /// elementwise. A matrix probe of mismatched shape whose total
    /// length still equals the row count is tested against every column
    /// of the parent before the comparison fails.
    #[must_use]
    pub fn matches(&self, probe: &ArrayValue) -> bool {
        let column = self.values();
        match probe {
            ArrayValue::Scalar(value) => column.iter().all(|cell| cell == value),
            ArrayValue::Values(values) => column == *values,
            ArrayValue::Matrix(matrix) => {
                if matrix.nrows() == column.len() && matrix.ncols() == 1 {
                    return matrix.column(0).to_vec() == column;
                }
                if matrix.len() == column.len() {
                    let flat: Vec<f64> = matrix.iter().copied().collect();
                    return (0..self.parent.width())
                        .any(|c| self.parent.matrix().column(c).to_vec() == flat);
                }
                false
            }
        }
    }

    /// Forwards a capability the proxy does not define to the column
    /// slice.
    ///
    /// Fails when neither the proxy nor the slice supports it.
    pub fn forward(&self, capability: &str) -> Result<Forwarded> {
        match capability {
            "sum" => Ok(Forwarded::Number(self.sum())),
            "mean" => Ok(Forwarded::Number(self.mean())),
            "min" => Ok(Forwarded::Number(self.min())),
            "max" => Ok(Forwarded::Number(self.max())),
            "len" => Ok(Forwarded::Count(self.len())),
            "dtype" => Ok(Forwarded::Kind(self.parent.element_type())),
            other => Err(Error::capability_not_found(other)),
        }
    }
}

impl PartialEq<Vec<f64>> for ColumnProxy<'_> {
    fn eq(&self, other: &Vec<f64>) -> bool {
        self.values() == *other
    }
}

impl PartialEq<&[f64]> for ColumnProxy<'_> {
    fn eq(&self, other: &&[f64]) -> bool {
        self.values() == *other
    }
}
