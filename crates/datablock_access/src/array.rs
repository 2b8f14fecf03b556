//! Live-syncing attribute arrays.
//!
//! An array binds one `(handle, attribute name)` pair at construction and
//! owns a materialized buffer, not a view into store memory. Every
//! mutating operation validates its shape, applies to the buffer, and
//! pushes the whole buffer back to the store in one write. Reads come
//! from the buffer and never touch the store; callers that need store
//! consistency after a failed write bind a fresh array.

// Allow exact float comparison - probe matching is defined on exact equality
#![allow(clippy::float_cmp)]

use std::fmt;
use std::ops::Range;

use log::trace;
use ndarray::{Array2, s};

use datablock_foundation::{
    AttributeData, AttributeDomain, AttributeMeta, ElementType, Error, ErrorContext, Result,
};

use crate::column::ColumnProxy;
use crate::handle::ObjectHandle;
use crate::index::{ArrayValue, AssignOp, Index, combine};

/// What an index expression selected.
///
/// The single-column form hands back a live [`ColumnProxy`] instead of a
/// detached copy; everything else is materialized.
#[derive(Debug)]
pub enum Selection<'a> {
    /// One element.
    Scalar(f64),
    /// One row, copied out.
    Values(Vec<f64>),
    /// A block of rows, copied out.
    Matrix(Array2<f64>),
    /// One column, still wired to the parent array.
    Column(ColumnProxy<'a>),
}

/// An array view over one named attribute of one object.
///
/// The binding is fixed for the array's lifetime; after any completed
/// mutation the store's attribute contents equal the buffer, cast to the
/// attribute's element representation. A failed store write leaves the
/// buffer holding the attempted value.
pub struct AttributeArray {
    handle: ObjectHandle,
    name: String,
    meta: AttributeMeta,
    buffer: Array2<f64>,
}

impl AttributeArray {
    /// Binds an array onto an existing attribute.
    ///
    /// Resolves the handle, reads the attribute's current contents, and
    /// materializes the working buffer. Fails when the attribute does
    /// not exist; creating attributes is the handle's job.
    pub fn bind(handle: ObjectHandle, name: &str) -> Result<Self> {
        let id = handle.resolve()?;
        let (data, meta) = handle.store().borrow().read_attribute(id, name)?;
        let buffer = data.to_matrix(meta.width())?;
        Ok(Self {
            handle,
            name: name.to_string(),
            meta,
            buffer,
        })
    }

    /// The bound attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handle this array writes through.
    #[must_use]
    pub fn handle(&self) -> &ObjectHandle {
        &self.handle
    }

    /// The attribute's metadata.
    #[must_use]
    pub fn meta(&self) -> AttributeMeta {
        self.meta
    }

    /// The attribute's element type.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.meta.element_type
    }

    /// The attribute's domain.
    #[must_use]
    pub fn domain(&self) -> AttributeDomain {
        self.meta.domain
    }

    /// Number of rows (domain elements).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.buffer.nrows()
    }

    /// Trailing width of one element.
    #[must_use]
    pub fn width(&self) -> usize {
        self.buffer.ncols()
    }

    /// Returns true if the attribute has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The in-memory buffer.
    #[must_use]
    pub fn matrix(&self) -> &Array2<f64> {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut Array2<f64> {
        &mut self.buffer
    }

    /// Reads a selection out of the buffer as a detached value.
    pub fn read(&self, index: &Index) -> Result<ArrayValue> {
        match index {
            Index::Element { row, col } => {
                self.check_row(*row)?;
                self.check_col(*col)?;
                Ok(ArrayValue::Scalar(self.buffer[[*row, *col]]))
            }
            Index::Row(row) => {
                self.check_row(*row)?;
                Ok(ArrayValue::Values(self.buffer.row(*row).to_vec()))
            }
            Index::Column(col) => {
                self.check_col(*col)?;
                Ok(ArrayValue::Values(self.buffer.column(*col).to_vec()))
            }
            Index::Rows(range) => {
                self.check_range(range)?;
                Ok(ArrayValue::Matrix(
                    self.buffer.slice(s![range.clone(), ..]).to_owned(),
                ))
            }
            Index::Full => Ok(ArrayValue::Matrix(self.buffer.clone())),
        }
    }

    /// Dispatches an index expression.
    ///
    /// The all-rows single-column form yields a [`ColumnProxy`]; other
    /// forms yield detached copies.
    pub fn select(&mut self, index: Index) -> Result<Selection<'_>> {
        if let Index::Column(col) = index {
            self.check_col(col)?;
            return Ok(Selection::Column(ColumnProxy::new(self, col)));
        }
        Ok(match self.read(&index)? {
            ArrayValue::Scalar(value) => Selection::Scalar(value),
            ArrayValue::Values(values) => Selection::Values(values),
            ArrayValue::Matrix(matrix) => Selection::Matrix(matrix),
        })
    }

    /// A live proxy onto one column.
    pub fn column(&mut self, col: usize) -> Result<ColumnProxy<'_>> {
        self.check_col(col)?;
        Ok(ColumnProxy::new(self, col))
    }

    /// Writes a value through an index, then syncs.
    ///
    /// Scalars broadcast over the selection; shapes are validated before
    /// the buffer changes, so a rejected write mutates nothing.
    pub fn write(&mut self, index: &Index, value: impl Into<ArrayValue>) -> Result<()> {
        let value = value.into();
        self.apply(index, &value, None)?;
        self.sync()
    }

    /// Read-modify-writes through an index, then syncs.
    ///
    /// The buffer reflects the new value before the sync is issued; when
    /// the store rejects the write the buffer keeps the new value.
    pub fn compound_assign(
        &mut self,
        op: AssignOp,
        index: &Index,
        value: impl Into<ArrayValue>,
    ) -> Result<()> {
        let value = value.into();
        self.apply(index, &value, Some(op))?;
        self.sync()
    }

    /// Overwrites every element with one value, then syncs.
    pub fn fill(&mut self, value: f64) -> Result<()> {
        self.write(&Index::Full, value)
    }

    /// Replaces the whole buffer, then syncs.
    ///
    /// Accepts anything a full write accepts: a matrix of the declared
    /// shape, a flat row-major run, or one element broadcast per row.
    pub fn assign(&mut self, value: impl Into<ArrayValue>) -> Result<()> {
        self.write(&Index::Full, value)
    }

    /// Compares the buffer against a probe value.
    ///
    /// A flat probe covering the whole buffer is compared in row-major
    /// order. A flat probe carrying one value per row cannot line up
    /// element-wise against a wider buffer, so it is searched against
    /// every column instead, the same rule the column proxy applies.
    #[must_use]
    pub fn matches(&self, probe: &ArrayValue) -> bool {
        match probe {
            ArrayValue::Scalar(value) => self.buffer.iter().all(|cell| cell == value),
            ArrayValue::Matrix(matrix) => &self.buffer == matrix,
            ArrayValue::Values(flat) => {
                if flat.len() == self.buffer.len() {
                    self.buffer.iter().zip(flat).all(|(cell, value)| cell == value)
                } else if flat.len() == self.rows() {
                    (0..self.width()).any(|c| self.buffer.column(c).to_vec() == *flat)
                } else {
                    false
                }
            }
        }
    }

    /// Pushes the buffer to the store as the attribute's new contents.
    ///
    /// Issues exactly one store write per call.
    pub fn sync(&mut self) -> Result<()> {
        let staged = self.buffer.clone();
        self.push(staged)
    }

    pub(crate) fn push_column_result(&mut self, staged: Array2<f64>) -> Result<()> {
        self.push(staged)
    }

    fn push(&mut self, staged: Array2<f64>) -> Result<()> {
        let reconciled = reconcile(&staged, self.meta.width(), &self.buffer);
        let data = AttributeData::from_matrix(&reconciled, self.meta.family());
        let id = self.handle.resolve()?;
        self.handle
            .store()
            .borrow_mut()
            .write_attribute(id, &self.name, data, self.meta.element_type, self.meta.domain)
            .map_err(|error| {
                error.with_context(
                    ErrorContext::new()
                        .with_operation("sync")
                        .with_object(self.handle.cached_name())
                        .with_attribute(self.name.as_str()),
                )
            })?;
        trace!("synced attribute {:?} ({} rows)", self.name, reconciled.nrows());
        Ok(())
    }

    fn apply(&mut self, index: &Index, value: &ArrayValue, op: Option<AssignOp>) -> Result<()> {
        match index {
            Index::Element { row, col } => {
                self.check_row(*row)?;
                self.check_col(*col)?;
                let ArrayValue::Scalar(operand) = value else {
                    return Err(Error::width_mismatch(self.name.as_str(), 1, value.len()));
                };
                let cell = &mut self.buffer[[*row, *col]];
                *cell = combine(op, *cell, *operand);
            }
            Index::Row(row) => {
                self.check_row(*row)?;
                let width = self.width();
                match value {
                    ArrayValue::Scalar(operand) => {
                        for cell in self.buffer.row_mut(*row) {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                    ArrayValue::Values(values) => {
                        if values.len() != width {
                            return Err(Error::width_mismatch(
                                self.name.as_str(),
                                width,
                                values.len(),
                            ));
                        }
                        for (cell, operand) in self.buffer.row_mut(*row).iter_mut().zip(values) {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                    ArrayValue::Matrix(matrix) => {
                        if matrix.nrows() != 1 || matrix.ncols() != width {
                            return Err(Error::width_mismatch(
                                self.name.as_str(),
                                width,
                                matrix.ncols(),
                            ));
                        }
                        for (cell, operand) in
                            self.buffer.row_mut(*row).iter_mut().zip(matrix.iter())
                        {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                }
            }
            Index::Column(col) => {
                self.check_col(*col)?;
                let rows = self.rows();
                match value {
                    ArrayValue::Scalar(operand) => {
                        for cell in self.buffer.column_mut(*col) {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                    ArrayValue::Values(values) => {
                        if values.len() != rows {
                            return Err(Error::row_count_mismatch(
                                self.name.as_str(),
                                rows,
                                values.len(),
                            ));
                        }
                        for (cell, operand) in self.buffer.column_mut(*col).iter_mut().zip(values)
                        {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                    ArrayValue::Matrix(matrix) => {
                        if matrix.ncols() != 1 {
                            return Err(Error::width_mismatch(
                                self.name.as_str(),
                                1,
                                matrix.ncols(),
                            ));
                        }
                        if matrix.nrows() != rows {
                            return Err(Error::row_count_mismatch(
                                self.name.as_str(),
                                rows,
                                matrix.nrows(),
                            ));
                        }
                        for (cell, operand) in
                            self.buffer.column_mut(*col).iter_mut().zip(matrix.iter())
                        {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                }
            }
            Index::Rows(range) => {
                self.check_range(range)?;
                let span = range.end - range.start;
                let width = self.width();
                let mut slab = self.buffer.slice_mut(s![range.clone(), ..]);
                match value {
                    ArrayValue::Scalar(operand) => {
                        for cell in slab.iter_mut() {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                    ArrayValue::Values(values) => {
                        if values.len() == width {
                            // One element broadcast across the selected rows
                            for mut row in slab.rows_mut() {
                                for (cell, operand) in row.iter_mut().zip(values) {
                                    *cell = combine(op, *cell, *operand);
                                }
                            }
                        } else if values.len() == span * width {
                            for (cell, operand) in slab.iter_mut().zip(values) {
                                *cell = combine(op, *cell, *operand);
                            }
                        } else {
                            return Err(Error::width_mismatch(
                                self.name.as_str(),
                                width,
                                values.len(),
                            ));
                        }
                    }
                    ArrayValue::Matrix(matrix) => {
                        if matrix.ncols() != width {
                            return Err(Error::width_mismatch(
                                self.name.as_str(),
                                width,
                                matrix.ncols(),
                            ));
                        }
                        if matrix.nrows() != span {
                            return Err(Error::row_count_mismatch(
                                self.name.as_str(),
                                span,
                                matrix.nrows(),
                            ));
                        }
                        for (cell, operand) in slab.iter_mut().zip(matrix.iter()) {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                }
            }
            Index::Full => {
                let rows = self.rows();
                let width = self.width();
                match value {
                    ArrayValue::Scalar(operand) => {
                        for cell in self.buffer.iter_mut() {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                    ArrayValue::Values(values) => {
                        if values.len() == width {
                            // One element broadcast across every row
                            for mut row in self.buffer.rows_mut() {
                                for (cell, operand) in row.iter_mut().zip(values) {
                                    *cell = combine(op, *cell, *operand);
                                }
                            }
                        } else if values.len() % width == 0 {
                            let supplied = values.len() / width;
                            if supplied != rows {
                                return Err(Error::row_count_mismatch(
                                    self.name.as_str(),
                                    rows,
                                    supplied,
                                ));
                            }
                            for (cell, operand) in self.buffer.iter_mut().zip(values) {
                                *cell = combine(op, *cell, *operand);
                            }
                        } else {
                            return Err(Error::width_mismatch(
                                self.name.as_str(),
                                width,
                                values.len(),
                            ));
                        }
                    }
                    ArrayValue::Matrix(matrix) => {
                        if matrix.ncols() != width {
                            return Err(Error::width_mismatch(
                                self.name.as_str(),
                                width,
                                matrix.ncols(),
                            ));
                        }
                        if matrix.nrows() != rows {
                            return Err(Error::row_count_mismatch(
                                self.name.as_str(),
                                rows,
                                matrix.nrows(),
                            ));
                        }
                        for (cell, operand) in self.buffer.iter_mut().zip(matrix.iter()) {
                            *cell = combine(op, *cell, *operand);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows() {
            return Err(Error::index_out_of_bounds(row, self.rows()));
        }
        Ok(())
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col >= self.width() {
            return Err(Error::index_out_of_bounds(col, self.width()));
        }
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.rows() {
            return Err(Error::index_out_of_bounds(range.end, self.rows()));
        }
        Ok(())
    }
}

impl fmt::Debug for AttributeArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AttributeArray({:?}, {:?}, {}x{})",
            self.name,
            self.meta,
            self.rows(),
            self.width()
        )
    }
}

/// Brings a staged buffer into the attribute's declared shape.
///
/// A buffer already at the declared width passes through. A single-row
/// buffer whose length divides evenly by the width is reshaped into
/// `(len / width, width)`. Anything else is a collapsed or truncated
/// shape and is replaced wholesale by the authoritative full buffer, so
/// a partial-width result can never reach the store.
fn reconcile(staged: &Array2<f64>, width: usize, authority: &Array2<f64>) -> Array2<f64> {
    if staged.ncols() == width {
        return staged.clone();
    }
    if staged.nrows() == 1 && staged.len() % width == 0 {
        let rows = staged.len() / width;
        if let Ok(reshaped) =
            Array2::from_shape_vec((rows, width), staged.iter().copied().collect())
        {
            return reshaped;
        }
    }
    authority.clone()
}
