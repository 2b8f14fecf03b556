//! Object handles and attribute array access for Datablock.
//!
//! This crate provides:
//! - [`ObjectHandle`] - Rename-proof references resolved through identity tags
//! - [`AttributeArray`] - Materialized attribute buffers with write-back
//! - [`ColumnProxy`] - Live single-column views with in-place mutation
//! - [`Index`] / [`AssignOp`] - Explicit access positions and operators
//! - [`ModifierHandle`] - Input access on an object's modifier stack

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod array;
pub mod column;
pub mod handle;
pub mod index;
pub mod modifier;

pub use array::{AttributeArray, Selection};
pub use column::{ColumnProxy, Forwarded};
pub use handle::{CentroidWeight, ObjectHandle};
pub use index::{ArrayValue, AssignOp, Index};
pub use modifier::ModifierHandle;
