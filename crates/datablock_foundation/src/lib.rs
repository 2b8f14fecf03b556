//! Core types, attribute payloads, and errors for Datablock.
//!
//! This crate provides:
//! - [`ElementType`] / [`AttributeDomain`] / [`AttributeMeta`] - Attribute classification
//! - [`AttributeData`] - Typed flat payloads with matrix conversions
//! - [`ObjectId`] - Generational object identifiers
//! - [`IdentityTag`] - Rename-proof identity tokens
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod data;
pub mod domain;
pub mod element;
pub mod error;
pub mod id;
pub mod math;
pub mod meta;
pub mod tag;

pub use data::AttributeData;
pub use domain::AttributeDomain;
pub use element::{DataFamily, ElementType};
pub use error::{Error, ErrorContext, ErrorKind, MismatchReason, Result};
pub use id::ObjectId;
pub use math::{lerp, lerp_matrix};
pub use meta::AttributeMeta;
pub use tag::IdentityTag;
