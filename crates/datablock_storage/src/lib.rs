//! Scene storage for Datablock: objects, attributes, and collections.
//!
//! This crate provides:
//! - [`SceneStore`] - Slot-allocated object database with a name index
//! - [`SceneObject`] / [`DataBlock`] - Named objects wrapping geometry and attributes
//! - [`Geometry`] / [`MeshData`] - Geometry descriptions defining attribute domains
//! - [`NodeModifier`] - Keyed modifier input tables
//! - [`ObjectTracker`] - Snapshot-diff detection of created objects
//! - Factories - Validated construction of mesh, curves, and point cloud objects

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod factory;
pub mod geometry;
pub mod modifier;
pub mod object;
pub mod store;
pub mod tracker;

pub use factory::{
    create_curves_object, create_empty_object, create_mesh_object, create_pointcloud_object,
    POSITION_ATTRIBUTE,
};
pub use geometry::{Geometry, MeshData};
pub use modifier::{ModifierValue, NodeModifier};
pub use object::{DataBlock, SceneObject, StoredAttribute};
pub use store::{SceneStore, SharedStore, SCENE_COLLECTION};
pub use tracker::ObjectTracker;
