//! Object factories: geometry in, linked scene object out.
//!
//! Every factory validates its geometry, inserts the object, writes the
//! canonical `position` attribute, and links the object into a collection
//! (the default scene collection unless told otherwise).

use datablock_foundation::{AttributeData, AttributeDomain, ElementType, Error, ObjectId, Result};

use crate::geometry::{Geometry, MeshData};
use crate::object::DataBlock;
use crate::store::{SharedStore, SCENE_COLLECTION};

/// Name of the canonical position attribute written by every factory.
pub const POSITION_ATTRIBUTE: &str = "position";

/// Creates a mesh object from a topology description.
///
/// The vertex positions land in the `position` attribute on the point
/// domain. Returns the id of the new object.
pub fn create_mesh_object(
    store: &SharedStore,
    mesh: &MeshData,
    name: &str,
    collection: Option<&str>,
) -> Result<ObjectId> {
    mesh.validate()?;
    let mut store = store.borrow_mut();
    let id = store.insert_object(name, DataBlock::new(Geometry::mesh(mesh)));
    store.write_attribute(
        id,
        POSITION_ATTRIBUTE,
        AttributeData::from_positions(&mesh.vertices),
        ElementType::FloatVector,
        AttributeDomain::Point,
    )?;
    store.link(collection.unwrap_or(SCENE_COLLECTION), id)?;
    Ok(id)
}

/// Creates a curves object from control points and per-curve sizes.
///
/// `curve_sizes` partitions `positions` into consecutive curves, so the
/// sizes must sum to the number of positions and every curve needs at
/// least one point.
pub fn create_curves_object(
    store: &SharedStore,
    positions: &[[f32; 3]],
    curve_sizes: &[usize],
    name: &str,
    collection: Option<&str>,
) -> Result<ObjectId> {
    let total: usize = curve_sizes.iter().sum();
    if total != positions.len() {
        return Err(Error::invalid_geometry(format!(
            "curve sizes cover {total} points but {} positions were given",
            positions.len()
        )));
    }
    if curve_sizes.iter().any(|size| *size == 0) {
        return Err(Error::invalid_geometry("curves need at least one point"));
    }

    let geometry = Geometry::Curves {
        point_count: positions.len(),
        curve_count: curve_sizes.len(),
    };
    let mut store = store.borrow_mut();
    let id = store.insert_object(name, DataBlock::new(geometry));
    store.write_attribute(
        id,
        POSITION_ATTRIBUTE,
        AttributeData::from_positions(positions),
        ElementType::FloatVector,
        AttributeDomain::Point,
    )?;
    store.link(collection.unwrap_or(SCENE_COLLECTION), id)?;
    Ok(id)
}

/// Creates a point cloud object from positions.
pub fn create_pointcloud_object(
    store: &SharedStore,
    positions: &[[f32; 3]],
    name: &str,
    collection: Option<&str>,
) -> Result<ObjectId> {
    let geometry = Geometry::PointCloud {
        point_count: positions.len(),
    };
    let mut store = store.borrow_mut();
    let id = store.insert_object(name, DataBlock::new(geometry));
    store.write_attribute(
        id,
        POSITION_ATTRIBUTE,
        AttributeData::from_positions(positions),
        ElementType::FloatVector,
        AttributeDomain::Point,
    )?;
    store.link(collection.unwrap_or(SCENE_COLLECTION), id)?;
    Ok(id)
}

/// Creates an object with no geometry data: a zero-vertex mesh.
pub fn create_empty_object(
    store: &SharedStore,
    name: &str,
    collection: Option<&str>,
) -> Result<ObjectId> {
    create_mesh_object(store, &MeshData::default(), name, collection)
}
