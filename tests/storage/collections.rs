//! Integration tests for collections and object factories
//!
//! Tests collection membership, the default Scene collection, and
//! validated object construction.

use datablock_foundation::{AttributeDomain, ErrorKind};
use datablock_storage::{
    DataBlock, Geometry, MeshData, POSITION_ATTRIBUTE, SCENE_COLLECTION, SceneStore,
    create_curves_object, create_empty_object, create_mesh_object, create_pointcloud_object,
};

fn cloud() -> DataBlock {
    DataBlock::new(Geometry::PointCloud { point_count: 1 })
}

// =============================================================================
// Collections
// =============================================================================

#[test]
fn the_scene_collection_exists_from_the_start() {
    let store = SceneStore::new();
    assert!(store.has_collection(SCENE_COLLECTION));
    assert_eq!(store.collection_names(), vec![SCENE_COLLECTION]);
}

#[test]
fn created_collections_deduplicate_names() {
    let mut store = SceneStore::new();
    assert_eq!(store.create_collection("Props"), "Props");
    assert_eq!(store.create_collection("Props"), "Props.001");
}

#[test]
fn linking_creates_missing_collections() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());

    store.link("Props", id).unwrap();

    assert!(store.has_collection("Props"));
    assert_eq!(store.collection_objects("Props").unwrap(), vec![id]);
}

#[test]
fn objects_can_belong_to_several_collections() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());

    store.link("Props", id).unwrap();
    store.link("Set", id).unwrap();

    assert_eq!(store.collection_objects("Props").unwrap(), vec![id]);
    assert_eq!(store.collection_objects("Set").unwrap(), vec![id]);
}

#[test]
fn unlinking_removes_only_the_named_membership() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());
    store.link("Props", id).unwrap();
    store.link("Set", id).unwrap();

    store.unlink("Props", id).unwrap();

    assert!(store.collection_objects("Props").unwrap().is_empty());
    assert_eq!(store.collection_objects("Set").unwrap(), vec![id]);
}

#[test]
fn unlinking_from_an_unknown_collection_fails() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());

    let err = store.unlink("Ghost", id).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NameNotFound(_)));
}

#[test]
fn removing_an_object_clears_its_memberships() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());
    store.link("Props", id).unwrap();

    store.remove_object(id).unwrap();

    assert!(store.collection_objects("Props").unwrap().is_empty());
}

// =============================================================================
// Factories
// =============================================================================

#[test]
fn mesh_objects_land_in_the_scene_collection_by_default() {
    let store = SceneStore::shared();
    let mesh = MeshData::from_vertices(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);

    let id = create_mesh_object(&store, &mesh, "Grid", None).unwrap();

    let store = store.borrow();
    assert_eq!(store.collection_objects(SCENE_COLLECTION).unwrap(), vec![id]);
    assert!(store.has_attribute(id, POSITION_ATTRIBUTE).unwrap());
    assert_eq!(store.domain_len(id, AttributeDomain::Point).unwrap(), Some(2));
}

#[test]
fn factories_honor_an_explicit_collection() {
    let store = SceneStore::shared();
    let id = create_pointcloud_object(&store, &[[0.0; 3]; 4], "Cloud", Some("Particles")).unwrap();

    let store = store.borrow();
    assert_eq!(store.collection_objects("Particles").unwrap(), vec![id]);
    assert!(store.collection_objects(SCENE_COLLECTION).unwrap().is_empty());
}

#[test]
fn curves_require_sizes_that_partition_the_points() {
    let store = SceneStore::shared();

    let id = create_curves_object(
        &store,
        &[[0.0; 3]; 6],
        &[4, 2],
        "Hair",
        None,
    )
    .unwrap();
    {
        let store = store.borrow();
        assert_eq!(store.domain_len(id, AttributeDomain::Point).unwrap(), Some(6));
        assert_eq!(store.domain_len(id, AttributeDomain::Curve).unwrap(), Some(2));
    }

    let err = create_curves_object(&store, &[[0.0; 3]; 6], &[4, 3], "Bad", None).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidGeometry(_)));
}

#[test]
fn invalid_meshes_leave_the_store_untouched() {
    let store = SceneStore::shared();
    // Face references a vertex that does not exist
    let mesh = MeshData::new(vec![[0.0; 3]; 3], vec![], vec![vec![0, 1, 9]]);

    assert!(create_mesh_object(&store, &mesh, "Broken", None).is_err());
    assert!(store.borrow().is_empty());
}

#[test]
fn empty_objects_carry_no_points() {
    let store = SceneStore::shared();
    let id = create_empty_object(&store, "Rig", None).unwrap();

    let store = store.borrow();
    assert_eq!(store.domain_len(id, AttributeDomain::Point).unwrap(), Some(0));
    assert_eq!(store.get(id).unwrap().name(), "Rig");
}
