//! Integration tests for scene objects
//!
//! Tests object lifecycle, naming, identity stamping, modifier stacks, and
//! creation tracking.

use datablock_foundation::{ErrorKind, IdentityTag};
use datablock_storage::{
    DataBlock, Geometry, ObjectTracker, SceneStore, create_pointcloud_object,
};

fn cloud() -> DataBlock {
    DataBlock::new(Geometry::PointCloud { point_count: 3 })
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn inserted_objects_resolve_by_id_and_name() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());

    assert!(store.exists(id));
    assert_eq!(store.get(id).unwrap().name(), "Cube");
    assert_eq!(store.find_by_name("Cube").unwrap(), id);
    assert_eq!(store.len(), 1);
}

#[test]
fn requested_names_deduplicate_with_suffixes() {
    let mut store = SceneStore::new();
    store.insert_object("Cube", cloud());
    let second = store.insert_object("Cube", cloud());
    let third = store.insert_object("Cube", cloud());

    assert_eq!(store.get(second).unwrap().name(), "Cube.001");
    assert_eq!(store.get(third).unwrap().name(), "Cube.002");
}

#[test]
fn removal_frees_the_name_and_invalidates_the_id() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());

    store.remove_object(id).unwrap();

    assert!(!store.exists(id));
    assert!(store.find_by_name("Cube").is_err());
    assert!(store.is_empty());
}

#[test]
fn reused_slots_get_fresh_generations() {
    let mut store = SceneStore::new();
    let first = store.insert_object("Cube", cloud());
    store.remove_object(first).unwrap();
    let second = store.insert_object("Sphere", cloud());

    assert_eq!(first.index, second.index);
    assert_ne!(first.generation, second.generation);

    // The stale id is rejected, the fresh one works
    assert!(matches!(
        store.get(first).unwrap_err().kind,
        ErrorKind::StaleObject(_)
    ));
    assert_eq!(store.get(second).unwrap().name(), "Sphere");
}

#[test]
fn scan_visits_objects_in_name_order() {
    let mut store = SceneStore::new();
    store.insert_object("Banana", cloud());
    store.insert_object("Apple", cloud());
    store.insert_object("Cherry", cloud());

    let names: Vec<&str> = store.scan_all().map(|(_, object)| object.name()).collect();
    assert_eq!(names, vec!["Apple", "Banana", "Cherry"]);
}

// =============================================================================
// Renaming
// =============================================================================

#[test]
fn rename_moves_the_name_index_entry() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());

    let assigned = store.rename(id, "CubeRenamed").unwrap();

    assert_eq!(assigned, "CubeRenamed");
    assert_eq!(store.get(id).unwrap().name(), "CubeRenamed");
    assert_eq!(store.find_by_name("CubeRenamed").unwrap(), id);
    assert!(store.find_by_name("Cube").is_err());
}

#[test]
fn rename_onto_a_taken_name_deduplicates() {
    let mut store = SceneStore::new();
    store.insert_object("Target", cloud());
    let id = store.insert_object("Cube", cloud());

    let assigned = store.rename(id, "Target").unwrap();
    assert_eq!(assigned, "Target.001");
}

#[test]
fn rename_to_the_current_name_is_a_no_op() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());

    let assigned = store.rename(id, "Cube").unwrap();
    assert_eq!(assigned, "Cube");
    assert_eq!(store.find_by_name("Cube").unwrap(), id);
}

// =============================================================================
// Identity Stamping
// =============================================================================

#[test]
fn objects_start_unstamped() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());
    assert_eq!(store.identity_tag(id).unwrap(), None);
}

#[test]
fn stamping_is_idempotent() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());
    let tag = IdentityTag::mint();

    store.set_identity_tag(id, &tag).unwrap();
    store.set_identity_tag(id, &tag).unwrap();

    assert_eq!(store.identity_tag(id).unwrap(), Some(&tag));
}

#[test]
fn stamping_survives_renames() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());
    let tag = IdentityTag::mint();
    store.set_identity_tag(id, &tag).unwrap();

    store.rename(id, "CubeRenamed").unwrap();

    assert_eq!(store.identity_tag(id).unwrap(), Some(&tag));
}

// =============================================================================
// Modifier Stacks
// =============================================================================

#[test]
fn modifiers_stack_in_insertion_order() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());

    store.add_modifier(id, "Subsurf").unwrap();
    store.add_modifier(id, "Array").unwrap();

    assert_eq!(store.modifier_names(id).unwrap(), vec!["Subsurf", "Array"]);
}

#[test]
fn modifier_inputs_round_trip() {
    let mut store = SceneStore::new();
    let id = store.insert_object("Cube", cloud());
    store.add_modifier(id, "Subsurf").unwrap();

    store.set_modifier_input(id, "Subsurf", "Level", 2i64).unwrap();

    let value = store.modifier_input(id, "Subsurf", "Level").unwrap();
    assert_eq!(value.as_int(), Some(2));
    assert_eq!(store.modifier_input_keys(id, "Subsurf").unwrap(), vec!["Level"]);
}

// =============================================================================
// Creation Tracking
// =============================================================================

#[test]
fn tracker_reports_only_objects_created_after_the_snapshot() {
    let store = SceneStore::shared();
    let before = create_pointcloud_object(&store, &[[0.0; 3]], "Before", None).unwrap();

    let tracker = ObjectTracker::new(store.clone());
    assert!(tracker.new_objects().is_empty());

    let after = create_pointcloud_object(&store, &[[0.0; 3]], "After", None).unwrap();

    let new = tracker.new_objects();
    assert_eq!(new, vec![after]);
    assert!(!new.contains(&before));
    assert_eq!(tracker.latest(), Some(after));
}

#[test]
fn tracker_reset_moves_the_baseline() {
    let store = SceneStore::shared();
    let mut tracker = ObjectTracker::new(store.clone());

    create_pointcloud_object(&store, &[[0.0; 3]], "First", None).unwrap();
    tracker.reset();
    assert!(tracker.new_objects().is_empty());

    let second = create_pointcloud_object(&store, &[[0.0; 3]], "Second", None).unwrap();
    assert_eq!(tracker.new_objects(), vec![second]);
}
