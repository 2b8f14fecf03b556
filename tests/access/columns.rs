//! Integration tests for column proxies
//!
//! Tests in-place column mutation with full-width write-back, reductions,
//! forwarding, and probe matching.

use datablock_access::{ArrayValue, AttributeArray, Forwarded, Index, ObjectHandle};
use datablock_foundation::{ElementType, ErrorKind, ObjectId};
use datablock_storage::{SceneStore, SharedStore, create_pointcloud_object};
use ndarray::{Array2, array};

fn pentagon() -> [[f32; 3]; 5] {
    [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.5, 0.5, 1.0],
    ]
}

fn setup() -> (SharedStore, ObjectId, AttributeArray) {
    let store = SceneStore::shared();
    let id = create_pointcloud_object(&store, &pentagon(), "Cube", None).unwrap();
    let handle = ObjectHandle::wrap(&store, id).unwrap();
    let array = handle.position().unwrap();
    (store, id, array)
}

fn stored_position(store: &SharedStore, id: ObjectId) -> Array2<f64> {
    let (data, meta) = store.borrow().read_attribute(id, "position").unwrap();
    data.to_matrix(meta.width()).unwrap()
}

// =============================================================================
// Mutation
// =============================================================================

#[test]
fn incrementing_a_column_writes_the_full_array_back() {
    let (store, id, mut array) = setup();

    array.column(2).unwrap().add_assign(1.0).unwrap();

    let stored = stored_position(&store, id);
    assert_eq!(stored.column(2).to_vec(), vec![1.0, 1.0, 1.0, 1.0, 2.0]);
    // Other columns are untouched and the width is intact
    assert_eq!(stored.column(0).to_vec(), vec![0.0, 1.0, 1.0, 0.0, 0.5]);
    assert_eq!(stored.ncols(), 3);
}

#[test]
fn column_ops_match_equivalent_slice_assignments() {
    let (store_a, id_a, mut via_column) = setup();
    let (store_b, id_b, mut via_slice) = setup();

    via_column.column(0).unwrap().mul_assign(2.0).unwrap();

    let ArrayValue::Values(current) = via_slice.read(&Index::Column(0)).unwrap() else {
        panic!("column read should yield a flat run");
    };
    let doubled: Vec<f64> = current.iter().map(|v| v * 2.0).collect();
    via_slice.write(&Index::Column(0), doubled).unwrap();

    assert_eq!(via_column.matrix(), via_slice.matrix());
    assert_eq!(stored_position(&store_a, id_a), stored_position(&store_b, id_b));
}

#[test]
fn column_assignment_replaces_the_slice() {
    let (store, id, mut array) = setup();

    array
        .column(1)
        .unwrap()
        .assign(vec![5.0, 4.0, 3.0, 2.0, 1.0])
        .unwrap();

    assert_eq!(
        stored_position(&store, id).column(1).to_vec(),
        vec![5.0, 4.0, 3.0, 2.0, 1.0]
    );
}

#[test]
fn wrong_length_column_data_is_rejected() {
    let (store, id, mut array) = setup();
    let before = stored_position(&store, id);

    assert!(array.column(0).unwrap().assign(vec![1.0, 2.0]).is_err());
    assert_eq!(stored_position(&store, id), before);
}

// =============================================================================
// Reductions and Forwarding
// =============================================================================

#[test]
fn reductions_summarize_the_live_column() {
    let (_store, _id, mut array) = setup();
    array.column(2).unwrap().add_assign(1.0).unwrap();

    let proxy = array.column(2).unwrap();
    assert_eq!(proxy.sum(), 6.0);
    assert_eq!(proxy.mean(), 1.2);
    assert_eq!(proxy.min(), 1.0);
    assert_eq!(proxy.max(), 2.0);
}

#[test]
fn unsupported_operations_forward_to_the_slice() {
    let (_store, _id, mut array) = setup();
    let proxy = array.column(2).unwrap();

    assert_eq!(proxy.forward("sum").unwrap(), Forwarded::Number(1.0));
    assert_eq!(proxy.forward("len").unwrap(), Forwarded::Count(5));
    assert_eq!(
        proxy.forward("dtype").unwrap(),
        Forwarded::Kind(ElementType::FloatVector)
    );

    let err = proxy.forward("reverse").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CapabilityNotFound(_)));
}

// =============================================================================
// Probe Matching
// =============================================================================

#[test]
fn flat_probes_compare_against_this_column() {
    let (_store, _id, mut array) = setup();
    let proxy = array.column(2).unwrap();

    assert!(proxy.matches(&ArrayValue::Values(vec![0.0, 0.0, 0.0, 0.0, 1.0])));
    assert!(!proxy.matches(&ArrayValue::Values(vec![1.0; 5])));
}

#[test]
fn row_shaped_probes_match_any_column_with_the_contents() {
    let (_store, _id, mut array) = setup();
    let proxy = array.column(0).unwrap();

    // The probe holds column 2's contents in a row shape; the search
    // runs over every column, so it matches even on a column 0 proxy
    assert!(proxy.matches(&ArrayValue::Matrix(array![[0.0, 0.0, 0.0, 0.0, 1.0]])));
    assert!(!proxy.matches(&ArrayValue::Matrix(array![[7.0, 7.0, 7.0, 7.0, 7.0]])));
}
