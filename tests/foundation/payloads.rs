//! Integration tests for attribute payloads
//!
//! Tests payload shapes, matrix conversions, and the store-boundary casts.

use datablock_foundation::{AttributeData, DataFamily, lerp, lerp_matrix};
use ndarray::array;

// =============================================================================
// Shapes
// =============================================================================

#[test]
fn row_count_requires_divisibility() {
    let data = AttributeData::Float(vec![0.0; 12]);
    assert_eq!(data.row_count(3), Some(4));
    assert_eq!(data.row_count(4), Some(3));
    assert_eq!(data.row_count(5), None);
    assert_eq!(data.row_count(0), None);
}

#[test]
fn payload_length_counts_values_not_rows() {
    let data = AttributeData::Int(vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(data.len(), 6);
    assert!(!data.is_empty());
    assert!(AttributeData::Bool(vec![]).is_empty());
}

// =============================================================================
// Matrix Conversions
// =============================================================================

#[test]
fn payloads_materialize_row_major() {
    let data = AttributeData::Float(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let matrix = data.to_matrix(3).unwrap();
    assert_eq!(matrix, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
}

#[test]
fn indivisible_payloads_fail_to_materialize() {
    let data = AttributeData::Float(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert!(data.to_matrix(3).is_err());
}

#[test]
fn bool_payloads_materialize_as_zeroes_and_ones() {
    let data = AttributeData::Bool(vec![true, false, false, true]);
    let matrix = data.to_matrix(1).unwrap();
    assert_eq!(matrix, array![[1.0], [0.0], [0.0], [1.0]]);
}

#[test]
fn float_round_trip_is_exact() {
    let data = AttributeData::Float(vec![0.25, -1.5, 3.75, 100.0, 0.0, -0.125]);
    let matrix = data.to_matrix(2).unwrap();
    let back = AttributeData::from_matrix(&matrix, DataFamily::Float);
    assert_eq!(back, data);
}

#[test]
fn int_round_trip_is_exact() {
    let data = AttributeData::Int(vec![-5, 0, 7, 1_000_000]);
    let matrix = data.to_matrix(1).unwrap();
    let back = AttributeData::from_matrix(&matrix, DataFamily::Int);
    assert_eq!(back, data);
}

#[test]
fn casts_narrow_to_store_representation() {
    let matrix = array![[1.9, -2.9], [0.0, 0.5]];

    let ints = AttributeData::from_matrix(&matrix, DataFamily::Int);
    assert_eq!(ints, AttributeData::Int(vec![1, -2, 0, 0]));

    let bools = AttributeData::from_matrix(&matrix, DataFamily::Bool);
    assert_eq!(bools, AttributeData::Bool(vec![true, true, false, true]));
}

#[test]
fn positions_flatten_row_major() {
    let data = AttributeData::from_positions(&[[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]);
    assert_eq!(
        data,
        AttributeData::Float(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
    );
    assert_eq!(data.family(), DataFamily::Float);
}

// =============================================================================
// Interpolation
// =============================================================================

#[test]
fn lerp_interpolates_linearly() {
    assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
    assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
}

#[test]
fn lerp_matrix_interpolates_elementwise() {
    let a = array![[0.0, 0.0], [2.0, 4.0]];
    let b = array![[1.0, 2.0], [4.0, 8.0]];
    assert_eq!(
        lerp_matrix(&a, &b, 0.5),
        array![[0.5, 1.0], [3.0, 6.0]]
    );
}
