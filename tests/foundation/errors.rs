//! Integration tests for error types
//!
//! Tests error construction, display, context, and error kinds.

use datablock_foundation::{
    Error, ErrorContext, ErrorKind, IdentityTag, MismatchReason, ObjectId,
};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_name_not_found() {
    let err = Error::name_not_found("Cube");
    assert!(matches!(err.kind, ErrorKind::NameNotFound(_)));
    let msg = format!("{err}");
    assert!(msg.contains("Cube"));
}

#[test]
fn error_object_not_found() {
    let err = Error::object_not_found(ObjectId::new(42, 1));
    assert!(matches!(err.kind, ErrorKind::ObjectNotFound(_)));
    let msg = format!("{err}");
    assert!(msg.contains("42"));
}

#[test]
fn error_stale_object() {
    let err = Error::stale_object(ObjectId::new(5, 2));
    assert!(matches!(err.kind, ErrorKind::StaleObject(_)));
    let msg = format!("{err}");
    assert!(msg.contains("5"));
}

#[test]
fn error_identity_not_found() {
    let err = Error::identity_not_found(IdentityTag::from("token-99"));
    assert!(matches!(err.kind, ErrorKind::IdentityNotFound(_)));
    let msg = format!("{err}");
    assert!(msg.contains("token-99"));
}

#[test]
fn error_attribute_missing() {
    let err = Error::attribute_missing("velocity");
    assert!(matches!(
        &err.kind,
        ErrorKind::AttributeMismatch {
            reason: MismatchReason::Missing,
            ..
        }
    ));
    let msg = format!("{err}");
    assert!(msg.contains("velocity"));
    assert!(msg.contains("does not exist"));
}

#[test]
fn error_row_count_mismatch() {
    let err = Error::row_count_mismatch("position", 5, 4);
    if let ErrorKind::AttributeMismatch { attribute, reason } = &err.kind {
        assert_eq!(attribute, "position");
        assert_eq!(
            *reason,
            MismatchReason::RowCount {
                expected: 5,
                actual: 4
            }
        );
    } else {
        panic!("wrong kind");
    }
    let msg = format!("{err}");
    assert!(msg.contains("expected 5 rows, got 4"));
}

#[test]
fn error_width_mismatch() {
    let err = Error::width_mismatch("position", 3, 2);
    let msg = format!("{err}");
    assert!(msg.contains("expected width 3, got 2"));
}

#[test]
fn error_store_write() {
    let err = Error::store_write("position", "domain undefined for point clouds");
    assert!(matches!(err.kind, ErrorKind::StoreWrite { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("position"));
    assert!(msg.contains("domain undefined"));
}

#[test]
fn error_capability_not_found() {
    let err = Error::capability_not_found("transpose");
    assert!(matches!(err.kind, ErrorKind::CapabilityNotFound(_)));
    let msg = format!("{err}");
    assert!(msg.contains("transpose"));
}

#[test]
fn error_modifier_not_found() {
    let err = Error::modifier_not_found("Subsurf");
    assert!(matches!(err.kind, ErrorKind::ModifierNotFound(_)));
    assert!(format!("{err}").contains("Subsurf"));
}

#[test]
fn error_modifier_input_not_found() {
    let err = Error::modifier_input_not_found("Subsurf", "Level");
    assert!(matches!(err.kind, ErrorKind::ModifierInputNotFound { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("Subsurf"));
    assert!(msg.contains("Level"));
}

#[test]
fn error_index_out_of_bounds() {
    let err = Error::index_out_of_bounds(7, 5);
    assert!(matches!(
        err.kind,
        ErrorKind::IndexOutOfBounds {
            index: 7,
            length: 5
        }
    ));
    let msg = format!("{err}");
    assert!(msg.contains('7'));
    assert!(msg.contains('5'));
}

#[test]
fn error_degenerate_weights() {
    let err = Error::degenerate_weights();
    assert!(matches!(err.kind, ErrorKind::DegenerateWeights));
    assert!(format!("{err}").contains("sum to zero"));
}

#[test]
fn error_invalid_geometry() {
    let err = Error::invalid_geometry("face references vertex 9 of 3");
    assert!(matches!(err.kind, ErrorKind::InvalidGeometry(_)));
    assert!(format!("{err}").contains("vertex 9"));
}

#[test]
fn error_internal() {
    let err = Error::internal("payload reshape failed");
    assert!(matches!(err.kind, ErrorKind::Internal(_)));
    assert!(format!("{err}").contains("reshape"));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_attaches_without_changing_the_kind() {
    let err = Error::attribute_missing("position").with_context(
        ErrorContext::new()
            .with_operation("sync")
            .with_object("Cube")
            .with_attribute("position"),
    );

    assert!(matches!(err.kind, ErrorKind::AttributeMismatch { .. }));
    let context = err.context.as_ref().unwrap();
    assert_eq!(context.operation.as_deref(), Some("sync"));
    assert_eq!(context.object.as_deref(), Some("Cube"));
}

#[test]
fn context_displays_operation_object_and_attribute() {
    let context = ErrorContext::new()
        .with_operation("sync")
        .with_object("Cube")
        .with_attribute("position");
    assert_eq!(format!("{context}"), "during sync on Cube.position");
}

#[test]
fn empty_context_displays_nothing() {
    assert_eq!(format!("{}", ErrorContext::new()), "");
}
