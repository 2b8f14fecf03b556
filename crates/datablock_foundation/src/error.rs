//! Error types for the Datablock system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::id::ObjectId;
use crate::tag::IdentityTag;

/// Convenience alias for results carrying a Datablock [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Datablock operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a name lookup failure error.
    #[must_use]
    pub fn name_not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameNotFound(name.into()))
    }

    /// Creates an object not found error.
    #[must_use]
    pub fn object_not_found(id: ObjectId) -> Self {
        Self::new(ErrorKind::ObjectNotFound(id))
    }

    /// Creates a stale object reference error.
    #[must_use]
    pub fn stale_object(id: ObjectId) -> Self {
        Self::new(ErrorKind::StaleObject(id))
    }

    /// Creates an identity scan exhaustion error.
    #[must_use]
    pub fn identity_not_found(tag: IdentityTag) -> Self {
        Self::new(ErrorKind::IdentityNotFound(tag))
    }

    /// Creates a missing attribute error.
    #[must_use]
    pub fn attribute_missing(attribute: impl Into<String>) -> Self {
        Self::new(ErrorKind::AttributeMismatch {
            attribute: attribute.into(),
            reason: MismatchReason::Missing,
        })
    }

    /// Creates a row count mismatch error.
    #[must_use]
    pub fn row_count_mismatch(
        attribute: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::new(ErrorKind::AttributeMismatch {
            attribute: attribute.into(),
            reason: MismatchReason::RowCount { expected, actual },
        })
    }

    /// Creates an element width mismatch error.
    #[must_use]
    pub fn width_mismatch(attribute: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::AttributeMismatch {
            attribute: attribute.into(),
            reason: MismatchReason::Width { expected, actual },
        })
    }

    /// Creates a store write rejection error.
    #[must_use]
    pub fn store_write(attribute: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreWrite {
            attribute: attribute.into(),
            detail: detail.into(),
        })
    }

    /// Creates an unsupported capability error.
    #[must_use]
    pub fn capability_not_found(capability: impl Into<String>) -> Self {
        Self::new(ErrorKind::CapabilityNotFound(capability.into()))
    }

    /// Creates a missing modifier error.
    #[must_use]
    pub fn modifier_not_found(modifier: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModifierNotFound(modifier.into()))
    }

    /// Creates a missing modifier input error.
    #[must_use]
    pub fn modifier_input_not_found(modifier: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModifierInputNotFound {
            modifier: modifier.into(),
            key: key.into(),
        })
    }

    /// Creates an index out of bounds error.
    #[must_use]
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfBounds { index, length })
    }

    /// Creates a zero weight sum error.
    #[must_use]
    pub fn degenerate_weights() -> Self {
        Self::new(ErrorKind::DegenerateWeights)
    }

    /// Creates an invalid geometry error.
    #[must_use]
    pub fn invalid_geometry(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidGeometry(detail.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(detail.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No object or collection carries the requested display name.
    #[error("name not found: {0:?}")]
    NameNotFound(String),

    /// Object id was never allocated or its slot is free.
    #[error("object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    /// Object reference is stale (generation mismatch).
    #[error("stale object reference: {0:?}")]
    StaleObject(ObjectId),

    /// Identity resolution exhausted the full scan.
    #[error("no object carries identity tag {0}")]
    IdentityNotFound(IdentityTag),

    /// Attribute absent, or its shape disagrees with a read/write attempt.
    #[error("attribute mismatch on {attribute:?}: {reason}")]
    AttributeMismatch {
        /// The attribute name involved.
        attribute: String,
        /// What disagreed.
        reason: MismatchReason,
    },

    /// The store rejected a write.
    #[error("store rejected write to {attribute:?}: {detail}")]
    StoreWrite {
        /// The attribute name involved.
        attribute: String,
        /// Why the write was rejected.
        detail: String,
    },

    /// A forwarded capability is supported by neither the proxy nor the
    /// column slice.
    #[error("unsupported capability: {0}")]
    CapabilityNotFound(String),

    /// Modifier was not found on the object.
    #[error("modifier not found: {0}")]
    ModifierNotFound(String),

    /// Input key was not found on the modifier.
    #[error("modifier input not found: {key} on {modifier}")]
    ModifierInputNotFound {
        /// The modifier that was queried.
        modifier: String,
        /// The input key that was not found.
        key: String,
    },

    /// Index out of bounds.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The actual length of the dimension.
        length: usize,
    },

    /// Weights summed to zero in a weighted mean.
    #[error("weights sum to zero")]
    DegenerateWeights,

    /// Geometry description failed validation.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Ways an attribute can disagree with a read or write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchReason {
    /// The attribute does not exist on the data block.
    Missing,
    /// Row count of the data disagrees with the domain's element count.
    RowCount {
        /// Element count the domain defines.
        expected: usize,
        /// Row count that was supplied.
        actual: usize,
    },
    /// Trailing-dimension width disagrees with the element type.
    Width {
        /// Width the element type defines.
        expected: usize,
        /// Width that was supplied.
        actual: usize,
    },
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "attribute does not exist"),
            Self::RowCount { expected, actual } => {
                write!(f, "expected {expected} rows, got {actual}")
            }
            Self::Width { expected, actual } => {
                write!(f, "expected width {expected}, got {actual}")
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Operation that was being performed.
    pub operation: Option<String>,
    /// Display name of the object involved.
    pub object: Option<String>,
    /// Attribute name involved.
    pub attribute: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operation: None,
            object: None,
            attribute: None,
        }
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the object name.
    #[must_use]
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Sets the attribute name.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "during {operation}")?;
        }
        if let Some(object) = &self.object {
            write!(f, " on {object}")?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, ".{attribute}")?;
        }
        Ok(())
    }
}
