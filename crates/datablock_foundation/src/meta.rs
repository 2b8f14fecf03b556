//! Attribute metadata: element type paired with a domain.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::domain::AttributeDomain;
use crate::element::{DataFamily, ElementType};

/// Describes one attribute: its per-element value type and its domain.
///
/// Pure value type; the element type fixes the buffer width used by
/// shape reconciliation on write-back.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeMeta {
    /// Per-element value type.
    pub element_type: ElementType,
    /// Domain the attribute is defined on.
    pub domain: AttributeDomain,
}

impl AttributeMeta {
    /// Creates metadata from an element type and a domain.
    #[must_use]
    pub const fn new(element_type: ElementType, domain: AttributeDomain) -> Self {
        Self {
            element_type,
            domain,
        }
    }

    /// Trailing-dimension width of one element.
    #[must_use]
    pub const fn width(self) -> usize {
        self.element_type.width()
    }

    /// Storage family of the attribute's payload.
    #[must_use]
    pub const fn family(self) -> DataFamily {
        self.element_type.family()
    }
}

impl fmt::Debug for AttributeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} on {:?}", self.element_type, self.domain)
    }
}

impl fmt::Display for AttributeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
