//! Attribute domains: the granularity at which per-element data is defined.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The granularity at which an attribute is defined on a data block.
///
/// Which domains carry elements depends on the geometry kind: a mesh
/// defines points, edges, faces, and corners; curves define points and
/// curves; a point cloud defines only points.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeDomain {
    /// One element per point/vertex.
    Point,
    /// One element per edge.
    Edge,
    /// One element per face.
    Face,
    /// One element per face corner.
    Corner,
    /// One element per curve spline.
    Curve,
    /// One element per instance.
    Instance,
    /// One element per layer.
    Layer,
}

impl AttributeDomain {
    /// Returns the canonical lowercase name of this domain.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Edge => "edge",
            Self::Face => "face",
            Self::Corner => "corner",
            Self::Curve => "curve",
            Self::Instance => "instance",
            Self::Layer => "layer",
        }
    }
}

impl fmt::Debug for AttributeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for AttributeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
