//! Geometry descriptions and their per-domain element counts.

// Allow usize to u32 casts - vertex counts fit in u32
#![allow(clippy::cast_possible_truncation)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use datablock_foundation::{AttributeDomain, Error, Result};

/// Topology description of a mesh under construction.
///
/// Only the counts survive into the data block; the vertex positions are
/// stored as the `position` attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Edges as pairs of vertex indices.
    pub edges: Vec<[u32; 2]>,
    /// Faces as vertex index loops.
    pub faces: Vec<Vec<u32>>,
}

impl MeshData {
    /// Creates mesh data holding only vertices.
    #[must_use]
    pub fn from_vertices(vertices: Vec<[f32; 3]>) -> Self {
        Self {
            vertices,
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Creates mesh data with full topology.
    #[must_use]
    pub fn new(vertices: Vec<[f32; 3]>, edges: Vec<[u32; 2]>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            vertices,
            edges,
            faces,
        }
    }

    /// Validates that edge and face indices stay within the vertex range.
    pub fn validate(&self) -> Result<()> {
        let limit = self.vertices.len() as u32;
        for edge in &self.edges {
            if edge[0] >= limit || edge[1] >= limit {
                return Err(Error::invalid_geometry(format!(
                    "edge ({}, {}) references a vertex outside 0..{limit}",
                    edge[0], edge[1]
                )));
            }
        }
        for face in &self.faces {
            if face.len() < 3 {
                return Err(Error::invalid_geometry(format!(
                    "face with {} vertices (minimum 3)",
                    face.len()
                )));
            }
            for &index in face {
                if index >= limit {
                    return Err(Error::invalid_geometry(format!(
                        "face references vertex {index} outside 0..{limit}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total face corner count (sum of face loop lengths).
    #[must_use]
    pub fn corner_count(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }
}

/// Geometry kind of a data block, carrying per-domain element counts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Geometry {
    /// Polygonal mesh.
    Mesh {
        /// Number of vertices.
        vertex_count: usize,
        /// Number of edges.
        edge_count: usize,
        /// Number of faces.
        face_count: usize,
        /// Number of face corners.
        corner_count: usize,
    },
    /// Curve bundle.
    Curves {
        /// Total number of control points across all curves.
        point_count: usize,
        /// Number of curves.
        curve_count: usize,
    },
    /// Point cloud.
    PointCloud {
        /// Number of points.
        point_count: usize,
    },
}

impl Geometry {
    /// Builds mesh geometry from a topology description.
    #[must_use]
    pub fn mesh(data: &MeshData) -> Self {
        Self::Mesh {
            vertex_count: data.vertices.len(),
            edge_count: data.edges.len(),
            face_count: data.faces.len(),
            corner_count: data.corner_count(),
        }
    }

    /// Returns the element count of `domain`, or `None` if this geometry
    /// does not define the domain.
    #[must_use]
    pub fn domain_len(&self, domain: AttributeDomain) -> Option<usize> {
        match (self, domain) {
            (Self::Mesh { vertex_count, .. }, AttributeDomain::Point) => Some(*vertex_count),
            (Self::Mesh { edge_count, .. }, AttributeDomain::Edge) => Some(*edge_count),
            (Self::Mesh { face_count, .. }, AttributeDomain::Face) => Some(*face_count),
            (Self::Mesh { corner_count, .. }, AttributeDomain::Corner) => Some(*corner_count),
            (Self::Curves { point_count, .. }, AttributeDomain::Point) => Some(*point_count),
            (Self::Curves { curve_count, .. }, AttributeDomain::Curve) => Some(*curve_count),
            (Self::PointCloud { point_count }, AttributeDomain::Point) => Some(*point_count),
            _ => None,
        }
    }

    /// Canonical lowercase name of the geometry kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Mesh { .. } => "mesh",
            Self::Curves { .. } => "curves",
            Self::PointCloud { .. } => "point-cloud",
        }
    }
}
