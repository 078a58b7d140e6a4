//! Mesh-builder input vertices and their dedup key.

use crate::math::{Vec2d, Vec3d};

/// A mesh-builder input vertex.
///
/// Identity is structural: two vertices are the same vertex, and thus
/// deduplicated, only if position, uv and normal all compare exactly
/// equal. There is no epsilon tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Object-space position.
    pub position: Vec3d,
    /// Texture coordinate.
    pub uv: Vec2d,
    /// Optional explicit normal. When present, face normals are not
    /// accumulated into this vertex during baking.
    pub normal: Option<Vec3d>,
}

impl Vertex {
    /// Create a vertex without an explicit normal.
    pub fn new(position: Vec3d, uv: Vec2d) -> Self {
        Self {
            position,
            uv,
            normal: None,
        }
    }

    /// Create a vertex carrying an explicit normal.
    pub fn with_normal(position: Vec3d, uv: Vec2d, normal: Vec3d) -> Self {
        Self {
            position,
            uv,
            normal: Some(normal),
        }
    }

    pub(crate) fn key(&self) -> VertexKey {
        VertexKey {
            position: [
                self.position.x.to_bits(),
                self.position.y.to_bits(),
                self.position.z.to_bits(),
            ],
            uv: [self.uv.x.to_bits(), self.uv.y.to_bits()],
            normal: self
                .normal
                .map(|n| [n.x.to_bits(), n.y.to_bits(), n.z.to_bits()]),
        }
    }
}

/// Canonical bit-pattern encoding of a vertex's fields.
///
/// Hashing the raw f64 bit patterns keeps the dedup exact: values that
/// differ only in representation (0.0 vs -0.0, NaN payloads) occupy
/// distinct slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct VertexKey {
    position: [u64; 3],
    uv: [u64; 2],
    normal: Option<[u64; 3]>,
}
