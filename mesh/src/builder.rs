//! Triangle-soup accumulation and tangent-space baking.
//!
//! [`MeshBuilder`] collects triangles vertex by vertex, deduplicating
//! structurally equal vertices into a shared index, then bakes averaged
//! per-vertex normals and handedness-corrected tangents in a single pass
//! over the index list.

use std::collections::HashMap;

use crate::math::{cross, normalize, Vec3d, Vec4d};
use crate::vertex::{Vertex, VertexKey};

/// Incremental, append-only triangle mesh builder.
///
/// Vertices are deduplicated by exact structural equality: the first
/// occurrence of a value is assigned the next free index, and every
/// later occurrence of the same value reuses that index. The index list
/// grows by three per triangle and its length is always a multiple of 3.
///
/// After [`build_normals`](Self::build_normals) the builder exposes the
/// parallel per-vertex sequences a scene exporter consumes: positions
/// and uvs (through [`vertices`](Self::vertices)),
/// [`normals`](Self::normals), packed [`tangents`](Self::tangents), and
/// the index list.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    lookup: HashMap<VertexKey, u32>,
    force_unique: bool,
    normals: Vec<Vec3d>,
    tangents: Vec<Vec4d>,
    name: Option<String>,
}

impl MeshBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a mesh name, used by the scene exporter.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Disable vertex deduplication: every added vertex gets a fresh
    /// index even if an equal vertex exists.
    pub fn with_force_unique(mut self) -> Self {
        self.force_unique = true;
        self
    }

    /// Add one triangle.
    pub fn add_triangle(&mut self, v0: Vertex, v1: Vertex, v2: Vertex) {
        self.add_vertex(v0);
        self.add_vertex(v1);
        self.add_vertex(v2);
    }

    /// Add a quad as two triangles sharing the v1-v2 diagonal.
    pub fn add_quad(&mut self, v0: Vertex, v1: Vertex, v2: Vertex, v3: Vertex) {
        self.add_triangle(v0, v1, v2);
        self.add_triangle(v3, v2, v1);
    }

    /// Add one vertex reference to the index list, deduplicating by
    /// structural equality unless force-unique mode is on. Returns the
    /// index that was recorded.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let key = vertex.key();
        if !self.force_unique {
            if let Some(&index) = self.lookup.get(&key) {
                self.indices.push(index);
                return index;
            }
        }
        let index = self.vertices.len() as u32;
        // first occurrence keeps its index even in force-unique mode
        self.lookup.entry(key).or_insert(index);
        self.vertices.push(vertex);
        self.indices.push(index);
        index
    }

    /// Bake per-vertex normals and tangents from the complete index list.
    ///
    /// For each triangle the face normal is the normalized
    /// engine-convention cross product of its edges, and the face
    /// tangent/bitangent solve the standard 2x2 system relating
    /// object-space edges to uv-space edges. Face normals accumulate
    /// only into vertices without an explicit input normal; explicit
    /// normals seed the accumulator and are used as-is. Tangent and
    /// bitangent accumulators always accumulate.
    ///
    /// Degenerate input produces degenerate numbers rather than errors:
    /// a zero-area triangle contributes NaN normals, and a triangle
    /// whose uvs are collinear divides by a zero uv determinant and
    /// poisons the touched tangent accumulators with non-finite values.
    /// Callers are responsible for validating their geometry.
    pub fn build_normals(&mut self) {
        let count = self.vertices.len();
        self.normals = self
            .vertices
            .iter()
            .map(|v| v.normal.unwrap_or_else(Vec3d::zeros))
            .collect();
        let mut tangents = vec![Vec3d::zeros(); count];
        let mut bitangents = vec![Vec3d::zeros(); count];

        for triangle in self.indices.chunks_exact(3) {
            let corners = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let v0 = self.vertices[corners[0]];
            let v1 = self.vertices[corners[1]];
            let v2 = self.vertices[corners[2]];

            let face_normal = normalize(&cross(
                &(v1.position - v0.position),
                &(v2.position - v0.position),
            ));
            let (tangent, bitangent) = face_tangent(&v0, &v1, &v2);

            for &corner in &corners {
                if self.vertices[corner].normal.is_none() {
                    self.normals[corner] += face_normal;
                }
                tangents[corner] += tangent;
                bitangents[corner] += bitangent;
            }
        }

        for normal in &mut self.normals {
            *normal = normalize(normal);
        }
        for tangent in &mut tangents {
            *tangent = normalize(tangent);
        }
        for (tangent, normal) in tangents.iter_mut().zip(&self.normals) {
            *tangent = cross(&cross(normal, tangent), normal);
        }
        for bitangent in &mut bitangents {
            *bitangent = normalize(bitangent);
        }

        self.tangents = tangents
            .iter()
            .zip(&self.normals)
            .zip(&bitangents)
            .map(|((tangent, normal), bitangent)| {
                let sign = cross(normal, tangent).dot(bitangent);
                let w = if sign > 0.0 { 1.0 } else { -1.0 };
                Vec4d::new(tangent.x, tangent.y, tangent.z, w)
            })
            .collect();
    }

    /// Whether `build_normals` has been run for the current geometry.
    pub fn is_baked(&self) -> bool {
        self.normals.len() == self.vertices.len() && self.tangents.len() == self.vertices.len()
    }

    /// The mesh name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The deduplicated vertex list, in insertion order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The triangle index list. Length is a multiple of 3.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Baked unit normals, parallel to [`vertices`](Self::vertices).
    /// Empty before [`build_normals`](Self::build_normals).
    pub fn normals(&self) -> &[Vec3d] {
        &self.normals
    }

    /// Baked tangents with the handedness sign in `w`, parallel to
    /// [`vertices`](Self::vertices). Empty before
    /// [`build_normals`](Self::build_normals).
    pub fn tangents(&self) -> &[Vec4d] {
        &self.tangents
    }

    /// Number of deduplicated vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Face tangent and bitangent from the uv-space edge system.
///
/// The uv determinant is inverted without a zero check; collinear uvs
/// divide by zero here and the non-finite result propagates.
fn face_tangent(v0: &Vertex, v1: &Vertex, v2: &Vertex) -> (Vec3d, Vec3d) {
    let s1 = v1.uv.x - v0.uv.x;
    let t1 = v1.uv.y - v0.uv.y;
    let s2 = v2.uv.x - v0.uv.x;
    let t2 = v2.uv.y - v0.uv.y;
    let q1 = v1.position - v0.position;
    let q2 = v2.position - v0.position;

    let det = 1.0 / (s1 * t2 - s2 * t1);
    let tangent = (q1 * t2 - q2 * t1) * det;
    let bitangent = (q2 * s1 - q1 * s2) * det;
    (normalize(&tangent), normalize(&bitangent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2d;

    const EPS: f64 = 1e-9;

    fn v(x: f64, y: f64, z: f64, u: f64, w: f64) -> Vertex {
        Vertex::new(Vec3d::new(x, y, z), Vec2d::new(u, w))
    }

    fn assert_vec3_eq(actual: Vec3d, expected: Vec3d) {
        assert!(
            (actual - expected).norm() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn dedup_reuses_indices() {
        let a = v(0.0, 0.0, 0.0, 0.0, 0.0);
        let b = v(1.0, 0.0, 0.0, 1.0, 0.0);
        let c = v(0.0, 1.0, 0.0, 0.0, 1.0);
        let d = v(1.0, 1.0, 0.0, 1.0, 1.0);

        let mut builder = MeshBuilder::new();
        builder.add_triangle(a, b, c);
        builder.add_triangle(a, b, d);

        assert_eq!(builder.vertex_count(), 4);
        assert_eq!(builder.indices(), &[0, 1, 2, 0, 1, 3]);
    }

    #[test]
    fn dedup_is_idempotent_for_repeated_values() {
        let a = v(0.5, 0.5, 0.5, 0.25, 0.25);
        let mut builder = MeshBuilder::new();
        builder.add_vertex(a);
        builder.add_vertex(a);
        builder.add_vertex(a);

        assert_eq!(builder.vertex_count(), 1);
        assert_eq!(builder.indices(), &[0, 0, 0]);
    }

    #[test]
    fn force_unique_never_shares() {
        let a = v(0.0, 0.0, 0.0, 0.0, 0.0);
        let b = v(1.0, 0.0, 0.0, 1.0, 0.0);
        let c = v(0.0, 1.0, 0.0, 0.0, 1.0);

        let mut builder = MeshBuilder::new().with_force_unique();
        builder.add_triangle(a, b, c);
        builder.add_triangle(a, b, c);

        assert_eq!(builder.vertex_count(), 6);
        assert_eq!(builder.indices(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn different_uvs_are_distinct_vertices() {
        let a = v(0.0, 0.0, 0.0, 0.0, 0.0);
        let a_other_uv = v(0.0, 0.0, 0.0, 1.0, 0.0);
        let mut builder = MeshBuilder::new();
        builder.add_vertex(a);
        builder.add_vertex(a_other_uv);
        assert_eq!(builder.vertex_count(), 2);
    }

    #[test]
    fn single_triangle_normal() {
        let mut builder = MeshBuilder::new();
        builder.add_triangle(
            v(0.0, 0.0, 0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0, 0.0, 1.0),
        );
        builder.build_normals();

        for normal in builder.normals() {
            assert_vec3_eq(*normal, Vec3d::new(0.0, 0.0, -1.0));
        }
    }

    #[test]
    fn single_triangle_tangent_handedness() {
        let mut builder = MeshBuilder::new();
        builder.add_triangle(
            v(0.0, 0.0, 0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0, 0.0, 1.0),
        );
        builder.build_normals();

        for tangent in builder.tangents() {
            let t3 = Vec3d::new(tangent.x, tangent.y, tangent.z);
            assert!((t3.norm() - 1.0).abs() < EPS);
            assert!(tangent.w == 1.0 || tangent.w == -1.0);
        }
    }

    #[test]
    fn quad_produces_consistent_normals() {
        let mut builder = MeshBuilder::new();
        builder.add_quad(
            v(0.0, 0.0, 0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0, 0.0, 1.0),
            v(1.0, 1.0, 0.0, 1.0, 1.0),
        );
        builder.build_normals();

        assert_eq!(builder.vertex_count(), 4);
        assert_eq!(builder.indices(), &[0, 1, 2, 3, 2, 1]);
        for normal in builder.normals() {
            assert_vec3_eq(*normal, Vec3d::new(0.0, 0.0, -1.0));
        }
    }

    #[test]
    fn normals_stay_unit_across_shared_non_coplanar_vertices() {
        // Two non-coplanar triangles sharing an edge.
        let a = v(0.0, 0.0, 0.0, 0.0, 0.0);
        let b = v(1.0, 0.0, 0.0, 1.0, 0.0);
        let c = v(0.0, 1.0, 0.0, 0.0, 1.0);
        let d = v(1.0, 1.0, 0.5, 1.0, 1.0);

        let mut builder = MeshBuilder::new();
        builder.add_triangle(a, b, c);
        builder.add_triangle(d, c, b);
        builder.build_normals();

        for normal in builder.normals() {
            assert!((normal.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn flat_mesh_tangents_stay_unit() {
        // Coplanar triangles: accumulated tangents are orthogonal to the
        // final normals, so the re-orthogonalization keeps unit length.
        let a = v(0.0, 0.0, 0.0, 0.0, 0.0);
        let b = v(1.0, 0.0, 0.0, 1.0, 0.0);
        let c = v(0.0, 1.0, 0.0, 0.0, 1.0);
        let d = v(1.0, 1.0, 0.0, 1.0, 1.0);

        let mut builder = MeshBuilder::new();
        builder.add_triangle(a, b, c);
        builder.add_triangle(d, c, b);
        builder.build_normals();

        for normal in builder.normals() {
            assert!((normal.norm() - 1.0).abs() < 1e-9);
        }
        for tangent in builder.tangents() {
            let t3 = Vec3d::new(tangent.x, tangent.y, tangent.z);
            assert!((t3.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn explicit_normal_is_kept_and_renormalized() {
        let up = Vec3d::new(0.0, 0.0, 5.0);
        let explicit = Vertex::with_normal(Vec3d::new(0.0, 0.0, 0.0), Vec2d::new(0.0, 0.0), up);
        let mut builder = MeshBuilder::new();
        builder.add_triangle(
            explicit,
            v(1.0, 0.0, 0.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0, 0.0, 1.0),
        );
        builder.build_normals();

        // The explicit vertex keeps its own direction, the face normal
        // only reaches the other two.
        assert_vec3_eq(builder.normals()[0], Vec3d::new(0.0, 0.0, 1.0));
        assert_vec3_eq(builder.normals()[1], Vec3d::new(0.0, 0.0, -1.0));
        assert_vec3_eq(builder.normals()[2], Vec3d::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn degenerate_uvs_propagate_non_finite_tangents() {
        let mut builder = MeshBuilder::new();
        builder.add_triangle(
            v(0.0, 0.0, 0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0, 0.0, 0.0),
            v(0.0, 1.0, 0.0, 0.0, 0.0),
        );
        builder.build_normals();

        // Normals are unaffected, tangents are poisoned.
        assert_vec3_eq(builder.normals()[0], Vec3d::new(0.0, 0.0, -1.0));
        let tangent = builder.tangents()[0];
        assert!(!tangent.x.is_finite() || !tangent.y.is_finite() || !tangent.z.is_finite());
    }

    #[test]
    fn rebaking_after_more_geometry() {
        let mut builder = MeshBuilder::new();
        builder.add_triangle(
            v(0.0, 0.0, 0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0, 0.0, 1.0),
        );
        builder.build_normals();
        assert!(builder.is_baked());

        builder.add_triangle(
            v(2.0, 0.0, 0.0, 0.0, 0.0),
            v(3.0, 0.0, 0.0, 1.0, 0.0),
            v(2.0, 1.0, 0.0, 0.0, 1.0),
        );
        assert!(!builder.is_baked());
        builder.build_normals();
        assert!(builder.is_baked());
        assert_eq!(builder.normals().len(), 6);
    }
}
