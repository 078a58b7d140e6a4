//! Procedural mesh generators for common shapes.
//!
//! Generators feed a [`MeshBuilder`], so shared corners deduplicate and
//! tangent-space baking works the same way it does for hand-built
//! geometry.

use crate::builder::MeshBuilder;
use crate::math::{Vec2d, Vec3d};
use crate::vertex::Vertex;

/// Generate a subdivided square plane in the XY plane.
///
/// The plane spans `[-half_extent, half_extent]` on both axes and is
/// split into `subdivisions * subdivisions` quads. UVs run 0..1 across
/// the full plane. Grid corners shared between neighboring quads are
/// deduplicated, so the result has `(subdivisions + 1)^2` vertices.
pub fn generate_plane(half_extent: f64, subdivisions: u32) -> MeshBuilder {
    let cells = subdivisions.max(1);
    let size = 2.0 * half_extent;
    let mut builder = MeshBuilder::new().with_name("plane");

    for j in 0..cells {
        for i in 0..cells {
            let u0 = i as f64 / cells as f64;
            let u1 = (i + 1) as f64 / cells as f64;
            let v0 = j as f64 / cells as f64;
            let v1 = (j + 1) as f64 / cells as f64;

            let x0 = -half_extent + u0 * size;
            let x1 = -half_extent + u1 * size;
            let y0 = -half_extent + v0 * size;
            let y1 = -half_extent + v1 * size;

            builder.add_quad(
                Vertex::new(Vec3d::new(x0, y0, 0.0), Vec2d::new(u0, v0)),
                Vertex::new(Vec3d::new(x1, y0, 0.0), Vec2d::new(u1, v0)),
                Vertex::new(Vec3d::new(x0, y1, 0.0), Vec2d::new(u0, v1)),
                Vertex::new(Vec3d::new(x1, y1, 0.0), Vec2d::new(u1, v1)),
            );
        }
    }
    builder
}

/// Generate an axis-aligned box centered at the origin.
///
/// Each of the six faces is a single quad with an explicit outward
/// normal and 0..1 UVs, so face corners never smooth across edges and
/// the box has exactly 24 vertices.
pub fn generate_box(half_extents: Vec3d) -> MeshBuilder {
    // (normal, right, up) triads per face
    let faces = [
        (Vec3d::x(), -Vec3d::z(), Vec3d::y()),
        (-Vec3d::x(), Vec3d::z(), Vec3d::y()),
        (Vec3d::y(), Vec3d::x(), -Vec3d::z()),
        (-Vec3d::y(), Vec3d::x(), Vec3d::z()),
        (Vec3d::z(), Vec3d::x(), Vec3d::y()),
        (-Vec3d::z(), -Vec3d::x(), Vec3d::y()),
    ];

    let mut builder = MeshBuilder::new().with_name("box");
    for (normal, right, up) in faces {
        let corner = |s: f64, t: f64, u: f64, v: f64| {
            let direction = normal + right * s + up * t;
            let position = Vec3d::new(
                direction.x * half_extents.x,
                direction.y * half_extents.y,
                direction.z * half_extents.z,
            );
            Vertex::with_normal(position, Vec2d::new(u, v), normal)
        };
        builder.add_quad(
            corner(-1.0, -1.0, 0.0, 1.0),
            corner(1.0, -1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 0.0, 0.0),
            corner(1.0, 1.0, 1.0, 0.0),
        );
    }
    builder
}
