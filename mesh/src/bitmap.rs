//! Bitmap-to-mesh extrusion.
//!
//! Converts the opaque pixels of an image into an extruded relief mesh:
//! a front and back face per opaque pixel, with side walls emitted only
//! where a 4-neighbor is transparent or outside the image, so interior
//! walls between adjacent opaque pixels never exist. UVs sample the
//! source image, which makes the mesh directly textureable with it.
//!
//! Positions are in pixel units with the image's bottom-left at the
//! origin and +Y up; callers scale the result.

use image::RgbaImage;

use crate::builder::MeshBuilder;
use crate::math::{Vec2d, Vec3d};
use crate::vertex::Vertex;

/// Build an extruded mesh from an image's opaque pixels.
///
/// A pixel is opaque when its alpha is at least `alpha_threshold`. The
/// relief spans `0..depth` on the Z axis.
pub fn bitmap_to_mesh(image: &RgbaImage, alpha_threshold: u8, depth: f64) -> MeshBuilder {
    let (width, height) = image.dimensions();
    let opaque = |x: i64, y: i64| -> bool {
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return false;
        }
        image.get_pixel(x as u32, y as u32).0[3] >= alpha_threshold
    };

    let mut builder = MeshBuilder::new().with_name("bitmap");
    for y in 0..i64::from(height) {
        for x in 0..i64::from(width) {
            if !opaque(x, y) {
                continue;
            }

            // pixel footprint, image rows flipped so +Y is up
            let x0 = x as f64;
            let x1 = x0 + 1.0;
            let y1 = (i64::from(height) - y) as f64;
            let y0 = y1 - 1.0;

            let u0 = x as f64 / f64::from(width);
            let u1 = (x + 1) as f64 / f64::from(width);
            let v0 = y as f64 / f64::from(height);
            let v1 = (y + 1) as f64 / f64::from(height);

            let vertex = |px: f64, py: f64, pz: f64, u: f64, v: f64| {
                Vertex::new(Vec3d::new(px, py, pz), Vec2d::new(u, v))
            };

            // front face (z = 0)
            builder.add_quad(
                vertex(x0, y0, 0.0, u0, v1),
                vertex(x1, y0, 0.0, u1, v1),
                vertex(x0, y1, 0.0, u0, v0),
                vertex(x1, y1, 0.0, u1, v0),
            );
            // back face (z = depth), mirrored winding
            builder.add_quad(
                vertex(x1, y0, depth, u1, v1),
                vertex(x0, y0, depth, u0, v1),
                vertex(x1, y1, depth, u1, v0),
                vertex(x0, y1, depth, u0, v0),
            );

            // walls toward empty neighbors
            if !opaque(x - 1, y) {
                builder.add_quad(
                    vertex(x0, y0, depth, u0, v1),
                    vertex(x0, y0, 0.0, u1, v1),
                    vertex(x0, y1, depth, u0, v0),
                    vertex(x0, y1, 0.0, u1, v0),
                );
            }
            if !opaque(x + 1, y) {
                builder.add_quad(
                    vertex(x1, y0, 0.0, u0, v1),
                    vertex(x1, y0, depth, u1, v1),
                    vertex(x1, y1, 0.0, u0, v0),
                    vertex(x1, y1, depth, u1, v0),
                );
            }
            if !opaque(x, y - 1) {
                // image-up neighbor: wall along the pixel's top edge
                builder.add_quad(
                    vertex(x0, y1, 0.0, u0, v1),
                    vertex(x1, y1, 0.0, u1, v1),
                    vertex(x0, y1, depth, u0, v0),
                    vertex(x1, y1, depth, u1, v0),
                );
            }
            if !opaque(x, y + 1) {
                builder.add_quad(
                    vertex(x1, y0, 0.0, u1, v1),
                    vertex(x0, y0, 0.0, u0, v1),
                    vertex(x1, y0, depth, u1, v0),
                    vertex(x0, y0, depth, u0, v0),
                );
            }
        }
    }

    log::debug!(
        "extruded {}x{} bitmap into {} triangles",
        width,
        height,
        builder.triangle_count()
    );
    builder
}
