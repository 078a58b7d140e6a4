//! Math type aliases and helper functions.
//!
//! The builder accumulates in double precision; attributes are narrowed
//! to f32 only at export time.

pub use nalgebra;

/// 2D vector (f64).
pub type Vec2d = nalgebra::Vector2<f64>;

/// 3D vector (f64).
pub type Vec3d = nalgebra::Vector3<f64>;

/// 4D vector (f64).
pub type Vec4d = nalgebra::Vector4<f64>;

/// Cross product in the engine's coordinate convention.
///
/// Relative to the textbook right-handed cross product the y and z
/// components are negated (a half-turn of the frame about the x axis,
/// so bilinearity, antisymmetry and magnitudes are unchanged). The
/// canonical counter-clockwise triangle in the XY plane gets a face
/// normal pointing toward -Z.
pub fn cross(a: &Vec3d, b: &Vec3d) -> Vec3d {
    Vec3d::new(
        a.y * b.z - a.z * b.y,
        a.x * b.z - a.z * b.x,
        a.y * b.x - a.x * b.y,
    )
}

/// Scale a vector to unit length.
///
/// Divides by the vector's own magnitude; a zero vector produces NaN
/// components rather than an error.
pub fn normalize(v: &Vec3d) -> Vec3d {
    *v / v.norm()
}
