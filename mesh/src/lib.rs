//! # Kiln mesh tooling
//!
//! CPU-side mesh construction for the engine's asset pipeline:
//!
//! - [`MeshBuilder`] - triangle-soup accumulation with structural vertex
//!   deduplication and tangent-space baking
//! - [`export`] - glTF 2.0 scene export of baked meshes
//! - [`generators`] - procedural plane and box generators
//! - `bitmap` (feature `bitmap`) - bitmap-to-mesh extrusion

pub mod builder;
pub mod export;
pub mod generators;
pub mod math;

mod error;
mod vertex;

#[cfg(feature = "bitmap")]
pub mod bitmap;

pub use builder::MeshBuilder;
pub use error::MeshError;
pub use export::{export_scene, write_scene, IndexFormat, SceneMesh};
pub use vertex::Vertex;
