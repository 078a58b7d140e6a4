//! Procedural mesh generation and glTF export.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use kiln_mesh::generators::{generate_box, generate_plane};
use kiln_mesh::math::Vec3d;
use kiln_mesh::{write_scene, MeshBuilder, SceneMesh};

/// Generate a procedural mesh and write it as a .gltf scene.
#[derive(Parser, Debug)]
#[command(
    name = "mesh-export",
    about = "Generate procedural meshes and export them as glTF",
    version
)]
struct Args {
    /// Shape to generate.
    #[arg(long, value_enum, default_value = "plane")]
    shape: Shape,

    /// Half extent of the generated shape.
    #[arg(long, default_value = "1.0")]
    half_extent: f64,

    /// Plane subdivisions per axis.
    #[arg(long, default_value = "1")]
    subdivisions: u32,

    /// Skip the TANGENT attribute in the output.
    #[arg(long)]
    no_tangents: bool,

    /// Output .gltf path.
    #[arg(long, short)]
    output: PathBuf,

    /// Image whose opaque pixels are extruded (shape `bitmap`).
    #[cfg(feature = "bitmap")]
    #[arg(long, required_if_eq("shape", "bitmap"))]
    bitmap: Option<PathBuf>,

    /// Minimum alpha for a pixel to count as opaque.
    #[cfg(feature = "bitmap")]
    #[arg(long, default_value = "128")]
    alpha_threshold: u8,

    /// Extrusion depth in pixel units.
    #[cfg(feature = "bitmap")]
    #[arg(long, default_value = "1.0")]
    depth: f64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Plane,
    Box,
    #[cfg(feature = "bitmap")]
    Bitmap,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = build_shape(&args)?;
    builder.build_normals();
    log::info!(
        "generated {} vertices, {} triangles",
        builder.vertex_count(),
        builder.triangle_count()
    );

    let mut mesh = SceneMesh::new(&builder);
    if args.no_tangents {
        mesh = mesh.without_tangents();
    }
    write_scene(&args.output, &[mesh])?;
    println!("wrote {}", args.output.display());
    Ok(())
}

fn build_shape(args: &Args) -> Result<MeshBuilder, Box<dyn std::error::Error>> {
    Ok(match args.shape {
        Shape::Plane => generate_plane(args.half_extent, args.subdivisions),
        Shape::Box => generate_box(Vec3d::new(
            args.half_extent,
            args.half_extent,
            args.half_extent,
        )),
        #[cfg(feature = "bitmap")]
        Shape::Bitmap => {
            let Some(path) = args.bitmap.as_ref() else {
                return Err("--bitmap is required for shape bitmap".into());
            };
            let image = image::open(path)?.to_rgba8();
            kiln_mesh::bitmap::bitmap_to_mesh(&image, args.alpha_threshold, args.depth)
        }
    })
}
