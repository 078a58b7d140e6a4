//! glTF 2.0 scene export.
//!
//! Baked meshes are written as a standalone `.gltf` JSON document. Every
//! attribute and index stream becomes one buffer embedded as a base64
//! data URI, with a buffer view and an accessor carrying count, component
//! type and min/max bounds. Vertex attributes are packed little-endian
//! f32; indices are u16 unless the largest index needs 32 bits.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::builder::MeshBuilder;
use crate::error::MeshError;

const COMPONENT_F32: u32 = 5126;
const COMPONENT_U16: u32 = 5123;
const COMPONENT_U32: u32 = 5125;

const ACCESSOR_TYPES: [&str; 4] = ["SCALAR", "VEC2", "VEC3", "VEC4"];

/// Index width for an emitted index accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned indices.
    #[default]
    Uint16,
    /// 32-bit unsigned indices.
    Uint32,
}

impl IndexFormat {
    /// Size in bytes of one index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }

    /// The narrowest format that can hold `max_index`.
    pub fn for_max_index(max_index: u32) -> Self {
        if max_index > u16::MAX as u32 {
            Self::Uint32
        } else {
            Self::Uint16
        }
    }
}

/// One baked mesh to include in an exported scene.
pub struct SceneMesh<'a> {
    builder: &'a MeshBuilder,
    uvs: bool,
    tangents: bool,
}

impl<'a> SceneMesh<'a> {
    /// Export the mesh with all attributes.
    pub fn new(builder: &'a MeshBuilder) -> Self {
        Self {
            builder,
            uvs: true,
            tangents: true,
        }
    }

    /// Skip the `TEXCOORD_0` attribute.
    pub fn without_uvs(mut self) -> Self {
        self.uvs = false;
        self
    }

    /// Skip the `TANGENT` attribute.
    pub fn without_tangents(mut self) -> Self {
        self.tangents = false;
        self
    }
}

/// Assemble a glTF document from baked meshes.
///
/// Every builder must have been baked with
/// [`MeshBuilder::build_normals`] and contain at least one vertex.
pub fn export_scene(meshes: &[SceneMesh<'_>]) -> Result<Value, MeshError> {
    let mut buffers = BufferBuilder::default();
    let mut gltf_meshes = Vec::new();
    let mut nodes = Vec::new();

    for (mesh_index, mesh) in meshes.iter().enumerate() {
        let builder = mesh.builder;
        let name = builder
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("mesh{mesh_index}"));
        if builder.vertices().is_empty() {
            return Err(MeshError::EmptyMesh(name));
        }
        if !builder.is_baked() {
            return Err(MeshError::NotBaked(name));
        }

        let positions: Vec<f32> = builder
            .vertices()
            .iter()
            .flat_map(|v| {
                [
                    v.position.x as f32,
                    v.position.y as f32,
                    v.position.z as f32,
                ]
            })
            .collect();
        let normals: Vec<f32> = builder
            .normals()
            .iter()
            .flat_map(|n| [n.x as f32, n.y as f32, n.z as f32])
            .collect();

        let mut attributes = Map::new();
        attributes.insert(
            "POSITION".to_owned(),
            json!(buffers.push_float_accessor(3, &positions)),
        );
        attributes.insert(
            "NORMAL".to_owned(),
            json!(buffers.push_float_accessor(3, &normals)),
        );
        if mesh.uvs {
            let uvs: Vec<f32> = builder
                .vertices()
                .iter()
                .flat_map(|v| [v.uv.x as f32, v.uv.y as f32])
                .collect();
            attributes.insert(
                "TEXCOORD_0".to_owned(),
                json!(buffers.push_float_accessor(2, &uvs)),
            );
        }
        if mesh.tangents {
            let tangents: Vec<f32> = builder
                .tangents()
                .iter()
                .flat_map(|t| [t.x as f32, t.y as f32, t.z as f32, t.w as f32])
                .collect();
            attributes.insert(
                "TANGENT".to_owned(),
                json!(buffers.push_float_accessor(4, &tangents)),
            );
        }

        let indices = buffers.push_index_accessor(builder.indices());
        gltf_meshes.push(json!({
            "name": name.clone(),
            "primitives": [{
                "attributes": Value::Object(attributes),
                "indices": indices,
                "mode": 4,
            }],
        }));
        nodes.push(json!({ "name": name, "mesh": mesh_index }));
    }

    let node_indices: Vec<usize> = (0..nodes.len()).collect();
    Ok(json!({
        "asset": { "version": "2.0", "generator": "kiln-mesh" },
        "buffers": buffers.buffers,
        "bufferViews": buffers.views,
        "accessors": buffers.accessors,
        "meshes": gltf_meshes,
        "nodes": nodes,
        "scenes": [{ "nodes": node_indices }],
        "scene": 0,
    }))
}

/// Export meshes and write the document to `path` as pretty JSON.
pub fn write_scene(path: &Path, meshes: &[SceneMesh<'_>]) -> Result<(), MeshError> {
    let document = export_scene(meshes)?;
    let text = serde_json::to_string_pretty(&document)?;
    std::fs::write(path, text)?;
    log::info!("wrote scene with {} meshes to {}", meshes.len(), path.display());
    Ok(())
}

/// Accumulates buffers, buffer views and accessors for one document.
///
/// Each pushed blob becomes its own buffer and a full-range view of it,
/// so buffer index and view index always coincide.
#[derive(Default)]
struct BufferBuilder {
    buffers: Vec<Value>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    fn push_blob(&mut self, bytes: &[u8]) -> usize {
        let index = self.buffers.len();
        let uri = format!(
            "data:application/octet-stream;base64,{}",
            base64_encode(bytes)
        );
        self.buffers.push(json!({
            "byteLength": bytes.len(),
            "uri": uri,
        }));
        self.views.push(json!({
            "buffer": index,
            "byteLength": bytes.len(),
            "byteOffset": 0,
        }));
        index
    }

    fn push_float_accessor(&mut self, components: usize, values: &[f32]) -> usize {
        let count = values.len() / components;
        let mut min = vec![f32::INFINITY; components];
        let mut max = vec![f32::NEG_INFINITY; components];
        for element in values.chunks_exact(components) {
            for (component, &value) in element.iter().enumerate() {
                min[component] = min[component].min(value);
                max[component] = max[component].max(value);
            }
        }

        let view = self.push_blob(bytemuck::cast_slice(values));
        self.accessors.push(json!({
            "bufferView": view,
            "byteOffset": 0,
            "componentType": COMPONENT_F32,
            "type": ACCESSOR_TYPES[components - 1],
            "count": count,
            "min": min,
            "max": max,
        }));
        self.accessors.len() - 1
    }

    fn push_index_accessor(&mut self, indices: &[u32]) -> usize {
        let min_index = indices.iter().copied().fold(u32::MAX, u32::min);
        let max_index = indices.iter().copied().fold(0, u32::max);
        let format = IndexFormat::for_max_index(max_index);

        let bytes = match format {
            IndexFormat::Uint16 => {
                let narrow: Vec<u16> = indices.iter().map(|&i| i as u16).collect();
                bytemuck::cast_slice(&narrow).to_vec()
            }
            IndexFormat::Uint32 => bytemuck::cast_slice(indices).to_vec(),
        };
        let component_type = match format {
            IndexFormat::Uint16 => COMPONENT_U16,
            IndexFormat::Uint32 => COMPONENT_U32,
        };

        let view = self.push_blob(&bytes);
        self.accessors.push(json!({
            "bufferView": view,
            "byteOffset": 0,
            "componentType": component_type,
            "type": "SCALAR",
            "count": indices.len(),
            "min": [min_index],
            "max": [max_index],
        }));
        self.accessors.len() - 1
    }
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Minimal base64 encoder (avoids adding a dependency).
fn base64_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;

        out.push(BASE64_ALPHABET[(triple >> 18) as usize & 63] as char);
        out.push(BASE64_ALPHABET[(triple >> 12) as usize & 63] as char);
        if chunk.len() > 1 {
            out.push(BASE64_ALPHABET[(triple >> 6) as usize & 63] as char);
        } else {
            out.push('=');
        }
        if chunk.len() > 2 {
            out.push(BASE64_ALPHABET[triple as usize & 63] as char);
        } else {
            out.push('=');
        }
    }
    out
}
