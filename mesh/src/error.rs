use std::fmt;

/// Errors that can occur while exporting baked meshes.
#[derive(Debug)]
pub enum MeshError {
    /// `build_normals()` was not called on the mesh before export.
    NotBaked(String),
    /// The mesh has no vertices.
    EmptyMesh(String),
    /// Failed to serialize the scene document.
    Json(serde_json::Error),
    /// An IO error occurred while writing the output file.
    Io(std::io::Error),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::NotBaked(name) => {
                write!(f, "mesh {name:?} was not baked (call build_normals first)")
            }
            MeshError::EmptyMesh(name) => write!(f, "mesh {name:?} has no vertices"),
            MeshError::Json(err) => write!(f, "JSON serialization error: {err}"),
            MeshError::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshError::Json(err) => Some(err),
            MeshError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MeshError {
    fn from(err: serde_json::Error) -> Self {
        MeshError::Json(err)
    }
}

impl From<std::io::Error> for MeshError {
    fn from(err: std::io::Error) -> Self {
        MeshError::Io(err)
    }
}
