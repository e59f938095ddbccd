//! Mesh model and mesh sources (OBJ/glTF -> neutral [`Mesh`])

mod gltf;
mod normals;
mod obj;
mod triangulate;
mod types;

use anyhow::{bail, Result};
use std::path::Path;

// Re-export public API
pub use self::gltf::GltfSource;
pub use self::obj::ObjSource;
pub use self::types::{Mesh, Polygon};

/// Where a mesh comes from
///
/// Sources own whatever representation they loaded and hand the exporter a
/// fresh [`Mesh`] snapshot on request.
pub trait MeshSource {
    /// Name used in logs and as the default output stem
    fn name(&self) -> &str;

    /// Bake pending procedural deformation into the source.
    ///
    /// Returns the number of modifiers applied.
    fn apply_modifiers(&mut self) -> Result<usize>;

    /// Snapshot of the current mesh, Z-up
    fn to_mesh(&self) -> Result<Mesh>;
}

/// Open a mesh source, detecting the format by extension
pub fn open_source(input: &Path) -> Result<Box<dyn MeshSource>> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => Ok(Box::new(ObjSource::open(input)?)),
        "gltf" | "glb" => Ok(Box::new(GltfSource::open(input)?)),
        _ => bail!(
            "Unsupported mesh format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    }
}

/// Convert a Y-up vector (OBJ, glTF) to the Z-up convention of [`Mesh`]
pub(crate) fn from_y_up([x, y, z]: [f32; 3]) -> [f32; 3] {
    [x, -z, y]
}

/// File stem of a path, for source names
pub(crate) fn source_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}
