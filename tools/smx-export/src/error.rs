//! Encoding errors
//!
//! All of these abort the export; no partial document is written.

/// Failure while encoding a mesh into an SMX document
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    /// Polygon is neither a triangle nor a quad
    #[error(
        "polygon {polygon} has {vertex_count} vertices; only triangles and quads are supported \
         (enable n-gon triangulation to split larger faces)"
    )]
    UnsupportedPrimitiveArity { polygon: usize, vertex_count: usize },

    /// Material resolved to a texture the texture table does not contain
    #[error("polygon {polygon} uses texture '{texture}' which is missing from the texture table")]
    TextureResolutionAmbiguous { polygon: usize, texture: String },

    /// Textured polygon but the mesh has no UV layer
    #[error("polygon {polygon} is textured but the mesh has no UV layer")]
    MissingUvLayer { polygon: usize },

    /// Polygon references a vertex past the end of the vertex table
    #[error("polygon {polygon} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        polygon: usize,
        vertex: u32,
        vertex_count: usize,
    },

    /// Polygon's corners do not start where the previous polygon's ended
    #[error("polygon {polygon} starts at loop {loop_start}, expected {expected}")]
    LoopStartMismatch {
        polygon: usize,
        loop_start: usize,
        expected: usize,
    },

    /// A per-vertex or per-corner layer is shorter than the mesh requires
    #[error("{layer} layer has {actual} entries, expected {expected}")]
    LayerLengthMismatch {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },
}
