//! smx-export library
//!
//! Converts meshes (OBJ, glTF/GLB) into SMX documents. The `smx-export`
//! binary and the manifest builder are thin layers over [`export_file`].

pub mod error;
pub mod export;
pub mod formats;
pub mod geometry;
pub mod manifest;
pub mod material;
pub mod mesh;
pub mod primitive;

// Re-export the format crate's public types
pub use smx_common::{
    read_block_counts, BlockCounts, ColorMode, NormalBlock, PrimitiveRecord, ShadingMode,
    SmxDocument, TextureBinding, TypeTag, SMX_EXT, SMX_FORMAT_VERSION,
};

pub use error::ExportError;
pub use export::{assemble, export_file, export_source, ExportOptions, ExportSummary};
pub use material::{Material, ShaderGraph, ShaderGraphLookup, TextureLookup, TextureRef, TextureTable};
pub use mesh::{open_source, Mesh, MeshSource, Polygon};
