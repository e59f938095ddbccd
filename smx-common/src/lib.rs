//! Shared types for the SMX model interchange format
//!
//! This crate is the format half of the exporter and is shared between:
//! - `smx-export` (library: encodes meshes into [`SmxDocument`]s)
//! - `smx-export` (binary: writes and checks `.smx` files)
//!
//! # Modules
//!
//! - [`formats`] - schema types, the text serializer and the structural reader

pub mod formats;

pub use formats::{
    // Constants
    SMX_EXT,
    SMX_FORMAT_VERSION,
    // Schema types
    BlockCounts,
    ColorMode,
    FormatError,
    NormalBlock,
    PrimitiveRecord,
    ShadingMode,
    SmxDocument,
    TextureBinding,
    TypeTag,
    // Reader
    read_block_counts,
};
