//! SMX text format
//!
//! An SMX file is a small XML dialect describing one model:
//!
//! ```text
//! <!-- header comments -->
//! <model version="1">
//!     <vertices count="N"> <v x=".." y=".." z=".."/> ... </vertices>
//!     <normals count="M"> <v x=".." y=".." z=".."/> ... </normals>
//!     <textures count="K"> <texture file="stem"/> ... </textures>
//!     <primitives count="P"> <poly v0=".." ... type=".."/> ... </primitives>
//! </model>
//! ```
//!
//! The normal block is optional and the texture block is only present when
//! at least one texture is referenced. Every block declares a `count` that
//! must equal the number of child elements it contains.

pub mod document;
pub mod primitive;
pub mod reader;
mod writer;

pub use document::*;
pub use primitive::*;
pub use reader::{read_block_counts, BlockCounts, FormatError};

/// File extension for SMX models (without the dot)
pub const SMX_EXT: &str = "smx";

/// Value of the `version` attribute on the `<model>` root
pub const SMX_FORMAT_VERSION: u32 = 1;

#[cfg(test)]
mod tests;
