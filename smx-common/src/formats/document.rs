//! SMX document model
//!
//! All coordinates stored here are already in SMX axis convention.

use super::primitive::PrimitiveRecord;

/// Combined normal table
///
/// Smooth normals occupy indices `0..smooth.len()`. Flat normals follow
/// directly after, so the flat normal of polygon `p` lives at
/// `smooth.len() + p`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalBlock {
    pub smooth: Vec<[f32; 3]>,
    pub flat: Vec<[f32; 3]>,
}

impl NormalBlock {
    /// Whether the flat section is present
    pub fn has_flats(&self) -> bool {
        !self.flat.is_empty()
    }

    /// Total entry count of the combined table
    pub fn len(&self) -> usize {
        self.smooth.len() + self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the first flat normal
    pub fn flat_base(&self) -> usize {
        self.smooth.len()
    }
}

/// A complete SMX model, in emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmxDocument {
    /// Header comment lines (without the `<!--`/`-->` delimiters)
    pub header: Vec<String>,
    pub vertices: Vec<[f32; 3]>,
    /// `None` when normal export is disabled
    pub normals: Option<NormalBlock>,
    /// Texture file stems, in texture-index order
    pub textures: Vec<String>,
    pub primitives: Vec<PrimitiveRecord>,
}

impl SmxDocument {
    /// Render the document to its text form.
    ///
    /// Equivalent to `to_string()`; rendering is deterministic, so the same
    /// document always produces byte-identical output.
    pub fn render(&self) -> String {
        self.to_string()
    }
}
