//! Primitive (`<poly>`) schema types
//!
//! A [`PrimitiveRecord`] holds everything computed for one polygon. How the
//! record is printed lives in the writer; this module only describes what a
//! primitive is.

use std::fmt;

/// Lighting mode of a primitive (`shading` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadingMode {
    /// Per-vertex averaged normals, shared with the smooth normal table
    Smooth,
    /// One per-face normal from the flat section of the normal table
    Flat,
}

impl ShadingMode {
    /// Attribute value written to the `shading` attribute
    pub fn code(self) -> char {
        match self {
            ShadingMode::Smooth => 'S',
            ShadingMode::Flat => 'F',
        }
    }
}

/// Color mode of a primitive (first letter of the type tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Single uniform color across the primitive
    Flat,
    /// Per-corner interpolated color
    Gouraud,
}

impl ColorMode {
    pub fn code(self) -> char {
        match self {
            ColorMode::Flat => 'F',
            ColorMode::Gouraud => 'G',
        }
    }

    /// Classify a set of corner colors: identical corners are flat.
    pub fn classify(colors: &[[u8; 3]]) -> Self {
        match colors.split_first() {
            Some((first, rest)) if rest.iter().any(|c| c != first) => ColorMode::Gouraud,
            _ => ColorMode::Flat,
        }
    }
}

/// Compact primitive type tag, e.g. `F3`, `GT4`
///
/// Letter order is fixed: color mode, optional texture flag, then arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub color: ColorMode,
    pub textured: bool,
    pub arity: u8,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color.code())?;
        if self.textured {
            f.write_str("T")?;
        }
        write!(f, "{}", self.arity)
    }
}

/// Texture reference of a textured primitive
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBinding {
    /// Index into the `<textures>` block
    pub index: u32,
    /// One UV pair per corner, in emitted vertex order
    pub uvs: Vec<[f32; 2]>,
}

/// One encoded primitive, ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveRecord {
    /// Vertex table indices, already in SMX winding order
    pub vertices: Vec<u32>,
    /// Normal table indices: one per vertex when smooth, a single one when flat
    pub normals: Vec<u32>,
    pub shading: ShadingMode,
    pub color_mode: ColorMode,
    /// One scaled RGB triplet per corner, in emitted vertex order
    pub colors: Vec<[u8; 3]>,
    pub texture: Option<TextureBinding>,
}

impl PrimitiveRecord {
    /// Number of vertices (3 or 4)
    pub fn arity(&self) -> u8 {
        self.vertices.len() as u8
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    /// Type tag derived from the record's color mode, texture and arity
    pub fn type_tag(&self) -> TypeTag {
        TypeTag {
            color: self.color_mode,
            textured: self.is_textured(),
            arity: self.arity(),
        }
    }
}
