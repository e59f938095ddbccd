//! Primitive classification and encoding
//!
//! Turns one source polygon into a [`PrimitiveRecord`]: winding, normal
//! references, color mode, texture and UVs. The record is then printed by
//! the `smx-common` serializer.

use smx_common::{ColorMode, PrimitiveRecord, ShadingMode, TextureBinding};

use crate::error::ExportError;
use crate::material::{TextureLookup, TextureTable};
use crate::mesh::{Mesh, Polygon};

/// Corner order for triangles, compensating the axis flip
pub const TRIANGLE_WINDING: [usize; 3] = [0, 2, 1];

/// Corner order for quads, compensating the axis flip
pub const QUAD_WINDING: [usize; 4] = [3, 2, 0, 1];

/// Color scale for textured primitives (full intensity range)
pub const TEXTURED_COLOR_SCALE: f32 = 255.0;

/// Color scale for untextured primitives (128 is neutral)
pub const UNTEXTURED_COLOR_SCALE: f32 = 128.0;

/// Color used when the mesh has no color layer
pub const DEFAULT_COLOR: [u8; 3] = [128, 128, 128];

/// Shared, read-only state for encoding the polygons of one mesh
pub struct PrimitiveEncoder<'a> {
    mesh: &'a Mesh,
    textures: &'a TextureTable,
    lookup: &'a dyn TextureLookup,
}

impl<'a> PrimitiveEncoder<'a> {
    pub fn new(mesh: &'a Mesh, textures: &'a TextureTable, lookup: &'a dyn TextureLookup) -> Self {
        Self {
            mesh,
            textures,
            lookup,
        }
    }

    /// Encode every polygon in order, stopping at the first failure.
    pub fn encode_all(&self) -> Result<Vec<PrimitiveRecord>, ExportError> {
        self.mesh
            .polygons
            .iter()
            .enumerate()
            .map(|(index, poly)| self.encode(index, poly))
            .collect()
    }

    /// Encode polygon `index` of the mesh.
    ///
    /// The mesh is expected to have passed [`Mesh::validate`].
    pub fn encode(&self, index: usize, poly: &Polygon) -> Result<PrimitiveRecord, ExportError> {
        let winding: &[usize] = match poly.len() {
            3 => &TRIANGLE_WINDING,
            4 => &QUAD_WINDING,
            n => {
                return Err(ExportError::UnsupportedPrimitiveArity {
                    polygon: index,
                    vertex_count: n,
                })
            }
        };

        let corners: Vec<usize> = winding.iter().map(|&c| poly.loop_start + c).collect();
        let vertices: Vec<u32> = winding.iter().map(|&c| poly.vertices[c]).collect();

        let (shading, normals) = if poly.smooth {
            (ShadingMode::Smooth, vertices.clone())
        } else {
            let flat = self.mesh.vertex_count() + index;
            (ShadingMode::Flat, vec![flat as u32])
        };

        let texture = self
            .textures
            .texture_index_of(self.lookup, self.mesh.material(poly.material))
            .map_err(|texture| ExportError::TextureResolutionAmbiguous {
                polygon: index,
                texture: texture.name().to_string(),
            })?;

        let colors = self.corner_colors(&corners, texture.is_some());
        let color_mode = ColorMode::classify(&colors);

        let texture = match texture {
            Some(texture_index) => {
                let layer = self
                    .mesh
                    .uvs
                    .as_ref()
                    .ok_or(ExportError::MissingUvLayer { polygon: index })?;
                Some(TextureBinding {
                    index: texture_index as u32,
                    uvs: corners.iter().map(|&l| layer[l]).collect(),
                })
            }
            None => None,
        };

        Ok(PrimitiveRecord {
            vertices,
            normals,
            shading,
            color_mode,
            colors,
            texture,
        })
    }

    /// Scaled color of each corner, in emitted order
    fn corner_colors(&self, corners: &[usize], textured: bool) -> Vec<[u8; 3]> {
        let Some(layer) = &self.mesh.colors else {
            return vec![DEFAULT_COLOR; corners.len()];
        };
        let scale = if textured {
            TEXTURED_COLOR_SCALE
        } else {
            UNTEXTURED_COLOR_SCALE
        };
        corners
            .iter()
            .map(|&l| {
                let [r, g, b, _] = layer[l];
                [scale_channel(r, scale), scale_channel(g, scale), scale_channel(b, scale)]
            })
            .collect()
    }
}

/// Scale a 0..1 channel and truncate toward zero
fn scale_channel(value: f32, scale: f32) -> u8 {
    (value.clamp(0.0, 1.0) * scale) as u8
}
