//! Neutral mesh description consumed by the encoder

use std::ops::Range;

use crate::error::ExportError;
use crate::material::Material;

/// One polygon of a [`Mesh`]
///
/// Corner data (colors, UVs) is addressed through loop indices: corner `i`
/// of this polygon is loop `loop_start + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Vertex indices in source winding order
    pub vertices: Vec<u32>,
    /// First loop index owned by this polygon
    pub loop_start: usize,
    /// Material slot index into [`Mesh::materials`]
    pub material: usize,
    /// Smooth (per-vertex normals) vs flat (per-face normal) shading
    pub smooth: bool,
    /// Face normal in source axes
    pub normal: [f32; 3],
}

impl Polygon {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Loop indices of this polygon's corners, in corner order
    pub fn loop_indices(&self) -> Range<usize> {
        self.loop_start..self.loop_start + self.vertices.len()
    }
}

/// Snapshot of a mesh handed to the exporter
///
/// Positions and normals are in source axes (Z up). The encoder remaps them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    /// Averaged per-vertex normals, one per position
    pub vertex_normals: Vec<[f32; 3]>,
    pub polygons: Vec<Polygon>,
    /// Material slots; `None` is an empty slot
    pub materials: Vec<Option<Material>>,
    /// Active color layer, RGBA in 0..1, one entry per loop
    pub colors: Option<Vec<[f32; 4]>>,
    /// Active UV layer, one entry per loop
    pub uvs: Option<Vec<[f32; 2]>>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Total number of polygon corners
    pub fn loop_count(&self) -> usize {
        self.polygons.iter().map(Polygon::len).sum()
    }

    /// Material in `slot`, if the slot exists and is filled
    pub fn material(&self, slot: usize) -> Option<&Material> {
        self.materials.get(slot).and_then(Option::as_ref)
    }

    /// Append a polygon, allocating its loops at the end of the loop range.
    pub fn push_polygon(&mut self, vertices: Vec<u32>, material: usize, smooth: bool) {
        let loop_start = self.loop_count();
        self.polygons.push(Polygon {
            vertices,
            loop_start,
            material,
            smooth,
            normal: [0.0, 0.0, 0.0],
        });
    }

    /// Whether any polygon is flat shaded
    pub fn has_flat_polygons(&self) -> bool {
        self.polygons.iter().any(|p| !p.smooth)
    }

    /// Check index ranges and layer lengths before encoding.
    pub fn validate(&self) -> Result<(), ExportError> {
        let vertex_count = self.vertex_count();
        let mut next_loop = 0;
        for (polygon, poly) in self.polygons.iter().enumerate() {
            // Loops are packed in polygon order
            if poly.loop_start != next_loop {
                return Err(ExportError::LoopStartMismatch {
                    polygon,
                    loop_start: poly.loop_start,
                    expected: next_loop,
                });
            }
            next_loop += poly.len();

            if let Some(&vertex) = poly.vertices.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(ExportError::VertexOutOfRange {
                    polygon,
                    vertex,
                    vertex_count,
                });
            }
        }

        if self.vertex_normals.len() != vertex_count {
            return Err(ExportError::LayerLengthMismatch {
                layer: "vertex normals",
                expected: vertex_count,
                actual: self.vertex_normals.len(),
            });
        }

        let loops = self.loop_count();
        if let Some(colors) = &self.colors {
            if colors.len() != loops {
                return Err(ExportError::LayerLengthMismatch {
                    layer: "color",
                    expected: loops,
                    actual: colors.len(),
                });
            }
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != loops {
                return Err(ExportError::LayerLengthMismatch {
                    layer: "uv",
                    expected: loops,
                    actual: uvs.len(),
                });
            }
        }

        Ok(())
    }
}
