//! Face and vertex normal calculation

use super::types::Mesh;

/// Unnormalized face normal by Newell's method.
///
/// Length is twice the polygon area, so summing these weights each face by
/// its area. Works for non-planar quads and n-gons.
pub(crate) fn newell_normal(positions: &[[f32; 3]], vertices: &[u32]) -> [f32; 3] {
    let mut n = [0.0f32; 3];
    for (i, &a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        let (Some(p), Some(q)) = (positions.get(a as usize), positions.get(b as usize)) else {
            continue;
        };
        n[0] += (p[1] - q[1]) * (p[2] + q[2]);
        n[1] += (p[2] - q[2]) * (p[0] + q[0]);
        n[2] += (p[0] - q[0]) * (p[1] + q[1]);
    }
    n
}

/// Normalize, leaving degenerate vectors at zero
pub(crate) fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 0.0, 0.0]
    }
}

impl Mesh {
    /// Recompute face normals and area-weighted averaged vertex normals.
    pub fn recalculate_normals(&mut self) {
        let mut sums = vec![[0.0f32; 3]; self.positions.len()];
        for poly in &mut self.polygons {
            let weighted = newell_normal(&self.positions, &poly.vertices);
            poly.normal = normalize(weighted);
            for &v in &poly.vertices {
                if let Some(sum) = sums.get_mut(v as usize) {
                    sum[0] += weighted[0];
                    sum[1] += weighted[1];
                    sum[2] += weighted[2];
                }
            }
        }
        self.vertex_normals = sums.into_iter().map(normalize).collect();
    }
}
