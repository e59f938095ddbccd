//! N-gon fan triangulation

use super::types::{Mesh, Polygon};

impl Mesh {
    /// Fan-split every polygon with more than 4 vertices into triangles.
    ///
    /// Triangles and quads are kept as-is. Corner layers are rebuilt so each
    /// new triangle owns its own loops. Returns the number of n-gons split.
    ///
    /// Assumes convex n-gons, like the OBJ fan triangulation it mirrors.
    pub fn triangulate_ngons(&mut self) -> usize {
        if self.polygons.iter().all(|p| p.len() <= 4) {
            return 0;
        }

        let mut split = 0;
        let mut polygons = Vec::with_capacity(self.polygons.len());
        // Source loop index for each new loop
        let mut loop_map: Vec<usize> = Vec::with_capacity(self.loop_count());

        for poly in &self.polygons {
            let corners: Vec<usize> = poly.loop_indices().collect();
            if poly.len() <= 4 {
                polygons.push(Polygon {
                    loop_start: loop_map.len(),
                    ..poly.clone()
                });
                loop_map.extend_from_slice(&corners);
                continue;
            }

            split += 1;
            for i in 1..poly.len() - 1 {
                let fan = [0, i, i + 1];
                polygons.push(Polygon {
                    vertices: fan.iter().map(|&c| poly.vertices[c]).collect(),
                    loop_start: loop_map.len(),
                    material: poly.material,
                    smooth: poly.smooth,
                    normal: poly.normal,
                });
                loop_map.extend(fan.iter().map(|&c| corners[c]));
            }
        }

        self.colors = self.colors.as_deref().map(|c| remap_layer(c, &loop_map));
        self.uvs = self.uvs.as_deref().map(|uv| remap_layer(uv, &loop_map));
        self.polygons = polygons;

        tracing::debug!("Triangulated {} n-gons", split);
        split
    }
}

fn remap_layer<T: Copy + Default>(layer: &[T], loop_map: &[usize]) -> Vec<T> {
    loop_map
        .iter()
        .map(|&src| layer.get(src).copied().unwrap_or_default())
        .collect()
}
