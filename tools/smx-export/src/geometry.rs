//! Vertex and normal tables
//!
//! SMX is Y-down with Z forward; source meshes are Z-up. Every position and
//! normal goes through [`to_smx_axes`] before it is written.

use smx_common::NormalBlock;

use crate::mesh::Mesh;

/// Remap source axes to SMX axes: `(x, y, z) -> (x, -z, y)`
pub fn to_smx_axes([x, y, z]: [f32; 3]) -> [f32; 3] {
    [x, -z, y]
}

/// Vertex table in mesh order, remapped
pub fn vertex_table(mesh: &Mesh) -> Vec<[f32; 3]> {
    mesh.positions.iter().copied().map(to_smx_axes).collect()
}

/// Combined normal table, remapped
///
/// Smooth normals (one per vertex) always come first. If any polygon is
/// flat shaded, one face normal per polygon follows, for every polygon,
/// so that polygon `p` finds its flat normal at `vertex_count + p`.
pub fn normal_table(mesh: &Mesh) -> NormalBlock {
    let smooth = mesh
        .vertex_normals
        .iter()
        .copied()
        .map(to_smx_axes)
        .collect();
    let flat = if mesh.has_flat_polygons() {
        mesh.polygons.iter().map(|p| to_smx_axes(p.normal)).collect()
    } else {
        Vec::new()
    };
    NormalBlock { smooth, flat }
}
