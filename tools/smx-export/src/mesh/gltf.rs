//! glTF/GLB mesh source

use super::types::Mesh;
use super::{from_y_up, source_name, MeshSource};
use crate::material::{Material, ShaderGraph, TextureRef};
use anyhow::{bail, Context, Result};
use hashbrown::HashSet;
use std::path::Path;

/// First mesh of a glTF/GLB file
///
/// All triangle primitives are merged into one [`Mesh`]. Applying modifiers
/// bakes the mesh's default morph target weights into the positions.
pub struct GltfSource {
    name: String,
    document: ::gltf::Document,
    buffers: Vec<::gltf::buffer::Data>,
    bake_morph_targets: bool,
}

impl GltfSource {
    /// Load the document and its buffers. Images are referenced, not decoded.
    pub fn open(input: &Path) -> Result<Self> {
        let ::gltf::Gltf { document, blob } =
            ::gltf::Gltf::open(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;
        let buffers = ::gltf::import_buffers(&document, input.parent(), blob)
            .with_context(|| format!("Failed to load glTF buffers: {:?}", input))?;

        if document.meshes().next().is_none() {
            bail!("No meshes found in glTF");
        }

        Ok(Self {
            name: source_name(input),
            document,
            buffers,
            bake_morph_targets: false,
        })
    }
}

impl MeshSource for GltfSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_modifiers(&mut self) -> Result<usize> {
        let targets = self
            .document
            .meshes()
            .next()
            .and_then(|m| m.weights())
            .map_or(0, |w| w.iter().filter(|&&w| w != 0.0).count());
        if targets > 0 {
            tracing::debug!("Baking {} weighted morph targets", targets);
        }
        self.bake_morph_targets = true;
        Ok(targets)
    }

    fn to_mesh(&self) -> Result<Mesh> {
        let gltf_mesh = self
            .document
            .meshes()
            .next()
            .context("No meshes found in glTF")?;
        let weights: &[f32] = if self.bake_morph_targets {
            gltf_mesh.weights().unwrap_or(&[])
        } else {
            &[]
        };

        let mut mesh = Mesh::default();
        let mut file_normals: Vec<Option<[f32; 3]>> = Vec::new();
        let mut vertex_colors: Vec<Option<[f32; 4]>> = Vec::new();
        let mut vertex_uvs: Vec<Option<[f32; 2]>> = Vec::new();
        let mut colored_materials: HashSet<usize> = HashSet::new();

        let material_count = self.document.materials().count();
        // Primitives without a material share one empty slot after the real ones
        let default_slot = material_count;

        for (prim_index, primitive) in gltf_mesh.primitives().enumerate() {
            if primitive.mode() != ::gltf::mesh::Mode::Triangles {
                tracing::warn!(
                    "Skipping primitive {} with mode {:?} (only triangles are exported)",
                    prim_index,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&self.buffers[buffer.index()]));

            // Positions (required)
            let mut positions: Vec<[f32; 3]> = reader
                .read_positions()
                .with_context(|| format!("No positions in primitive {}", prim_index))?
                .collect();
            let count = positions.len();

            for (target, (displacements, _, _)) in reader.read_morph_targets().enumerate() {
                let weight = weights.get(target).copied().unwrap_or(0.0);
                if weight == 0.0 {
                    continue;
                }
                if let Some(displacements) = displacements {
                    for (p, d) in positions.iter_mut().zip(displacements) {
                        p[0] += weight * d[0];
                        p[1] += weight * d[1];
                        p[2] += weight * d[2];
                    }
                }
            }

            // Normals (optional) - present means smooth shading
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());
            let smooth = normals.as_ref().is_some_and(|n| n.len() == count);

            // UVs (optional) - flipped to bottom-left origin
            let uvs: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().map(|[u, v]| [u, 1.0 - v]).collect());

            // Colors (optional) - COLOR_0 as RGBA
            let colors: Option<Vec<[f32; 4]>> = reader
                .read_colors(0)
                .map(|iter| iter.into_rgba_f32().collect());

            let indices: Vec<u32> = match reader.read_indices() {
                Some(iter) => iter.into_u32().collect(),
                None => (0..count as u32).collect(),
            };
            if indices.len() % 3 != 0 {
                bail!(
                    "Primitive {} has {} indices, not a multiple of 3",
                    prim_index,
                    indices.len()
                );
            }
            if let Some(&bad) = indices.iter().find(|&&i| i as usize >= count) {
                bail!(
                    "Primitive {} index {} exceeds its {} vertices",
                    prim_index,
                    bad,
                    count
                );
            }

            let slot = primitive.material().index().unwrap_or(default_slot);
            if colors.is_some() {
                colored_materials.insert(slot);
            }

            let offset = mesh.positions.len() as u32;
            mesh.positions.extend(positions.into_iter().map(from_y_up));
            file_normals.extend((0..count).map(|i| {
                normals
                    .as_ref()
                    .filter(|_| smooth)
                    .map(|n| from_y_up(n[i]))
            }));
            vertex_colors.extend((0..count).map(|i| colors.as_ref().and_then(|c| c.get(i).copied())));
            vertex_uvs.extend((0..count).map(|i| uvs.as_ref().and_then(|uv| uv.get(i).copied())));

            for tri in indices.chunks_exact(3) {
                mesh.push_polygon(tri.iter().map(|&i| i + offset).collect(), slot, smooth);
            }
        }

        if mesh.polygons.is_empty() {
            bail!("Mesh has no triangle primitives");
        }

        mesh.materials = self
            .document
            .materials()
            .map(|material| Some(convert_material(&material, &colored_materials)))
            .collect();
        mesh.materials.push(None);

        // Per-vertex layers become per-corner layers
        let corner_vertices: Vec<usize> = mesh
            .polygons
            .iter()
            .flat_map(|p| p.vertices.iter().map(|&v| v as usize))
            .collect();
        if vertex_colors.iter().any(Option::is_some) {
            mesh.colors = Some(
                corner_vertices
                    .iter()
                    .map(|&v| vertex_colors[v].unwrap_or([1.0; 4]))
                    .collect(),
            );
        }
        if vertex_uvs.iter().any(Option::is_some) {
            mesh.uvs = Some(
                corner_vertices
                    .iter()
                    .map(|&v| vertex_uvs[v].unwrap_or([0.0, 0.0]))
                    .collect(),
            );
        }

        // Computed normals fill in for primitives that had none
        mesh.recalculate_normals();
        for (normal, file_normal) in mesh.vertex_normals.iter_mut().zip(&file_normals) {
            if let Some(n) = file_normal {
                *normal = *n;
            }
        }

        Ok(mesh)
    }
}

/// Map a glTF material onto a shader graph.
///
/// Base color texture becomes a diffuse input, mixed with vertex color when
/// primitives using the material carry COLOR_0; otherwise the emissive
/// texture becomes an emission input.
fn convert_material(material: &::gltf::Material, colored: &HashSet<usize>) -> Material {
    let name = material
        .name()
        .map(str::to_string)
        .or_else(|| material.index().map(|i| format!("material{}", i)))
        .unwrap_or_else(|| "default".to_string());

    let vertex_colored = material.index().is_some_and(|i| colored.contains(&i));
    let base = material
        .pbr_metallic_roughness()
        .base_color_texture()
        .map(|info| image_ref(&info.texture().source()));
    let emissive = material
        .emissive_texture()
        .map(|info| image_ref(&info.texture().source()));

    let graph = match (base, emissive) {
        (Some(image), _) if vertex_colored => Some(ShaderGraph::diffuse_texture_vertex_color(image)),
        (Some(image), _) => Some(ShaderGraph::diffuse_texture(image)),
        (None, Some(image)) => Some(ShaderGraph::emission_texture(image)),
        (None, None) => None,
    };
    Material::new(name, graph)
}

/// Identity of a glTF image: its URI, else its name, else `image<N>`
fn image_ref(image: &::gltf::Image) -> TextureRef {
    match image.source() {
        ::gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => TextureRef::new(uri),
        _ => TextureRef::new(
            image
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("image{}", image.index())),
        ),
    }
}
