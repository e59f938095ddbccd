//! Wavefront OBJ (+ MTL) mesh source

use super::types::Mesh;
use super::{from_y_up, source_name, MeshSource};
use crate::material::{Material, ShaderGraph, TextureRef};
use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Mesh loaded from an OBJ file
///
/// OBJ has no modifier stack, so [`MeshSource::apply_modifiers`] is a no-op.
pub struct ObjSource {
    name: String,
    mesh: Mesh,
}

impl ObjSource {
    /// Load an OBJ file and any material libraries it references
    pub fn open(input: &Path) -> Result<Self> {
        let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
        let base_dir = input.parent().unwrap_or_else(|| Path::new("."));
        let mesh = parse_obj(BufReader::new(file), base_dir)
            .with_context(|| format!("Failed to parse OBJ: {:?}", input))?;
        Ok(Self {
            name: source_name(input),
            mesh,
        })
    }
}

impl MeshSource for ObjSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_modifiers(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn to_mesh(&self) -> Result<Mesh> {
        Ok(self.mesh.clone())
    }
}

/// Parse OBJ text into a mesh. `mtllib` paths resolve against `base_dir`.
pub(crate) fn parse_obj<R: BufRead>(reader: R, base_dir: &Path) -> Result<Mesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut vertex_colors: Vec<Option<[f32; 4]>> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normal_count = 0usize;

    let mut library: HashMap<String, ShaderGraph> = HashMap::new();
    let mut slots: Vec<Option<String>> = Vec::new();
    let mut current_slot: Option<usize> = None;
    let mut smooth = false;

    let mut mesh = Mesh::default();
    // Per-corner vt index, None when the corner had none
    let mut corner_uvs: Vec<Option<usize>> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                let x: f32 = parts[1].parse().unwrap_or(0.0);
                let y: f32 = parts[2].parse().unwrap_or(0.0);
                let z: f32 = parts[3].parse().unwrap_or(0.0);
                positions.push(from_y_up([x, y, z]));

                // Vertex color extension: v x y z r g b
                let color = if parts.len() >= 7 {
                    let r: f32 = parts[4].parse().unwrap_or(1.0);
                    let g: f32 = parts[5].parse().unwrap_or(1.0);
                    let b: f32 = parts[6].parse().unwrap_or(1.0);
                    Some([r, g, b, 1.0])
                } else {
                    None
                };
                vertex_colors.push(color);
            }
            "vt" if parts.len() >= 3 => {
                let u: f32 = parts[1].parse().unwrap_or(0.0);
                let v: f32 = parts[2].parse().unwrap_or(0.0);
                tex_coords.push([u, v]);
            }
            "vn" => normal_count += 1,
            "s" => smooth = !matches!(parts.get(1), None | Some(&"off") | Some(&"0")),
            "mtllib" => {
                for lib in &parts[1..] {
                    let path = base_dir.join(lib);
                    match load_mtl(&path) {
                        Ok(materials) => library.extend(materials),
                        Err(e) => tracing::warn!("Skipping material library {:?}: {:#}", path, e),
                    }
                }
            }
            "usemtl" => {
                let name = parts[1..].join(" ");
                let slot = match slots.iter().position(|s| s.as_deref() == Some(name.as_str())) {
                    Some(slot) => slot,
                    None => {
                        slots.push(Some(name));
                        slots.len() - 1
                    }
                };
                current_slot = Some(slot);
            }
            "f" if parts.len() >= 4 => {
                let mut vertices = Vec::with_capacity(parts.len() - 1);
                for token in &parts[1..] {
                    let Some((vi, vti)) = parse_obj_vertex(token, positions.len(), tex_coords.len())
                    else {
                        bail!("line {}: invalid face vertex '{}'", line_no + 1, token);
                    };
                    vertices.push(vi as u32);
                    corner_uvs.push(vti);
                }

                let slot = *current_slot.get_or_insert_with(|| {
                    // Faces before any usemtl go in an empty slot
                    slots.push(None);
                    slots.len() - 1
                });
                mesh.push_polygon(vertices, slot, smooth);
            }
            "f" => tracing::warn!("line {}: skipping face with fewer than 3 vertices", line_no + 1),
            _ => {}
        }
    }

    if positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    if normal_count > 0 {
        tracing::debug!("Ignoring {} OBJ normals, vertex normals are recomputed", normal_count);
    }

    // Per-vertex colors become per-corner colors
    if vertex_colors.iter().any(Option::is_some) {
        let corners = mesh
            .polygons
            .iter()
            .flat_map(|p| p.vertices.iter())
            .map(|&v| vertex_colors[v as usize].unwrap_or([1.0; 4]))
            .collect();
        mesh.colors = Some(corners);
    }

    if corner_uvs.iter().any(Option::is_some) {
        let missing = corner_uvs.iter().filter(|uv| uv.is_none()).count();
        if missing > 0 {
            tracing::warn!("{} face corners have no texture coordinate, using (0, 0)", missing);
        }
        mesh.uvs = Some(
            corner_uvs
                .iter()
                .map(|uv| uv.map(|i| tex_coords[i]).unwrap_or([0.0, 0.0]))
                .collect(),
        );
    }

    mesh.materials = slots
        .into_iter()
        .map(|slot| {
            slot.map(|name| {
                let graph = library.get(&name).cloned();
                if graph.is_none() {
                    tracing::debug!("Material '{}' has no texture map", name);
                }
                Material::new(name, graph)
            })
        })
        .collect();

    mesh.positions = positions;
    mesh.recalculate_normals();
    Ok(mesh)
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
///
/// Indices are 1-based; negative indices count back from the latest element.
fn parse_obj_vertex(s: &str, vertex_count: usize, uv_count: usize) -> Option<(usize, Option<usize>)> {
    let mut parts = s.split('/');

    let vi = resolve_index(parts.next()?, vertex_count)?;

    let vti = match parts.next().filter(|s| !s.is_empty()) {
        Some(t) => Some(resolve_index(t, uv_count)?),
        None => None,
    };

    Some((vi, vti))
}

fn resolve_index(s: &str, count: usize) -> Option<usize> {
    let i: i64 = s.parse().ok()?;
    let resolved = if i > 0 {
        i - 1
    } else if i < 0 {
        count as i64 + i
    } else {
        return None;
    };
    (0..count as i64).contains(&resolved).then_some(resolved as usize)
}

/// Load a material library, mapping each material to a shader graph.
///
/// `map_Kd` becomes a diffuse texture and `map_Ke` an emission texture;
/// diffuse wins when both are present.
fn load_mtl(path: &Path) -> Result<HashMap<String, ShaderGraph>> {
    let file = File::open(path).with_context(|| format!("Failed to open MTL: {:?}", path))?;
    parse_mtl(BufReader::new(file))
}

pub(crate) fn parse_mtl<R: BufRead>(reader: R) -> Result<HashMap<String, ShaderGraph>> {
    #[derive(Default)]
    struct Entry {
        diffuse: Option<String>,
        emission: Option<String>,
    }

    let mut entries: Vec<(String, Entry)> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&key, args)) = parts.split_first() else {
            continue;
        };
        match key {
            "newmtl" => entries.push((args.join(" "), Entry::default())),
            // Map options (-s, -o, ...) precede the file name
            "map_Kd" | "map_Ke" => {
                let (Some(file), Some((_, entry))) = (args.last(), entries.last_mut()) else {
                    continue;
                };
                let slot = if key == "map_Kd" {
                    &mut entry.diffuse
                } else {
                    &mut entry.emission
                };
                *slot = Some(file.to_string());
            }
            _ => {}
        }
    }

    Ok(entries
        .into_iter()
        .filter_map(|(name, entry)| {
            let graph = match (entry.diffuse, entry.emission) {
                (Some(diffuse), _) => ShaderGraph::diffuse_texture(TextureRef::new(diffuse)),
                (None, Some(emission)) => ShaderGraph::emission_texture(TextureRef::new(emission)),
                (None, None) => return None,
            };
            Some((name, graph))
        })
        .collect())
}
