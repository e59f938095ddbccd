//! Document assembly (mesh -> SMX document -> .smx file)
//!
//! Passes run in a fixed order: vertices, normals, textures, primitives.
//! The texture table must exist before any primitive is encoded because
//! primitives refer to textures by table index.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::ExportError;
use crate::formats::{write_smx_file, SmxDocument};
use crate::geometry::{normal_table, vertex_table};
use crate::material::{ShaderGraphLookup, TextureLookup, TextureTable};
use crate::mesh::{open_source, Mesh, MeshSource};
use crate::primitive::PrimitiveEncoder;

/// Header comment lines written at the top of every file
pub const HEADER: [&str; 3] = [
    "Created using smx-export",
    "NOTE: If you plan to use this model as a static mesh, it is recommended that you run this file through smxopt",
    "or smxtool to clean up duplicate/unused normals which are kept for animation purposes.",
];

/// Export settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    /// Bake the source's modifiers before taking the mesh snapshot
    pub apply_modifiers: bool,
    /// Emit the `<normals>` block
    pub write_normals: bool,
    /// Fan-split polygons with more than 4 vertices instead of failing
    pub triangulate_ngons: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            apply_modifiers: true,
            write_normals: true,
            triangulate_ngons: false,
        }
    }
}

/// What an export produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub vertices: usize,
    /// `None` when the normal block was not written
    pub normals: Option<usize>,
    pub textures: usize,
    pub primitives: usize,
    pub modifiers_applied: usize,
    pub ngons_split: usize,
}

impl ExportSummary {
    fn of(document: &SmxDocument) -> Self {
        Self {
            vertices: document.vertices.len(),
            normals: document.normals.as_ref().map(|n| n.len()),
            textures: document.textures.len(),
            primitives: document.primitives.len(),
            ..Default::default()
        }
    }
}

/// Assemble an SMX document from a mesh snapshot.
pub fn assemble(
    mesh: &Mesh,
    lookup: &dyn TextureLookup,
    write_normals: bool,
) -> Result<SmxDocument, ExportError> {
    mesh.validate()?;

    let vertices = vertex_table(mesh);
    let normals = write_normals.then(|| normal_table(mesh));
    let textures = TextureTable::resolve(&mesh.materials, lookup);
    let primitives = PrimitiveEncoder::new(mesh, &textures, lookup).encode_all()?;

    Ok(SmxDocument {
        header: HEADER.iter().map(|line| line.to_string()).collect(),
        vertices,
        normals,
        textures: textures.stems(),
        primitives,
    })
}

/// Take a snapshot of `source` and assemble it.
pub fn export_source(
    source: &mut dyn MeshSource,
    lookup: &dyn TextureLookup,
    options: &ExportOptions,
) -> Result<(SmxDocument, ExportSummary)> {
    let modifiers_applied = if options.apply_modifiers {
        source
            .apply_modifiers()
            .with_context(|| format!("Failed to apply modifiers to '{}'", source.name()))?
    } else {
        0
    };

    let mut mesh = source.to_mesh()?;
    let ngons_split = if options.triangulate_ngons {
        mesh.triangulate_ngons()
    } else {
        0
    };

    let document = assemble(&mesh, lookup, options.write_normals)
        .with_context(|| format!("Failed to export '{}'", source.name()))?;

    let summary = ExportSummary {
        modifiers_applied,
        ngons_split,
        ..ExportSummary::of(&document)
    };
    Ok((document, summary))
}

/// Convert a mesh file (OBJ/glTF/GLB) to an SMX file
pub fn export_file(input: &Path, output: &Path, options: &ExportOptions) -> Result<ExportSummary> {
    let mut source = open_source(input)?;
    let (document, summary) = export_source(source.as_mut(), &ShaderGraphLookup, options)?;
    write_smx_file(output, &document)?;

    tracing::info!(
        "Exported SMX model: {} vertices, {} normals, {} textures, {} primitives",
        summary.vertices,
        summary.normals.unwrap_or(0),
        summary.textures,
        summary.primitives
    );

    Ok(summary)
}
