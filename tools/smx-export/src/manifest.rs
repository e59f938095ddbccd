//! Manifest parsing and batch builds
//!
//! Parses smx.toml and exports every listed model.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::export::{export_file, ExportOptions, ExportSummary};
use crate::formats::ensure_smx_extension;
use crate::mesh::source_name;

/// Root manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmxManifest {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Options applied to every model unless overridden
    #[serde(default)]
    pub defaults: ExportOptions,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("models/")
}

/// One `[[models]]` entry
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelEntry {
    pub input: PathBuf,
    /// Output file relative to the output directory (defaults to the input stem)
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub apply_modifiers: Option<bool>,
    #[serde(default)]
    pub write_normals: Option<bool>,
    #[serde(default)]
    pub triangulate_ngons: Option<bool>,
}

impl ModelEntry {
    /// Manifest defaults with this entry's overrides applied
    pub fn options(&self, defaults: &ExportOptions) -> ExportOptions {
        ExportOptions {
            apply_modifiers: self.apply_modifiers.unwrap_or(defaults.apply_modifiers),
            write_normals: self.write_normals.unwrap_or(defaults.write_normals),
            triangulate_ngons: self.triangulate_ngons.unwrap_or(defaults.triangulate_ngons),
        }
    }

    /// Where this model is written inside `output_dir`
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        let relative = match &self.output {
            Some(output) => output.clone(),
            None => PathBuf::from(source_name(&self.input)),
        };
        ensure_smx_extension(&output_dir.join(relative))
    }
}

/// Load and parse a manifest file.
///
/// Relative paths in the manifest are resolved against the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<SmxManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: SmxManifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;

    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        manifest.output_dir = base.join(&manifest.output_dir);
        for model in &mut manifest.models {
            model.input = base.join(&model.input);
        }
    }
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &SmxManifest) -> Result<()> {
    if manifest.models.is_empty() {
        bail!("Manifest lists no models");
    }
    for (index, model) in manifest.models.iter().enumerate() {
        if !model.input.exists() {
            bail!("Model {} source not found: {:?}", index, model.input);
        }
    }

    let mut outputs = hashbrown::HashSet::new();
    for model in &manifest.models {
        let output = model.output_path(&manifest.output_dir);
        if !outputs.insert(output.clone()) {
            bail!("Two models write the same output: {:?}", output);
        }
    }
    Ok(())
}

/// Build all models from a manifest
pub fn build_all(manifest: &SmxManifest, output_override: Option<&Path>) -> Result<Vec<ExportSummary>> {
    validate(manifest)?;
    let output_dir = output_override.unwrap_or(&manifest.output_dir);

    let mut summaries = Vec::with_capacity(manifest.models.len());
    for model in &manifest.models {
        let output = model.output_path(output_dir);
        tracing::info!("Converting model: {:?} -> {:?}", model.input, output);
        let summary = export_file(&model.input, &output, &model.options(&manifest.defaults))
            .with_context(|| format!("Failed to build {:?}", model.input))?;
        summaries.push(summary);
    }
    Ok(summaries)
}
