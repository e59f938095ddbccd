//! smx-export - SMX model exporter
//!
//! Converts meshes (OBJ, glTF, GLB) to .smx model files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use smx_export::formats::ensure_smx_extension;
use smx_export::{export, manifest, mesh, read_block_counts, ExportOptions, TextureLookup};

#[derive(Parser)]
#[command(name = "smx-export")]
#[command(about = "SMX model exporter")]
#[command(version)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a single mesh file
    Model {
        /// Input mesh file (OBJ/glTF/GLB)
        input: PathBuf,

        /// Output .smx file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export the mesh without applying modifiers
        #[arg(long)]
        no_modifiers: bool,

        /// Skip the normals block
        #[arg(long)]
        no_normals: bool,

        /// Split polygons with more than 4 vertices into triangles
        #[arg(long)]
        triangulate: bool,
    },

    /// Export every model listed in a manifest file
    Build {
        /// Path to smx.toml manifest
        #[arg(default_value = "smx.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify the block counts of an .smx file
    Check {
        /// Path to .smx file
        file: PathBuf,
    },

    /// Print what a mesh file would export
    Info {
        /// Input mesh file (OBJ/glTF/GLB)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match cli.command {
        Commands::Model {
            input,
            output,
            no_modifiers,
            no_normals,
            triangulate,
        } => {
            let output = ensure_smx_extension(&output.unwrap_or_else(|| input.with_extension("")));
            let options = ExportOptions {
                apply_modifiers: !no_modifiers,
                write_normals: !no_normals,
                triangulate_ngons: triangulate,
            };
            tracing::info!("Converting {:?} -> {:?}", input, output);
            export::export_file(&input, &output, &options)?;
            tracing::info!("Done!");
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building models from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let summaries = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} models exported", summaries.len());
        }

        Commands::Check { file } => check_file(&file)?,

        Commands::Info { input } => print_info(&input)?,
    }

    Ok(())
}

/// Re-read an .smx file and report its block counts
fn check_file(path: &Path) -> Result<()> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let counts = read_block_counts(&text).with_context(|| format!("Invalid SMX file: {:?}", path))?;

    println!("{:?}: OK", path);
    println!("  vertices:   {}", counts.vertices);
    match counts.normals {
        Some(normals) => println!("  normals:    {}", normals),
        None => println!("  normals:    (none)"),
    }
    println!("  textures:   {}", counts.textures);
    println!("  primitives: {}", counts.primitives);
    Ok(())
}

/// Describe a mesh source without writing anything
fn print_info(input: &Path) -> Result<()> {
    let source = mesh::open_source(input)?;
    let mesh = source.to_mesh()?;
    let lookup = smx_export::ShaderGraphLookup;

    let triangles = mesh.polygons.iter().filter(|p| p.len() == 3).count();
    let quads = mesh.polygons.iter().filter(|p| p.len() == 4).count();
    let ngons = mesh.polygon_count() - triangles - quads;

    println!("{}:", source.name());
    println!("  vertices: {}", mesh.vertex_count());
    println!(
        "  polygons: {} ({} triangles, {} quads, {} n-gons)",
        mesh.polygon_count(),
        triangles,
        quads,
        ngons
    );
    println!("  flat polygons: {}", mesh.polygons.iter().filter(|p| !p.smooth).count());
    println!("  vertex colors: {}", if mesh.colors.is_some() { "yes" } else { "no" });
    println!("  uvs: {}", if mesh.uvs.is_some() { "yes" } else { "no" });

    println!("  materials:");
    for (slot, material) in mesh.materials.iter().enumerate() {
        match material {
            Some(material) => match lookup.texture_of(material) {
                Some(texture) => println!("    [{}] {} -> {}", slot, material.name, texture.name()),
                None => println!("    [{}] {} (untextured)", slot, material.name),
            },
            None => println!("    [{}] (empty)", slot),
        }
    }

    if ngons > 0 {
        println!("  note: n-gons need --triangulate to export");
    }
    Ok(())
}
