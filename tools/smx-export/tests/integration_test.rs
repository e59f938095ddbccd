//! Integration tests for smx-export
//!
//! Tests the full pipeline: generate test assets -> run the binary -> verify output


use std::path::Path;
use std::process::Output;
use tempfile::tempdir;

use smx_export::read_block_counts;

/// Test OBJ + MTL -> SMX conversion
#[test]
fn test_cube_obj_to_smx() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    let smx_path = dir.path().join("cube.smx");

    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");
    let output = smx_export_model(&obj_path, &smx_path, &[]);
    assert!(output.status.success(), "smx-export model command failed");

    let text = std::fs::read_to_string(&smx_path).expect("Failed to read SMX file");
    let counts = read_block_counts(&text).expect("Output should be a valid SMX document");
    assert_eq!(counts.vertices, 8);
    // 8 smooth + 6 flat (flat normals are written for every face)
    assert_eq!(counts.normals, Some(14));
    assert_eq!(counts.textures, 1);
    assert_eq!(counts.primitives, 6);

    assert!(text.contains("<texture file=\"crate\"/>"));
    let textured = text.matches("texture=\"0\"").count();
    assert_eq!(textured, 2, "top and bottom faces are textured");
    assert_eq!(text.matches("shading=\"F\"").count(), 4);
    assert!(text.matches("type=\"GT4\"").count() + text.matches("type=\"FT4\"").count() == 2);
}

/// Test minimal triangle OBJ with the default output name
#[test]
fn test_triangle_default_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("triangle.obj");
    generate_test_assets::generate_triangle_obj(&obj_path).expect("Failed to generate OBJ");

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_smx-export"))
        .args(["model", obj_path.to_str().unwrap()])
        .status()
        .expect("Failed to run smx-export");
    assert!(status.success());

    let text = std::fs::read_to_string(dir.path().join("triangle.smx")).unwrap();
    let counts = read_block_counts(&text).unwrap();
    assert_eq!(counts.vertices, 3);
    assert_eq!(counts.textures, 0);
    assert!(!text.contains("<textures"));
    assert!(text.contains("type=\"F3\""));
}

/// Output path without extension gets `.smx`
#[test]
fn test_output_extension_appended() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("triangle.obj");
    generate_test_assets::generate_triangle_obj(&obj_path).expect("Failed to generate OBJ");

    let output = smx_export_model(&obj_path, &dir.path().join("renamed"), &["--no-normals"]);
    assert!(output.status.success());

    let text = std::fs::read_to_string(dir.path().join("renamed.smx")).unwrap();
    assert!(!text.contains("<normals"));
    assert_eq!(read_block_counts(&text).unwrap().normals, None);
}

/// N-gons fail without --triangulate and leave no output file
#[test]
fn test_ngon_requires_triangulate() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("pentagon.obj");
    let smx_path = dir.path().join("pentagon.smx");
    generate_test_assets::generate_pentagon_obj(&obj_path).expect("Failed to generate OBJ");

    let output = smx_export_model(&obj_path, &smx_path, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("5 vertices"), "{stderr}");
    assert!(!smx_path.exists(), "failed export must not write a file");

    let output = smx_export_model(&obj_path, &smx_path, &["--triangulate"]);
    assert!(output.status.success());
    let text = std::fs::read_to_string(&smx_path).unwrap();
    assert_eq!(read_block_counts(&text).unwrap().primitives, 3);
}

/// `check` accepts exporter output and rejects a tampered count
#[test]
fn test_check_command() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    let smx_path = dir.path().join("cube.smx");
    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");
    assert!(smx_export_model(&obj_path, &smx_path, &[]).status.success());

    assert!(smx_export_check(&smx_path).status.success());

    let text = std::fs::read_to_string(&smx_path).unwrap();
    let tampered = dir.path().join("tampered.smx");
    std::fs::write(
        &tampered,
        text.replace("<primitives count=\"6\">", "<primitives count=\"7\">"),
    )
    .unwrap();
    let output = smx_export_check(&tampered);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("count"));
}

/// Exporting the same input twice produces identical bytes
#[test]
fn test_reexport_is_byte_identical() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");

    let first = dir.path().join("first.smx");
    let second = dir.path().join("second.smx");
    assert!(smx_export_model(&obj_path, &first, &[]).status.success());
    assert!(smx_export_model(&obj_path, &second, &[]).status.success());

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

/// `build` exports every model in a manifest
#[test]
fn test_build_manifest() {
    let dir = tempdir().expect("Failed to create temp dir");
    generate_test_assets::generate_cube_obj(&dir.path().join("cube.obj")).unwrap();
    generate_test_assets::generate_pentagon_obj(&dir.path().join("pentagon.obj")).unwrap();

    let manifest = dir.path().join("smx.toml");
    std::fs::write(
        &manifest,
        r#"output_dir = "out"

[defaults]
write_normals = false

[[models]]
input = "cube.obj"

[[models]]
input = "pentagon.obj"
output = "flat/pentagon"
triangulate_ngons = true
"#,
    )
    .unwrap();

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_smx-export"))
        .args(["build", manifest.to_str().unwrap()])
        .status()
        .expect("Failed to run smx-export");
    assert!(status.success(), "smx-export build command failed");

    let cube = std::fs::read_to_string(dir.path().join("out/cube.smx")).unwrap();
    assert_eq!(read_block_counts(&cube).unwrap().normals, None);
    let pentagon = std::fs::read_to_string(dir.path().join("out/flat/pentagon.smx")).unwrap();
    assert_eq!(read_block_counts(&pentagon).unwrap().primitives, 3);
}

// Helper to run smx-export model command
fn smx_export_model(input: &Path, output: &Path, extra: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_smx-export"))
        .args(["model", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .args(extra)
        .output()
        .expect("Failed to run smx-export")
}

// Helper to run smx-export check command
fn smx_export_check(file: &Path) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_smx-export"))
        .args(["check", file.to_str().unwrap()])
        .output()
        .expect("Failed to run smx-export")
}
