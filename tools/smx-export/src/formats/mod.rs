//! SMX output
//!
//! Re-exports the format types from smx-common and adds file writing.

pub use smx_common::formats::*;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write a rendered SMX document to any writer
pub fn write_smx<W: Write>(w: &mut W, document: &SmxDocument) -> Result<()> {
    w.write_all(document.render().as_bytes())?;
    Ok(())
}

/// Write an SMX file atomically.
///
/// The document is rendered in memory, written to a temporary file next to
/// `path` and renamed into place, so a failure never leaves a truncated file.
pub fn write_smx_file(path: &Path, document: &SmxDocument) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {:?}", dir))?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
    write_smx(&mut file, document)?;
    file.flush()?;
    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to create output: {:?}", path))?;
    Ok(())
}

/// Append `.smx` unless the path already ends with it
pub fn ensure_smx_extension(path: &Path) -> PathBuf {
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SMX_EXT));
    if has_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(SMX_EXT);
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_extension() {
        assert_eq!(ensure_smx_extension(Path::new("out/ship.smx")), PathBuf::from("out/ship.smx"));
        assert_eq!(ensure_smx_extension(Path::new("ship.SMX")), PathBuf::from("ship.SMX"));
        assert_eq!(ensure_smx_extension(Path::new("ship")), PathBuf::from("ship.smx"));
        assert_eq!(ensure_smx_extension(Path::new("ship.v2")), PathBuf::from("ship.v2.smx"));
    }

    #[test]
    fn test_write_file_replaces_existing() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("model.smx");

        write_smx_file(&path, &SmxDocument::default()).expect("first write");
        let document = SmxDocument {
            textures: vec!["brick".to_string()],
            ..Default::default()
        };
        write_smx_file(&path, &document).expect("second write");

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, document.render());

        // Only the final file remains, no temporaries
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
