//! Input discovery
//!
//! Lists the images directly under the input directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::tiff::errors::{TiffError, TiffResult};

/// File extensions (lowercase, without the dot) treated as images
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Whether the path has a recognized image extension, ignoring case
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// Regular files under `dir` with a supported extension, sorted by name
///
/// Subdirectories are not descended into. An existing directory without
/// images gives an empty list.
pub fn scan_directory(dir: &Path) -> TiffResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TiffError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        // Follows symlinks; directories are never descended into
        if !path.is_file() {
            continue;
        }

        if has_supported_extension(&path) {
            files.push(path);
        } else {
            debug!("Skipping {}", path.display());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    info!("Found {} image files in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extension_matching() {
        assert!(has_supported_extension(Path::new("a.jpg")));
        assert!(has_supported_extension(Path::new("b.JPEG")));
        assert!(has_supported_extension(Path::new("dir/c.Png")));
        assert!(!has_supported_extension(Path::new("d.gif")));
        assert!(!has_supported_extension(Path::new("png")));
        assert!(!has_supported_extension(Path::new("e.png.txt")));
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["c.png", "a.JPG", "b.jpeg", "notes.txt", "d.gif"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        fs::write(dir.path().join("nested.png").join("inner.png"), b"x").unwrap();

        let files = scan_directory(dir.path()).unwrap();
        let names: Vec<_> = files.iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.JPG", "b.jpeg", "c.png"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(scan_directory(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("testImages");

        assert!(matches!(scan_directory(&missing), Err(TiffError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.png");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(scan_directory(&file), Err(TiffError::DirectoryNotFound(_))));
    }
}
