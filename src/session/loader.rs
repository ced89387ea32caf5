//! Session files on disk (flat directory of `*.json`).

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A serialized session plus the name it is reported under.
#[derive(Debug, Clone)]
pub struct SessionSource {
    pub name: String,
    pub json: String,
}

impl SessionSource {
    pub fn new(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json: json.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self, ExtractError> {
        let json = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), json))
    }
}

/// `*.json` files directly inside `dir`, sorted by path. Subdirectories are not descended.
pub fn session_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    if !dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("session directory not found: {}", dir.display()),
        ));
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}
