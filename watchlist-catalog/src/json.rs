//! JSON document I/O for raw source documents and pipeline outputs.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("I/O error writing {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("JSON encode error for {path}: {source}")]
    Encode {
        path: String,
        source: serde_json::Error,
    },
    #[error("Directory not found: {0}")]
    DirNotFound(String),
}

/// Load and deserialize a single JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, JsonError> {
    let contents = std::fs::read_to_string(path).map_err(|e| JsonError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| JsonError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Serialize `value` as pretty-printed JSON and write it atomically.
///
/// Parent directories are created as needed. The document is written to a
/// sibling temp file first and renamed into place.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), JsonError> {
    let write_err = |e| JsonError::Write {
        path: path.display().to_string(),
        source: e,
    };

    let mut serialized = serde_json::to_string_pretty(value).map_err(|e| JsonError::Encode {
        path: path.display().to_string(),
        source: e,
    })?;
    serialized.push('\n');

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serialized).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

/// List the immediate subdirectories of `dir`, sorted by name.
///
/// A missing directory yields an empty list; a path that exists but is not a
/// directory is an error. Names starting with `_` or `.` are skipped.
pub fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>, JsonError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(JsonError::DirNotFound(dir.display().to_string()));
    }

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| JsonError::Io {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('_') && !n.starts_with('.'))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}
