//! Entity loading utilities
//!
//! Reads one entity per JSON file. A file that cannot be read or parsed is
//! skipped with a warning so one bad record never blocks the rest of a table.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::entity::Entity;
use crate::core::project::Project;

/// Load all entities of a table
///
/// A missing table directory yields an empty list.
pub fn load_table(project: &Project, table: &str) -> Vec<Entity> {
    let dir = project.table_dir(table);
    if !dir.is_dir() {
        tracing::debug!("table directory {} does not exist", dir.display());
        return Vec::new();
    }

    project
        .iter_entity_files(table)
        .filter_map(|path| load_entity_file(&path))
        .collect()
}

/// Load a single entity file, warning and returning `None` on failure
pub fn load_entity_file(path: &Path) -> Option<Entity> {
    match load_json_file::<serde_json::Value>(path) {
        Ok(serde_json::Value::Object(map)) => Some(Entity::new(map)),
        Ok(_) => {
            tracing::warn!("skipping {}: not a JSON object", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("skipping {}: {}", path.display(), e);
            None
        }
    }
}

/// Read and deserialize a JSON file
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write a value as pretty-printed JSON (trailing newline included)
pub fn write_json_file<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), LoadError> {
    let io_err = |e: std::io::Error| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut content = serde_json::to_string_pretty(value).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    content.push('\n');
    fs::write(path, content).map_err(io_err)
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("invalid JSON in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}
