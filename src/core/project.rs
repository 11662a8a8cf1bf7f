//! Data directory discovery and on-disk layout

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::entity::Entity;

/// Name of the per-table schema document
pub const SCHEMA_FILE: &str = "schema.json";

/// Name of the site-wide configuration document
pub const MAIN_FILE: &str = "main.json";

/// Represents a mathdb data directory (`data/` with one subdirectory per table)
#[derive(Debug, Clone)]
pub struct Project {
    /// Root of the data directory
    root: PathBuf,
}

impl Project {
    /// Open an existing data directory
    pub fn open(path: &Path) -> Result<Self, ProjectError> {
        if !path.is_dir() {
            return Err(ProjectError::NotFound(path.to_path_buf()));
        }

        let root = path
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    /// Get the data directory root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `main.json`
    pub fn main_json_path(&self) -> PathBuf {
        self.root.join(MAIN_FILE)
    }

    /// Default output directory for static builds (`<data_dir>/../docs`)
    pub fn default_output_dir(&self) -> PathBuf {
        self.root
            .parent()
            .map(|p| p.join("docs"))
            .unwrap_or_else(|| self.root.join("docs"))
    }

    /// List table names (subdirectories of the data dir), sorted
    pub fn tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect();
        tables.sort();
        tables
    }

    /// Whether a table directory exists
    pub fn has_table(&self, table: &str) -> bool {
        is_valid_table_name(table) && self.table_dir(table).is_dir()
    }

    /// Directory holding a table's entity files
    pub fn table_dir(&self, table: &str) -> PathBuf {
        self.root.join(table)
    }

    /// Path of a table's schema document
    pub fn schema_path(&self, table: &str) -> PathBuf {
        self.table_dir(table).join(SCHEMA_FILE)
    }

    /// Path an entity is stored at
    pub fn entity_path(&self, table: &str, entity: &Entity) -> Option<PathBuf> {
        entity_filename(entity).map(|name| self.table_dir(table).join(name))
    }

    /// Iterate all entity files of a table (every `*.json` except the schema)
    pub fn iter_entity_files(&self, table: &str) -> impl Iterator<Item = PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(self.table_dir(table))
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| p.extension().map_or(false, |ext| ext == "json"))
            .filter(|p| p.file_name().map_or(false, |n| n != SCHEMA_FILE))
            .collect();
        files.sort();
        files.into_iter()
    }
}

/// File name for an entity: `<id:03>_<short_name>.json` or `<id:03>.json`
///
/// Returns `None` when the entity has no numeric id or its short_name is
/// not a plain file name segment.
pub fn entity_filename(entity: &Entity) -> Option<String> {
    let id = entity.id()?;
    match entity.short_name() {
        Some(short_name) if is_path_segment(short_name) => Some(format!("{:03}_{}.json", id, short_name)),
        Some(_) => None,
        None => Some(format!("{:03}.json", id)),
    }
}

/// Table names come from URLs in server mode; only allow plain directory names
pub fn is_valid_table_name(table: &str) -> bool {
    is_path_segment(table)
}

/// Letters, digits, `_` and `-` only, so the value can be used as one path
/// component (table directories, entity file names, page names)
pub fn is_path_segment(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Errors that can occur while opening a data directory
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("data directory {0:?} not found")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
