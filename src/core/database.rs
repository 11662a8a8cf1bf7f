//! The loaded dataset: data directory, site settings, entities and schemas

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::loader::{load_json_file, write_json_file};
use crate::core::project::{entity_filename, Project, ProjectError};
use crate::core::site::SiteConfig;
use crate::core::store::EntityStore;
use crate::schema::SchemaRegistry;

/// Errors writing or deleting entry files
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("entry needs an integer id and a short_name of letters, digits, '_' or '-'")]
    NoFileName,

    #[error("short_name '{short_name}' already belongs to entry {owner}")]
    ShortNameTaken { short_name: String, owner: i64 },

    #[error("IO error: {0}")]
    Io(String),
}

/// Summary of one table for index pages and listings
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TableInfo {
    pub name: String,
    pub title: String,
    pub description: String,
    pub count: usize,
    pub has_schema: bool,
}

/// Everything read from a data directory
///
/// Constructed once per process and handed to the renderers and server
/// routes. Tables and schemas are loaded eagerly on open.
#[derive(Debug)]
pub struct Database {
    project: Project,
    site: SiteConfig,
    store: EntityStore,
    schemas: SchemaRegistry,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, ProjectError> {
        let project = Project::open(path)?;
        let site = SiteConfig::load(&project);

        let mut store = EntityStore::new(project.clone());
        store.preload();
        let mut schemas = SchemaRegistry::new(project.clone());
        schemas.preload();

        Ok(Self {
            project,
            site,
            store,
            schemas,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Table names of the data directory
    pub fn tables(&self) -> Vec<String> {
        self.project.tables()
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.project.has_table(table)
    }

    pub fn table_info(&self, table: &str) -> TableInfo {
        let schema = self.schemas.schema(table);
        TableInfo {
            name: table.to_string(),
            title: schema.title_or(table),
            description: schema.description_or(table),
            count: self.store.entries(table).len(),
            has_schema: !schema.is_empty(),
        }
    }

    pub fn table_infos(&self) -> Vec<TableInfo> {
        self.tables().iter().map(|t| self.table_info(t)).collect()
    }

    /// Write an entity to its file and upsert it into the store
    ///
    /// Older files of the same id under another name (a renamed short_name)
    /// are removed. A short_name already used by a different id is refused
    /// before anything is written. Returns the file name.
    pub fn save_entry(&mut self, table: &str, entity: Entity) -> Result<String, EntryError> {
        let filename = entity_filename(&entity).ok_or(EntryError::NoFileName)?;
        let id = entity.id().ok_or(EntryError::NoFileName)?;

        if let Some(short_name) = entity.short_name() {
            let owner = self
                .store
                .entries(table)
                .iter()
                .filter(|e| e.short_name() == Some(short_name))
                .find_map(|e| e.id().filter(|owner| *owner != id));
            if let Some(owner) = owner {
                return Err(EntryError::ShortNameTaken {
                    short_name: short_name.to_string(),
                    owner,
                });
            }
        }

        let path = self.project.table_dir(table).join(&filename);
        let stale: Vec<PathBuf> = self
            .files_where(table, |e| e.id() == Some(id))
            .into_iter()
            .filter(|p| *p != path)
            .collect();

        write_json_file(&path, &entity).map_err(|e| EntryError::Io(e.to_string()))?;
        for old in stale {
            tracing::info!("removing stale entry file {}", old.display());
            std::fs::remove_file(&old).map_err(|e| EntryError::Io(e.to_string()))?;
        }

        self.store.update(table, entity);
        Ok(filename)
    }

    /// Delete every entry whose id or short_name is `key`, files included
    ///
    /// Returns the names of the removed files; empty when nothing on disk
    /// matched.
    pub fn delete_entry(&mut self, table: &str, key: &str) -> Result<Vec<String>, EntryError> {
        let mut deleted = Vec::new();
        for path in self.files_where(table, |e| e.matches_key(key)) {
            tracing::info!("deleting entry file {}", path.display());
            std::fs::remove_file(&path).map_err(|e| EntryError::Io(e.to_string()))?;
            if let Some(name) = path.file_name() {
                deleted.push(name.to_string_lossy().into_owned());
            }
        }
        self.store.remove(table, key);
        Ok(deleted)
    }

    /// Entity files of a table whose contents satisfy `pred`
    fn files_where(&self, table: &str, pred: impl Fn(&Entity) -> bool) -> Vec<PathBuf> {
        self.project
            .iter_entity_files(table)
            .filter(|path| {
                load_json_file::<Entity>(path)
                    .map(|e| pred(&e))
                    .unwrap_or(false)
            })
            .collect()
    }
}
