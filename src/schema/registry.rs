//! Schema registry - loads and caches per-table schema documents

use std::collections::HashMap;

use crate::core::loader::load_json_file;
use crate::core::project::Project;
use crate::schema::model::{ColumnKind, Schema, EMPTY_SCHEMA};

/// Cache of table schemas, read once per table
#[derive(Debug)]
pub struct SchemaRegistry {
    project: Project,
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            schemas: HashMap::new(),
        }
    }

    /// Get a table's schema, loading it on first access
    ///
    /// A missing or malformed schema document yields an empty schema.
    pub fn get_schema(&mut self, table: &str) -> &Schema {
        if !self.schemas.contains_key(table) {
            let schema = self.read(table);
            self.schemas.insert(table.to_string(), schema);
        }
        self.schema(table)
    }

    /// Load the schema of every table in the data directory
    pub fn preload(&mut self) {
        for table in self.project.tables() {
            self.get_schema(&table);
        }
    }

    /// Cached schema of a table, or the empty schema if not loaded
    pub fn schema(&self, table: &str) -> &Schema {
        self.schemas.get(table).unwrap_or(&EMPTY_SCHEMA)
    }

    /// Whether the table has a non-empty schema document
    pub fn has_schema(&self, table: &str) -> bool {
        !self.schema(table).is_empty()
    }

    /// `(value, display_name)` pairs of an enum column
    ///
    /// Empty when the table or column does not exist or is not an enum.
    pub fn get_enum_options(&self, table: &str, column: &str) -> Vec<(String, String)> {
        match self.schema(table).column(column).map(|c| c.kind()) {
            Some(Ok(ColumnKind::Enum(options))) => options
                .iter()
                .map(|o| (o.value.clone(), o.label().to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn read(&self, table: &str) -> Schema {
        let path = self.project.schema_path(table);
        if !path.exists() {
            tracing::warn!("table {} has no schema document", table);
            return Schema::default();
        }
        match load_json_file::<Schema>(&path) {
            Ok(mut schema) => {
                if schema.table_name.is_empty() {
                    schema.table_name = table.to_string();
                }
                schema
            }
            Err(e) => {
                tracing::warn!("ignoring schema of table {}: {}", table, e);
                Schema::default()
            }
        }
    }
}
