//! Validation of schema documents against the embedded table meta-schema

use jsonschema::{validator_for, Validator as JsonValidator};
use serde_json::Value as JsonValue;

use crate::schema::model::Schema;

const TABLE_META_SCHEMA: &str = include_str!("../../schemas/table.schema.json");

/// A validation issue found in a schema document
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// JSON pointer into the document (empty for the root)
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validator for `schema.json` documents
pub struct SchemaValidator {
    compiled: JsonValidator,
}

impl SchemaValidator {
    pub fn new() -> Result<Self, String> {
        let meta: JsonValue =
            serde_json::from_str(TABLE_META_SCHEMA).map_err(|e| e.to_string())?;
        let compiled = validator_for(&meta).map_err(|e| e.to_string())?;
        Ok(Self { compiled })
    }

    /// Check a parsed schema document
    ///
    /// Structural problems come from the meta-schema; semantic ones (unknown
    /// column types, reference columns without a target, duplicate column
    /// names) from the typed model.
    pub fn validate(&self, document: &JsonValue) -> Vec<ValidationIssue> {
        let mut issues: Vec<ValidationIssue> = self
            .compiled
            .iter_errors(document)
            .map(|e| ValidationIssue {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if let Ok(schema) = serde_json::from_value::<Schema>(document.clone()) {
            let mut seen = std::collections::HashSet::new();
            for (i, column) in schema.columns.iter().enumerate() {
                if let Err(e) = column.kind() {
                    issues.push(ValidationIssue {
                        path: format!("/columns/{}", i),
                        message: e.to_string(),
                    });
                }
                if !seen.insert(column.name.as_str()) {
                    issues.push(ValidationIssue {
                        path: format!("/columns/{}", i),
                        message: format!("duplicate column '{}'", column.name),
                    });
                }
            }
        }

        issues.dedup();
        issues
    }
}
