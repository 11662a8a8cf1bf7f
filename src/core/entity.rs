//! Entity - one JSON record of a table

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record: an ordered map of field name to JSON value
///
/// Entities carry a numeric `id` and usually a `short_name`, which is the
/// human-readable key used in URLs and references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: Map<String, Value>,
}

impl Entity {
    /// Create an entity from a JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Numeric id, if present (integer or integer-valued string)
    pub fn id(&self) -> Option<i64> {
        match self.fields.get("id")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Short name, if present and non-empty
    pub fn short_name(&self) -> Option<&str> {
        self.fields
            .get("short_name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Key used for URLs: short_name, falling back to the id
    pub fn key(&self) -> Option<String> {
        self.short_name()
            .map(str::to_string)
            .or_else(|| self.id().map(|id| id.to_string()))
    }

    /// Human display name: `name`, then `short_name`, then the id
    pub fn display_name(&self) -> String {
        self.get_str("name")
            .filter(|s| !s.is_empty())
            .or_else(|| self.short_name())
            .map(str::to_string)
            .or_else(|| self.id().map(|id| id.to_string()))
            .unwrap_or_else(|| "(unnamed)".to_string())
    }

    /// True if `key` equals this entity's id or short_name
    pub fn matches_key(&self, key: &str) -> bool {
        if self.short_name() == Some(key) {
            return true;
        }
        match (self.id(), key.trim().parse::<i64>()) {
            (Some(id), Ok(k)) => id == k,
            _ => false,
        }
    }

    /// True if both entities share an id or a short_name
    pub fn same_identity(&self, other: &Entity) -> bool {
        let same_id = matches!((self.id(), other.id()), (Some(a), Some(b)) if a == b);
        let same_name = matches!(
            (self.short_name(), other.short_name()),
            (Some(a), Some(b)) if a == b
        );
        same_id || same_name
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Iterate fields in stored order
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl From<Map<String, Value>> for Entity {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
