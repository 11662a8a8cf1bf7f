//! Server-side normalization of submitted entries

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::project::is_path_segment;
use crate::core::Entity;
use crate::schema::model::{ColumnKind, Schema};

#[derive(Debug, Error, PartialEq)]
pub enum SubmissionError {
    #[error("entry must be a JSON object")]
    NotAnObject,

    #[error("entry has no id")]
    MissingId,

    #[error("id must be an integer, got {0}")]
    InvalidId(String),

    #[error("field '{0}' is required")]
    MissingField(String),

    #[error("field '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Validate a submitted entry against its table schema and coerce form
/// values to their stored JSON types
///
/// Columns the schema does not mention are kept as submitted. Derived
/// `reference` columns are dropped.
pub fn coerce_submission(schema: &Schema, raw: Value) -> Result<Entity, SubmissionError> {
    let Value::Object(mut fields) = raw else {
        return Err(SubmissionError::NotAnObject);
    };

    let id = coerce_id(fields.get("id"))?;
    fields.insert("id".to_string(), Value::from(id));

    for column in &schema.columns {
        // Unknown column types were reported when rendering; store as-is
        let Ok(kind) = column.kind() else {
            continue;
        };
        if matches!(kind, ColumnKind::Reference(_)) {
            fields.remove(&column.name);
            continue;
        }

        if let Some(value) = fields.remove(&column.name) {
            let coerced = coerce_value(&column.name, kind, value)?;
            fields.insert(column.name.clone(), coerced);
        }

        if column.required && is_blank(fields.get(&column.name)) {
            return Err(SubmissionError::MissingField(column.name.clone()));
        }
    }

    if let Some(Value::String(s)) = fields.get("short_name") {
        let trimmed = s.trim().to_string();
        if !trimmed.is_empty() && !is_path_segment(&trimmed) {
            return Err(SubmissionError::InvalidValue {
                field: "short_name".to_string(),
                message: "must contain only letters, digits, '_' or '-'".to_string(),
            });
        }
        fields.insert("short_name".to_string(), Value::String(trimmed));
    }

    Ok(Entity::new(order_fields(fields)))
}

fn coerce_id(value: Option<&Value>) -> Result<i64, SubmissionError> {
    match value {
        None | Some(Value::Null) => Err(SubmissionError::MissingId),
        Some(Value::String(s)) if s.trim().is_empty() => Err(SubmissionError::MissingId),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| SubmissionError::InvalidId(n.to_string())),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| SubmissionError::InvalidId(s.clone())),
        Some(other) => Err(SubmissionError::InvalidId(other.to_string())),
    }
}

fn coerce_value(field: &str, kind: ColumnKind<'_>, value: Value) -> Result<Value, SubmissionError> {
    let invalid = |message: &str| SubmissionError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    };

    match kind {
        ColumnKind::Integer => match value {
            Value::Null => Ok(Value::Null),
            Value::Number(n) if n.is_i64() => Ok(Value::Number(n)),
            Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid("expected an integer")),
            _ => Err(invalid("expected an integer")),
        },
        ColumnKind::Boolean => match value {
            Value::Null | Value::Bool(_) => Ok(value),
            Value::String(s) => match s.as_str() {
                "" => Ok(Value::Null),
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(invalid("expected true, false or empty")),
            },
            _ => Err(invalid("expected true, false or empty")),
        },
        ColumnKind::Array => match value {
            Value::Null => Ok(Value::Array(Vec::new())),
            Value::Array(_) => Ok(value),
            Value::String(s) if s.trim().is_empty() => Ok(Value::Array(Vec::new())),
            Value::String(s) => match serde_json::from_str::<Value>(&s) {
                Ok(parsed @ Value::Array(_)) => Ok(parsed),
                _ => Err(invalid("expected a JSON array")),
            },
            _ => Err(invalid("expected a list")),
        },
        ColumnKind::Enum(_) => match value {
            Value::String(s) if s.is_empty() => Ok(Value::Null),
            other => Ok(other),
        },
        _ => Ok(value),
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

/// `id` and `short_name` first, the rest as submitted
fn order_fields(mut fields: Map<String, Value>) -> Map<String, Value> {
    let mut ordered = Map::new();
    for key in ["id", "short_name"] {
        if let Some(value) = fields.remove(key) {
            ordered.insert(key.to_string(), value);
        }
    }
    ordered.extend(fields);
    ordered
}
