//! Table schema documents (`data/<table>/schema.json`)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-table schema: title, description and ordered column definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub table_name: String,
    pub title: String,
    pub description: String,
    pub columns: Vec<Column>,
}

/// The schema used for tables without a schema document
pub static EMPTY_SCHEMA: Schema = Schema {
    table_name: String::new(),
    title: String::new(),
    description: String::new(),
    columns: Vec::new(),
};

impl Schema {
    /// True when no schema document was found (or it defines no columns)
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Title, falling back to the title-cased table name
    pub fn title_or(&self, table: &str) -> String {
        if self.title.is_empty() {
            title_case(table)
        } else {
            self.title.clone()
        }
    }

    /// Description, falling back to `"<Title> data"`
    pub fn description_or(&self, table: &str) -> String {
        if self.description.is_empty() {
            format!("{} data", title_case(table))
        } else {
            self.description.clone()
        }
    }
}

/// One column definition as written in the schema document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub name: String,
    pub display_name: Option<String>,
    /// Raw type tag; see [`Column::kind`]
    #[serde(rename = "type")]
    pub type_tag: String,
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<EnumOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceTarget>,
}

/// An allowed value of an enum column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub value: String,
    pub display_name: Option<String>,
}

impl EnumOption {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.value)
    }
}

/// Target of a derived `reference` column: entities of `table` whose
/// `column` points back at the entity being rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTarget {
    pub table: String,
    pub column: String,
}

/// The closed set of column kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind<'a> {
    String,
    Text,
    Integer,
    Boolean,
    Enum(&'a [EnumOption]),
    Array,
    Latex,
    Reference(&'a ReferenceTarget),
}

impl Column {
    /// Label shown next to the value
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| title_case(&self.name))
    }

    /// Interpret the type tag
    pub fn kind(&self) -> Result<ColumnKind<'_>, SchemaError> {
        match self.type_tag.as_str() {
            "string" | "" => Ok(ColumnKind::String),
            "text" => Ok(ColumnKind::Text),
            "integer" => Ok(ColumnKind::Integer),
            "boolean" => Ok(ColumnKind::Boolean),
            "enum" => Ok(ColumnKind::Enum(&self.enum_options)),
            "array" => Ok(ColumnKind::Array),
            "latex" => Ok(ColumnKind::Latex),
            "reference" => self
                .reference
                .as_ref()
                .map(ColumnKind::Reference)
                .ok_or_else(|| SchemaError::MissingReferenceTarget(self.name.clone())),
            other => Err(SchemaError::UnknownType {
                column: self.name.clone(),
                type_tag: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("column '{column}' has unknown type '{type_tag}'")]
    UnknownType { column: String, type_tag: String },

    #[error("reference column '{0}' has no target table/column")]
    MissingReferenceTarget(String),
}

/// `"famous_mathematicians"` -> `"Famous Mathematicians"`
pub fn title_case(s: &str) -> String {
    s.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
