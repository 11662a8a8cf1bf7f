//! Per-table rendering and graph hooks
//!
//! Most tables render generically from their schema. Tables that need more
//! register a [`TableCapabilities`] record here, looked up by table name.

pub mod equations;
pub mod mathematicians;

use crate::core::{Entity, EntityStore};
use crate::graph::Graph;
use crate::render::RenderContext;
use crate::schema::Column;

/// Replaces the value cell of one column on a card; `None` falls back to the
/// schema-driven rendering
pub type CardOverride = fn(&RenderContext<'_>, &Column, &Entity) -> Option<String>;

/// Card heading and link label of an entity
pub type TitleFn = fn(&Entity) -> String;

/// Builds a relationship graph from the loaded tables
pub type GraphBuilder = fn(&EntityStore) -> Graph;

#[derive(Clone, Copy, Default)]
pub struct TableCapabilities {
    pub render_card_override: Option<CardOverride>,
    pub make_title: Option<TitleFn>,
    pub build_graph: Option<GraphBuilder>,
}

static REGISTRY: &[(&str, TableCapabilities)] = &[
    ("equations", equations::CAPABILITIES),
    ("mathematicians", mathematicians::CAPABILITIES),
];

/// Capabilities of a table; tables without an entry get none
pub fn capabilities(table: &str) -> TableCapabilities {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == table)
        .map(|(_, caps)| *caps)
        .unwrap_or_default()
}

/// Title of an entity: the table's title hook, else name, short_name or id
pub fn make_title(table: &str, entity: &Entity) -> String {
    match capabilities(table).make_title {
        Some(title) => title(entity),
        None => entity.display_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unregistered_table_has_no_hooks() {
        let caps = capabilities("theorems");
        assert!(caps.render_card_override.is_none());
        assert!(caps.make_title.is_none());
        assert!(caps.build_graph.is_none());
    }

    #[test]
    fn test_generic_title_fallbacks() {
        let named: Entity = serde_json::from_value(json!({"id": 1, "name": "Pythagoras"})).unwrap();
        let short: Entity = serde_json::from_value(json!({"id": 2, "short_name": "pyth"})).unwrap();
        let bare: Entity = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(make_title("theorems", &named), "Pythagoras");
        assert_eq!(make_title("theorems", &short), "pyth");
        assert_eq!(make_title("theorems", &bare), "3");
    }

    #[test]
    fn test_equations_register_a_graph() {
        assert!(capabilities("equations").build_graph.is_some());
        assert!(capabilities("mathematicians").build_graph.is_none());
    }
}
