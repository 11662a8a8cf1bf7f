//! Rendering of reference strings and derived reverse references

use serde_json::Value;

use crate::core::{Entity, EntityStore, Reference};
use crate::render::html::{escape_html, link};
use crate::render::RenderContext;
use crate::schema::ReferenceTarget;
use crate::tables;

/// Render a field value that may be a reference
///
/// Plain values come back escaped. A reference that resolves becomes a link
/// labelled with the target's title; one that does not is shown verbatim
/// behind a `?` marker.
pub fn render_reference(ctx: &RenderContext<'_>, value: &str) -> String {
    if Reference::parse(value).is_none() {
        return escape_html(value);
    }
    match ctx.store().resolve_reference(value) {
        Some((table, entity)) => render_entity_link(ctx, table, entity),
        None => {
            tracing::debug!("unresolved reference {}", value);
            unresolved(value)
        }
    }
}

/// Link to an entity's page
pub fn render_entity_link(ctx: &RenderContext<'_>, table: &str, entity: &Entity) -> String {
    link(
        &ctx.entity_url(table, entity),
        &tables::make_title(table, entity),
        Some("reference"),
    )
}

/// The visible marker for a reference that points nowhere
pub fn unresolved(value: &str) -> String {
    format!(
        "<span class=\"unresolved-reference\" title=\"Unresolved reference\">?{}</span>",
        escape_html(value.trim())
    )
}

/// Entities of `target.table` whose `target.column` points at `entity`
///
/// Field values are matched with the same grammar as forward references: a
/// `#...` reference, or a plain key looked up in `table`. Both single strings
/// and arrays of strings are considered. Every call scans the whole target
/// table.
pub fn reverse_references<'s>(
    store: &'s EntityStore,
    target: &ReferenceTarget,
    table: &str,
    entity: &Entity,
) -> Vec<&'s Entity> {
    store
        .entries(&target.table)
        .iter()
        .filter(|candidate| {
            values(candidate.get(&target.column)).into_iter().any(|v| {
                matches!(
                    store.resolve_in(table, v),
                    Some((t, found)) if t == table && found.same_identity(entity)
                )
            })
        })
        .collect()
}

fn values(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}
