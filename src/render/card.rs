//! Read-only cards: one entity rendered column by column from its schema

use serde_json::Value;

use crate::core::Entity;
use crate::render::html::{escape_html, link, list};
use crate::render::markdown::render_markdown;
use crate::render::reference::{render_entity_link, render_reference, reverse_references};
use crate::render::RenderContext;
use crate::schema::{title_case, Column, ColumnKind, EnumOption, Schema};
use crate::tables;

/// Render the card of one entity
///
/// Columns are rendered in schema order. A column whose type is unknown is
/// replaced by an error line; the rest of the card still renders. An empty
/// schema falls back to listing the entity's fields as stored.
pub fn render_card(ctx: &RenderContext<'_>, table: &str, schema: &Schema, entity: &Entity) -> String {
    let title = tables::make_title(table, entity);
    let anchor = entity.key().unwrap_or_default();

    let mut out = format!(
        "<div class=\"card {table}-card\" id=\"{table}-{anchor}\">\n<h3>{}</h3>\n<dl>\n",
        link(&ctx.entity_url(table, entity), &title, None),
        table = escape_html(table),
        anchor = escape_html(&anchor),
    );

    if schema.is_empty() {
        for (name, value) in entity.fields() {
            push_row(&mut out, &title_case(name), name, &render_generic(ctx, value));
        }
    } else {
        let caps = tables::capabilities(table);
        for column in &schema.columns {
            let custom = caps
                .render_card_override
                .and_then(|render| render(ctx, column, entity));
            let cell = match custom {
                Some(html) => Some(html),
                None => render_column(ctx, table, column, entity),
            };
            if let Some(cell) = cell {
                push_row(&mut out, &column.label(), &column.name, &cell);
            }
        }
    }
    out.push_str("</dl>\n");

    if ctx.is_server() {
        if let Some(key) = entity.key() {
            out.push_str(&format!(
                "<p class=\"card-actions\">{}</p>\n",
                link(
                    &ctx.url(&format!("{}/edit_{}.html", table, key)),
                    "Edit",
                    Some("edit-link")
                )
            ));
        }
    }
    out.push_str("</div>\n");
    out
}

fn push_row(out: &mut String, label: &str, name: &str, cell: &str) {
    out.push_str(&format!(
        "<dt>{}</dt><dd class=\"field-{}\">{}</dd>\n",
        escape_html(label),
        escape_html(name),
        cell
    ));
}

/// One column's cell; `None` when there is nothing to show
fn render_column(ctx: &RenderContext<'_>, table: &str, column: &Column, entity: &Entity) -> Option<String> {
    let kind = match column.kind() {
        Ok(kind) => kind,
        Err(e) => {
            tracing::warn!("table {}: {}", table, e);
            return Some(format!(
                "<span class=\"render-error\">{}</span>",
                escape_html(&e.to_string())
            ));
        }
    };

    let value = entity.get(&column.name).filter(|v| !v.is_null());
    match kind {
        ColumnKind::Boolean => Some(render_boolean(value)),
        ColumnKind::Reference(target) => {
            let found = reverse_references(ctx.store(), target, table, entity);
            if found.is_empty() {
                return None;
            }
            let items: Vec<String> = found
                .into_iter()
                .map(|e| render_entity_link(ctx, &target.table, e))
                .collect();
            Some(list(&items, "reference-list"))
        }
        ColumnKind::String => value.map(|v| render_scalar(ctx, v)),
        ColumnKind::Text => value.map(|v| match v {
            Value::String(s) => render_markdown(ctx, s),
            other => render_generic(ctx, other),
        }),
        ColumnKind::Integer => value.map(|v| escape_html(&scalar_text(v))),
        ColumnKind::Enum(options) => value.map(|v| escape_html(&enum_label(options, &scalar_text(v)))),
        ColumnKind::Array => value.map(|v| render_array(ctx, v)),
        ColumnKind::Latex => value.map(|v| {
            format!(
                "<div class=\"latex-equation\">\\[{}\\]</div>",
                escape_html(&scalar_text(v))
            )
        }),
    }
}

/// Yes / No / Unspecified; unset is never shown as No
pub fn render_boolean(value: Option<&Value>) -> String {
    let (class, label) = match value {
        Some(Value::Bool(true)) => ("bool-true", "Yes".to_string()),
        Some(Value::Bool(false)) => ("bool-false", "No".to_string()),
        None | Some(Value::Null) => ("bool-unset", "Unspecified".to_string()),
        Some(other) => ("bool-other", scalar_text(other)),
    };
    format!("<span class=\"{}\">{}</span>", class, escape_html(&label))
}

fn enum_label(options: &[EnumOption], value: &str) -> String {
    options
        .iter()
        .find(|o| o.value == value)
        .map(|o| o.label().to_string())
        .unwrap_or_else(|| value.to_string())
}

fn render_array(ctx: &RenderContext<'_>, value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(|item| render_scalar(ctx, item)).collect();
            list(&rendered, "array-list")
        }
        other => render_scalar(ctx, other),
    }
}

fn render_scalar(ctx: &RenderContext<'_>, value: &Value) -> String {
    match value {
        Value::String(s) => render_reference(ctx, s),
        other => escape_html(&scalar_text(other)),
    }
}

/// Fields of a table without a schema, rendered by JSON type
fn render_generic(ctx: &RenderContext<'_>, value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(_) => render_boolean(Some(value)),
        Value::Array(_) => render_array(ctx, value),
        Value::Object(_) => format!("<code>{}</code>", escape_html(&value.to_string())),
        other => render_scalar(ctx, other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Database;
    use crate::render::RenderMode;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    const EQUATION_SCHEMA: &str = r#"{
        "title": "Equations",
        "columns": [
            {"name": "name", "type": "string"},
            {"name": "equation", "type": "latex"},
            {"name": "author", "type": "string"},
            {"name": "category", "type": "enum", "enum": [
                {"value": "analysis", "display_name": "Analysis"}
            ]},
            {"name": "proven", "type": "boolean"},
            {"name": "applications", "type": "array"},
            {"name": "description", "type": "text"},
            {"name": "weird", "type": "matrix"}
        ]
    }"#;

    const MATHEMATICIAN_SCHEMA: &str = r#"{
        "columns": [
            {"name": "name", "type": "string"},
            {"name": "equations", "type": "reference",
             "reference": {"table": "equations", "column": "author"}}
        ]
    }"#;

    fn database() -> (tempfile::TempDir, Database) {
        let tmp = tempdir().unwrap();
        let m = tmp.path().join("mathematicians");
        let e = tmp.path().join("equations");
        fs::create_dir(&m).unwrap();
        fs::create_dir(&e).unwrap();
        fs::write(m.join("schema.json"), MATHEMATICIAN_SCHEMA).unwrap();
        fs::write(e.join("schema.json"), EQUATION_SCHEMA).unwrap();
        fs::write(
            m.join("001_euler.json"),
            json!({"id": 1, "short_name": "euler", "name": "Leonhard Euler"}).to_string(),
        )
        .unwrap();
        fs::write(
            e.join("010_eulers-identity.json"),
            json!({
                "id": 10, "short_name": "eulers-identity", "name": "Euler's Identity",
                "equation": "e^{i\\pi} + 1 = 0", "author": "euler", "category": "analysis",
                "proven": null, "applications": ["Complex analysis", "#nowhere"],
                "weird": 1
            })
            .to_string(),
        )
        .unwrap();
        let db = Database::open(tmp.path()).unwrap();
        (tmp, db)
    }

    fn equation_card(db: &Database, mode: RenderMode) -> String {
        let ctx = RenderContext::new(db, "/", mode);
        let eq = db.store().lookup_by_id("equations", 10).unwrap();
        render_card(&ctx, "equations", db.schemas().schema("equations"), eq)
    }

    #[test]
    fn test_author_links_to_mathematician() {
        let (_tmp, db) = database();
        let html = equation_card(&db, RenderMode::Static);
        assert!(html.contains(
            "<a class=\"reference\" href=\"/mathematicians/euler.html\">Leonhard Euler</a>"
        ));
    }

    #[test]
    fn test_column_kinds() {
        let (_tmp, db) = database();
        let html = equation_card(&db, RenderMode::Static);
        assert!(html.contains("Analysis"));
        assert!(html.contains("Unspecified"));
        assert!(html.contains("<li>Complex analysis</li>"));
        assert!(html.contains("?#nowhere"));
        assert!(html.contains("latex-equation"));
        assert!(!html.contains("Edit"));
    }

    #[test]
    fn test_unknown_type_only_breaks_its_column() {
        let (_tmp, db) = database();
        let html = equation_card(&db, RenderMode::Static);
        assert!(html.contains("render-error"));
        assert!(html.contains("unknown type &#39;matrix&#39;"));
        assert!(html.contains("Euler&#39;s Identity"));
    }

    #[test]
    fn test_deleted_author_renders_plain_text() {
        let (_tmp, mut db) = database();
        db.store_mut().remove("mathematicians", "1");
        let html = equation_card(&db, RenderMode::Static);
        assert!(html.contains("<dd class=\"field-author\">euler</dd>"));
        assert!(!html.contains("mathematicians/euler.html"));
    }

    #[test]
    fn test_reverse_reference_column() {
        let (_tmp, db) = database();
        let ctx = RenderContext::new(&db, "/", RenderMode::Static);
        let euler = db.store().lookup_by_id("mathematicians", 1).unwrap();
        let html = render_card(&ctx, "mathematicians", db.schemas().schema("mathematicians"), euler);
        assert!(html.contains("href=\"/equations/eulers-identity.html\""));
        assert!(html.contains("Leonhard Euler (?–present)"));
    }

    #[test]
    fn test_server_mode_adds_edit_link() {
        let (_tmp, db) = database();
        let html = equation_card(&db, RenderMode::Server);
        assert!(html.contains("href=\"/equations/edit_eulers-identity.html\""));
    }

    #[test]
    fn test_boolean_states_are_distinct() {
        assert!(render_boolean(Some(&json!(true))).contains("Yes"));
        assert!(render_boolean(Some(&json!(false))).contains("No"));
        assert!(render_boolean(None).contains("Unspecified"));
        assert_ne!(render_boolean(None), render_boolean(Some(&json!(false))));
    }
}
