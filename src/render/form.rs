//! Edit forms mirroring the card type dispatch

use serde_json::{json, Value};

use crate::core::{Entity, EntityStore};
use crate::render::html::{escape_html, list};
use crate::render::reference::{render_entity_link, reverse_references};
use crate::render::RenderContext;
use crate::schema::{title_case, Column, ColumnKind, Schema};

const ARRAY_EDITOR_JS: &str = include_str!("../../assets/array_editor.js");
const ENTRY_FORM_JS: &str = include_str!("../../assets/entry_form.js");

/// Defaults for a new entry: the next free id
pub fn new_entry_defaults(store: &EntityStore, table: &str) -> Entity {
    let next_id = store.max_id(table).map_or(1, |id| id + 1);
    let mut entity = Entity::default();
    entity.insert("id", json!(next_id));
    entity
}

/// Render the edit form of an entity (or of the defaults of a new one)
///
/// Saving posts the entry as JSON to `api/save_entry/<table>`; existing
/// entries also get a delete button.
pub fn render_entry_form(
    ctx: &RenderContext<'_>,
    table: &str,
    schema: &Schema,
    entity: &Entity,
    is_new: bool,
) -> String {
    let mut out = format!(
        "<form id=\"entry-form\" class=\"entry-form\" data-save-url=\"{}\" data-delete-url=\"{}\" data-table-url=\"{}\">\n",
        escape_html(&ctx.url(&format!("api/save_entry/{}", table))),
        escape_html(&ctx.url(&format!("api/delete_entry/{}/{}", table, delete_key(entity)))),
        escape_html(&ctx.url(&format!("{}/", table))),
    );

    if schema.column("id").is_none() {
        out.push_str(&field(
            "id",
            "Id",
            &integer_input("id", entity.get("id"), true),
        ));
    }
    if schema.column("short_name").is_none() {
        out.push_str(&field(
            "short_name",
            "Short Name",
            &text_input("short_name", "string", entity.get("short_name"), false),
        ));
    }

    if schema.is_empty() {
        for (name, value) in entity.fields() {
            if name == "id" || name == "short_name" {
                continue;
            }
            let input = match value {
                Value::Bool(_) | Value::Null => boolean_select(name, Some(value)),
                Value::Number(_) => integer_input(name, Some(value), false),
                Value::Array(_) => array_editor(name, Some(value)),
                Value::Object(_) => continue,
                Value::String(_) => text_input(name, "string", Some(value), false),
            };
            out.push_str(&field(name, &title_case(name), &input));
        }
    } else {
        for column in &schema.columns {
            out.push_str(&field(&column.name, &column.label(), &render_input(ctx, table, column, entity)));
        }
    }

    out.push_str("<div class=\"form-actions\">\n<button type=\"submit\">Save</button>\n");
    if !is_new {
        out.push_str("<button type=\"button\" id=\"delete-entry\" class=\"danger\">Delete</button>\n");
    }
    out.push_str("</div>\n<p id=\"form-status\" class=\"form-status\"></p>\n</form>\n");
    out.push_str(&format!("<script>\n{}</script>\n", ARRAY_EDITOR_JS));
    out.push_str(&format!("<script>\n{}</script>\n", ENTRY_FORM_JS));
    out
}

fn delete_key(entity: &Entity) -> String {
    entity
        .id()
        .map(|id| id.to_string())
        .or_else(|| entity.short_name().map(str::to_string))
        .unwrap_or_default()
}

fn field(name: &str, label: &str, input: &str) -> String {
    format!(
        "<div class=\"form-field\">\n<label for=\"field-{name}\">{label}</label>\n{input}\n</div>\n",
        name = escape_html(name),
        label = escape_html(label),
        input = input,
    )
}

fn render_input(ctx: &RenderContext<'_>, table: &str, column: &Column, entity: &Entity) -> String {
    let value = entity.get(&column.name);
    let kind = match column.kind() {
        Ok(kind) => kind,
        Err(e) => {
            return format!("<p class=\"render-error\">{}</p>", escape_html(&e.to_string()));
        }
    };

    match kind {
        ColumnKind::String => text_input(&column.name, "string", value, column.required),
        ColumnKind::Latex => text_input(&column.name, "latex", value, column.required),
        ColumnKind::Text => format!(
            "<textarea id=\"field-{name}\" name=\"{name}\" data-kind=\"text\" rows=\"6\"{req}>{}</textarea>",
            escape_html(&text(value)),
            name = escape_html(&column.name),
            req = required_attr(column.required),
        ),
        ColumnKind::Integer => integer_input(&column.name, value, column.required),
        ColumnKind::Boolean => boolean_select(&column.name, value),
        ColumnKind::Enum(_) => {
            let options = ctx.schemas().get_enum_options(table, &column.name);
            enum_select(&column.name, &options, value)
        }
        ColumnKind::Array => array_editor(&column.name, value),
        ColumnKind::Reference(target) => {
            let found = reverse_references(ctx.store(), target, table, entity);
            let items: Vec<String> = found
                .into_iter()
                .map(|e| render_entity_link(ctx, &target.table, e))
                .collect();
            format!(
                "<div class=\"derived-field\">{}<p class=\"hint\">Derived from {}.{}</p></div>",
                list(&items, "reference-list"),
                escape_html(&target.table),
                escape_html(&target.column)
            )
        }
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn required_attr(required: bool) -> &'static str {
    if required {
        " required"
    } else {
        ""
    }
}

fn text_input(name: &str, kind: &str, value: Option<&Value>, required: bool) -> String {
    format!(
        "<input type=\"text\" id=\"field-{name}\" name=\"{name}\" data-kind=\"{kind}\" value=\"{}\"{}>",
        escape_html(&text(value)),
        required_attr(required),
        name = escape_html(name),
        kind = kind,
    )
}

fn integer_input(name: &str, value: Option<&Value>, required: bool) -> String {
    format!(
        "<input type=\"number\" step=\"1\" id=\"field-{name}\" name=\"{name}\" data-kind=\"integer\" value=\"{}\"{}>",
        escape_html(&text(value)),
        required_attr(required),
        name = escape_html(name),
    )
}

/// Tri-state select: unset, true, false
pub fn boolean_select(name: &str, value: Option<&Value>) -> String {
    let current = match value {
        Some(Value::Bool(true)) => "true",
        Some(Value::Bool(false)) => "false",
        Some(Value::String(s)) if s == "true" || s == "false" => s.as_str(),
        _ => "",
    };
    let options = [("", "Unspecified"), ("true", "Yes"), ("false", "No")]
        .iter()
        .map(|(v, label)| option(v, label, *v == current))
        .collect::<String>();
    format!(
        "<select id=\"field-{name}\" name=\"{name}\" data-kind=\"boolean\">{}</select>",
        options,
        name = escape_html(name),
    )
}

fn enum_select(name: &str, options: &[(String, String)], value: Option<&Value>) -> String {
    let current = text(value);
    let mut html = option("", "", current.is_empty());
    for (v, label) in options {
        html.push_str(&option(v, label, *v == current));
    }
    // Values outside the schema's set stay selectable so saving keeps them
    if !current.is_empty() && !options.iter().any(|(v, _)| *v == current) {
        html.push_str(&option(&current, &current, true));
    }
    format!(
        "<select id=\"field-{name}\" name=\"{name}\" data-kind=\"enum\">{}</select>",
        html,
        name = escape_html(name),
    )
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        "<option value=\"{}\"{}>{}</option>",
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label)
    )
}

fn array_editor(name: &str, value: Option<&Value>) -> String {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().map(|v| text(Some(v))).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    };
    let rows: String = items
        .iter()
        .map(|item| {
            format!(
                "<li><input type=\"text\" value=\"{}\"> <button type=\"button\" class=\"remove-row\">Remove</button></li>",
                escape_html(item)
            )
        })
        .collect();
    let working = serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string());
    format!(
        "<div class=\"array-field\" id=\"field-{name}\">\
         <input type=\"hidden\" name=\"{name}\" data-kind=\"array\" value=\"{}\">\
         <ul class=\"array-rows\">{}</ul>\
         <button type=\"button\" class=\"add-row\">Add</button></div>",
        escape_html(&working),
        rows,
        name = escape_html(name),
    )
}
