//! `equations` table hooks: author links, titles and the authorship graph

use serde_json::Value;

use crate::core::{Entity, EntityStore};
use crate::graph::model::{node_id, Edge, Graph, LegendEntry, Node, Style};
use crate::render::html::{escape_html, link};
use crate::render::RenderContext;
use crate::schema::Column;
use crate::tables::TableCapabilities;

pub const CAPABILITIES: TableCapabilities = TableCapabilities {
    render_card_override: Some(render_card_override),
    make_title: Some(make_title),
    build_graph: Some(build_graph),
};

const AUTHOR_TABLE: &str = "mathematicians";

pub fn make_title(entity: &Entity) -> String {
    entity.display_name()
}

/// Resolve an author value: a reference string, or a key into `mathematicians`
pub fn resolve_author<'s>(store: &'s EntityStore, author: &str) -> Option<(&'s str, &'s Entity)> {
    store.resolve_in(AUTHOR_TABLE, author.trim())
}

/// The author cell links to the mathematician when it resolves and shows
/// the stored text otherwise, without a broken-reference marker
fn render_card_override(ctx: &RenderContext<'_>, column: &Column, entity: &Entity) -> Option<String> {
    if column.name != "author" {
        return None;
    }
    let authors = author_values(entity.get("author")?);
    if authors.is_empty() {
        return None;
    }

    let rendered: Vec<String> = authors
        .iter()
        .map(|author| match resolve_author(ctx.store(), author) {
            Some((table, m)) => link(&ctx.entity_url(table, m), &m.display_name(), Some("reference")),
            None => escape_html(author),
        })
        .collect();
    Some(rendered.join(", "))
}

fn author_values(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.as_str()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn mathematician_style() -> Style {
    Style::default().shape("ellipse").color("#4F81BD").fill("#D9E1F2")
}

fn equation_style() -> Style {
    Style::default().shape("box").color("#C0504D").fill("#F2DCDB")
}

/// Equations, mathematicians, and an `author` edge from each equation to
/// every author that resolves
pub fn build_graph(store: &EntityStore) -> Graph {
    let mut graph = Graph::default();
    graph.legend = vec![
        LegendEntry {
            label: "Mathematician".to_string(),
            style: mathematician_style(),
        },
        LegendEntry {
            label: "Equation".to_string(),
            style: equation_style(),
        },
    ];

    for m in store.entries(AUTHOR_TABLE) {
        let Some(id) = node_id(AUTHOR_TABLE, m) else {
            continue;
        };
        graph.add_node(Node {
            reference: Some(id.clone()),
            id,
            label: m.display_name(),
            style: mathematician_style(),
        });
    }

    for eq in store.entries("equations") {
        let Some(id) = node_id("equations", eq) else {
            continue;
        };
        let label = match eq.get_str("equation").filter(|s| !s.trim().is_empty()) {
            Some(latex) => format!("{}\n${}$", eq.display_name(), latex),
            None => eq.display_name(),
        };
        graph.add_node(Node {
            reference: Some(id.clone()),
            id,
            label,
            style: equation_style(),
        });
    }

    for eq in store.entries("equations") {
        let Some(source) = node_id("equations", eq) else {
            continue;
        };
        let authors = eq.get("author").map(author_values).unwrap_or_default();
        for author in authors {
            let Some(target) = resolve_author(store, author).and_then(|(t, m)| node_id(t, m)) else {
                continue;
            };
            graph.add_edge(Edge {
                source: source.clone(),
                reference: Some(target.clone()),
                target,
                label: Some("author".to_string()),
                style: Style::default().line("dashed").color("#C0504D").arrowhead("open"),
            });
        }
    }

    graph
}
