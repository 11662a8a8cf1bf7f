//! Interactive graph documents: DOT source, legend and detail cards

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::site::GraphInfo;
use crate::graph::dot::{edge_element_id, node_element_id, to_dot};
use crate::graph::model::Graph;
use crate::render::html::escape_html;
use crate::render::{render_card, RenderContext};
use crate::tables;

const GRAPH_VIEW_JS: &str = include_str!("../../assets/graph_view.js");

const D3_SCRIPTS: &[&str] = &[
    "https://d3js.org/d3.v7.min.js",
    "https://unpkg.com/@hpcc-js/wasm@2.20.0/dist/graphviz.umd.js",
    "https://unpkg.com/d3-graphviz@5.6.0/build/d3-graphviz.js",
];

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("graph '{0}' not found")]
    NotFound(String),

    #[error("table '{table}' of graph '{graph}' has no graph builder")]
    NoBuilder { graph: String, table: String },
}

/// Build and render a graph registered in `main.json`
pub fn render_named_graph(ctx: &RenderContext<'_>, short_name: &str) -> Result<(GraphInfo, String), GraphError> {
    let info = ctx
        .db
        .site()
        .graph(short_name)
        .ok_or_else(|| GraphError::NotFound(short_name.to_string()))?;
    let build = tables::capabilities(&info.table)
        .build_graph
        .ok_or_else(|| GraphError::NoBuilder {
            graph: short_name.to_string(),
            table: info.table.clone(),
        })?;

    let graph = build(ctx.store());
    tracing::debug!(
        "graph {}: {} nodes, {} edges",
        short_name,
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok((info.clone(), render_graph(ctx, &graph)))
}

/// HTML fragment showing a graph
///
/// The layout happens in the browser; the fragment carries the DOT source,
/// a map from element id to the pre-rendered card of the referenced entity,
/// and the legend.
pub fn render_graph(ctx: &RenderContext<'_>, graph: &Graph) -> String {
    let store = ctx.store();
    let url_of = |reference: &str| {
        store
            .resolve_reference(reference)
            .map(|(table, entity)| ctx.entity_url(table, entity))
    };
    let dot = to_dot(graph, &url_of);

    let card_of = |reference: Option<&str>| {
        let (table, entity) = store.resolve_reference(reference?)?;
        Some(render_card(ctx, table, ctx.schemas().schema(table), entity))
    };
    let mut details: BTreeMap<String, String> = BTreeMap::new();
    for (i, node) in graph.nodes.iter().enumerate() {
        if let Some(card) = card_of(node.reference.as_deref()) {
            details.insert(node_element_id(i), card);
        }
    }
    for (i, edge) in graph.edges.iter().enumerate() {
        if let Some(card) = card_of(edge.reference.as_deref()) {
            details.insert(edge_element_id(i), card);
        }
    }

    let mut out = String::new();
    out.push_str("<div class=\"graph-layout\">\n");
    out.push_str("<div id=\"graph\" class=\"graph-container\"></div>\n");
    out.push_str(
        "<aside id=\"graph-details\" class=\"graph-details\"><p class=\"hint\">Click a node or label for details.</p></aside>\n",
    );
    out.push_str("</div>\n");
    out.push_str(&render_legend(graph));
    out.push_str(&format!(
        "<script type=\"application/json\" id=\"graph-dot\">{}</script>\n",
        script_json(&serde_json::Value::String(dot))
    ));
    out.push_str(&format!(
        "<script type=\"application/json\" id=\"graph-details-data\">{}</script>\n",
        script_json(&serde_json::json!(details))
    ));
    for src in D3_SCRIPTS {
        out.push_str(&format!("<script src=\"{}\"></script>\n", src));
    }
    out.push_str(&format!("<script>\n{}</script>\n", GRAPH_VIEW_JS));
    out
}

fn render_legend(graph: &Graph) -> String {
    if graph.legend.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"graph-legend\">\n");
    for entry in &graph.legend {
        let fill = entry.style.fillcolor.as_deref().unwrap_or("transparent");
        let border = entry.style.color.as_deref().unwrap_or("#333");
        let radius = if entry.style.shape.as_deref() == Some("ellipse") { "50%" } else { "2px" };
        out.push_str(&format!(
            "<li><span class=\"swatch\" style=\"background:{};border-color:{};border-radius:{}\"></span>{}</li>\n",
            escape_html(fill),
            escape_html(border),
            radius,
            escape_html(&entry.label)
        ));
    }
    out.push_str("</ul>\n");
    out
}

/// JSON safe to place inside a `<script>` element
fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Database;
    use crate::render::RenderMode;
    use std::fs;
    use tempfile::tempdir;

    fn database(main_json: &str) -> (tempfile::TempDir, Database) {
        let tmp = tempdir().unwrap();
        let m = tmp.path().join("mathematicians");
        let e = tmp.path().join("equations");
        fs::create_dir(&m).unwrap();
        fs::create_dir(&e).unwrap();
        fs::write(tmp.path().join("main.json"), main_json).unwrap();
        fs::write(
            m.join("001_euler.json"),
            r#"{"id": 1, "short_name": "euler", "name": "Leonhard Euler"}"#,
        )
        .unwrap();
        fs::write(
            e.join("010_eulers-identity.json"),
            r#"{"id": 10, "short_name": "eulers-identity", "name": "Euler's Identity", "author": "euler"}"#,
        )
        .unwrap();
        let db = Database::open(tmp.path()).unwrap();
        (tmp, db)
    }

    const MAIN: &str = r#"{"graphs": [
        {"short_name": "authors", "name": "Authors", "table": "equations"},
        {"short_name": "people", "table": "mathematicians"}
    ]}"#;

    #[test]
    fn test_named_graph() {
        let (_tmp, db) = database(MAIN);
        let ctx = RenderContext::new(&db, "/", RenderMode::Server);
        let (info, html) = render_named_graph(&ctx, "authors").unwrap();

        assert_eq!(info.display_name(), "Authors");
        assert!(html.contains("id=\"graph-dot\""));
        assert!(html.contains("/mathematicians/euler.html"));
        assert!(html.contains("\"node-0\":"));
        assert!(html.contains("graph-legend"));
    }

    #[test]
    fn test_unknown_graphs() {
        let (_tmp, db) = database(MAIN);
        let ctx = RenderContext::new(&db, "/", RenderMode::Static);
        assert_eq!(
            render_named_graph(&ctx, "missing").unwrap_err(),
            GraphError::NotFound("missing".to_string())
        );
        assert!(matches!(
            render_named_graph(&ctx, "people"),
            Err(GraphError::NoBuilder { .. })
        ));
    }

    #[test]
    fn test_card_markup_cannot_close_the_script() {
        assert_eq!(
            script_json(&serde_json::json!({"a": "</div>"})),
            "{\"a\":\"<\\/div>\"}"
        );
    }
}
