//! Generic node/edge description produced by table graph builders

use serde::Serialize;

use crate::core::Entity;

/// Visual attributes understood by the DOT writer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    /// Line style, e.g. `dashed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrowhead: Option<String>,
}

impl Style {
    pub fn shape(mut self, shape: &str) -> Self {
        self.shape = Some(shape.to_string());
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn fill(mut self, fillcolor: &str) -> Self {
        self.fillcolor = Some(fillcolor.to_string());
        self
    }

    pub fn line(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    pub fn arrowhead(mut self, arrowhead: &str) -> Self {
        self.arrowhead = Some(arrowhead.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique within one graph, e.g. `#equations/10`
    pub id: String,
    pub label: String,
    /// Reference string of the entity this node stands for
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub label: Option<String>,
    pub style: Style,
}

/// One swatch of the legend shown next to a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub style: Style,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub legend: Vec<LegendEntry>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Add an edge; edges whose endpoints are not both nodes of the graph are
    /// dropped so the graph never dangles
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.node(&edge.source).is_none() || self.node(&edge.target).is_none() {
            tracing::debug!("dropping edge {} -> {}", edge.source, edge.target);
            return false;
        }
        self.edges.push(edge);
        true
    }
}

/// Node id of an entity, `#<table>/<id>` (short_name when there is no id)
pub fn node_id(table: &str, entity: &Entity) -> Option<String> {
    let key = entity
        .id()
        .map(|id| id.to_string())
        .or_else(|| entity.short_name().map(str::to_string))?;
    Some(format!("#{}/{}", table, key))
}
