//! Graphviz DOT output for the client-side layout

use crate::graph::model::{Graph, Style};

/// Element ids given to the DOT statements, used to look up detail cards
pub fn node_element_id(index: usize) -> String {
    format!("node-{}", index)
}

pub fn edge_element_id(index: usize) -> String {
    format!("edge-{}", index)
}

/// `$...$` segments become `\(\displaystyle{...}\)` for MathJax
pub fn latex_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut rest = label;
    while let Some(start) = rest.find('$') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('$') else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str("\\(\\displaystyle{");
        out.push_str(&after[..end]);
        out.push_str("}\\)");
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Quote a string for DOT; newlines become `\n` line breaks
pub fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

fn style_attrs(style: &Style, attrs: &mut Vec<(String, String)>) {
    if let Some(shape) = &style.shape {
        attrs.push(("shape".to_string(), shape.clone()));
    }
    if let Some(color) = &style.color {
        attrs.push(("color".to_string(), color.clone()));
    }
    let mut line = style.style.clone().unwrap_or_default();
    if let Some(fill) = &style.fillcolor {
        attrs.push(("fillcolor".to_string(), fill.clone()));
        if line.is_empty() {
            line = "filled".to_string();
        } else {
            line.push_str(",filled");
        }
    }
    if !line.is_empty() {
        attrs.push(("style".to_string(), line));
    }
}

fn statement(target: &str, attrs: &[(String, String)]) -> String {
    let list: Vec<String> = attrs.iter().map(|(k, v)| format!("{}={}", k, quote(v))).collect();
    format!("  {} [{}];\n", target, list.join(", "))
}

/// Write a graph as a DOT digraph
///
/// `url_of` maps a node or edge `ref` to the page it should link to.
/// Labelled edges are drawn through a small plaintext node carrying the
/// label, so the label can be clicked like a node. The first half has no
/// arrowhead; the second carries the edge's own.
pub fn to_dot(graph: &Graph, url_of: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::from("digraph G {\n");
    out.push_str("  graph [rankdir=\"LR\", bgcolor=\"transparent\"];\n");
    out.push_str("  node [fontname=\"Helvetica\", fontsize=\"11\"];\n");
    out.push_str("  edge [fontname=\"Helvetica\", fontsize=\"10\"];\n");

    for (i, node) in graph.nodes.iter().enumerate() {
        let mut attrs = vec![
            ("id".to_string(), node_element_id(i)),
            ("label".to_string(), latex_label(&node.label)),
            ("tooltip".to_string(), node.label.clone()),
        ];
        if let Some(url) = node.reference.as_deref().and_then(url_of) {
            attrs.push(("URL".to_string(), url));
        }
        style_attrs(&node.style, &mut attrs);
        out.push_str(&statement(&quote(&node.id), &attrs));
    }

    for (i, edge) in graph.edges.iter().enumerate() {
        let url = edge.reference.as_deref().and_then(url_of);
        let mut line_attrs = Vec::new();
        if let Some(color) = &edge.style.color {
            line_attrs.push(("color".to_string(), color.clone()));
        }
        if let Some(style) = &edge.style.style {
            line_attrs.push(("style".to_string(), style.clone()));
        }
        let arrowhead = edge.style.arrowhead.clone().unwrap_or_else(|| "normal".to_string());
        let source = quote(&edge.source);
        let target = quote(&edge.target);

        match &edge.label {
            Some(label) => {
                let label_node = quote(&format!("{}#label", edge_element_id(i)));
                let mut attrs = vec![
                    ("id".to_string(), edge_element_id(i)),
                    ("label".to_string(), latex_label(label)),
                    ("tooltip".to_string(), label.clone()),
                    ("shape".to_string(), "plaintext".to_string()),
                    ("fontsize".to_string(), "9".to_string()),
                ];
                if let Some(color) = &edge.style.color {
                    attrs.push(("fontcolor".to_string(), color.clone()));
                }
                if let Some(url) = url {
                    attrs.push(("URL".to_string(), url));
                }
                out.push_str(&statement(&label_node, &attrs));

                let mut first = line_attrs.clone();
                first.push(("arrowhead".to_string(), "none".to_string()));
                out.push_str(&statement(&format!("{} -> {}", source, label_node), &first));

                let mut second = line_attrs;
                second.push(("arrowhead".to_string(), arrowhead));
                out.push_str(&statement(&format!("{} -> {}", label_node, target), &second));
            }
            None => {
                let mut attrs = line_attrs;
                attrs.push(("id".to_string(), edge_element_id(i)));
                attrs.push(("arrowhead".to_string(), arrowhead));
                if let Some(url) = url {
                    attrs.push(("URL".to_string(), url));
                }
                out.push_str(&statement(&format!("{} -> {}", source, target), &attrs));
            }
        }
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{Edge, Node};

    fn graph() -> Graph {
        let node = |id: &str, label: &str| Node {
            id: id.to_string(),
            label: label.to_string(),
            reference: Some(id.to_string()),
            style: Style::default().shape("box").fill("#F2DCDB"),
        };
        let mut graph = Graph::default();
        graph.add_node(node("#equations/10", "Euler's Identity\n$e^{i\\pi}+1=0$"));
        graph.add_node(node("#mathematicians/1", "Leonhard Euler"));
        graph.add_edge(Edge {
            source: "#equations/10".to_string(),
            target: "#mathematicians/1".to_string(),
            reference: None,
            label: Some("author".to_string()),
            style: Style::default().line("dashed").arrowhead("open"),
        });
        graph
    }

    #[test]
    fn test_latex_label() {
        assert_eq!(latex_label("x $a^2$ y"), "x \\(\\displaystyle{a^2}\\) y");
        assert_eq!(latex_label("costs $5"), "costs $5");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("a \"b\"\nc\\d"), "\"a \\\"b\\\"\\nc\\\\d\"");
    }

    #[test]
    fn test_labelled_edge_goes_through_label_node() {
        let dot = to_dot(&graph(), &|r: &str| Some(format!("/page/{}", r.trim_start_matches('#'))));

        assert!(dot.contains("\"edge-0#label\" [id=\"edge-0\", label=\"author\""));
        assert!(dot.contains(
            "\"#equations/10\" -> \"edge-0#label\" [style=\"dashed\", arrowhead=\"none\"];"
        ));
        assert!(dot.contains(
            "\"edge-0#label\" -> \"#mathematicians/1\" [style=\"dashed\", arrowhead=\"open\"];"
        ));
        assert!(dot.contains("URL=\"/page/mathematicians/1\""));
        assert!(dot.contains("style=\"filled\""));
        assert!(dot.contains("\\\\(\\\\displaystyle{e^{i\\\\pi}+1=0}\\\\)"));
    }
}
