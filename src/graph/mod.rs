//! Relationship graphs: model, DOT output and interactive rendering

pub mod dot;
pub mod model;
pub mod render;

pub use model::{Edge, Graph, LegendEntry, Node, Style};
pub use render::{render_graph, render_named_graph, GraphError};
