//! Graph description output.
//!
//! DOT output is meant for Graphviz (`dot -Tpdf tree.dot -o tree.pdf`). Only
//! structure is written; layout and styling are left to the renderer.

use crate::error::Result;
use crate::graph::{AncestryGraph, GraphNode};
use mgptree_scanner::PersonId;
use serde::Serialize;
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Dot,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" | "graphviz" => Ok(ExportFormat::Dot),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Add degree, institution and year lines under each name.
    pub details: bool,
}

pub fn export(graph: &AncestryGraph, options: &ExportOptions) -> Result<String> {
    match options.format {
        ExportFormat::Dot => Ok(to_dot(graph, options.details)),
        ExportFormat::Json => to_json(graph),
    }
}

/// Escape text for use inside a double-quoted DOT string.
pub fn escape_dot(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

fn node_id(id: PersonId) -> String {
    format!("n{}", id)
}

fn label_lines(node: &GraphNode, details: bool) -> Vec<String> {
    let mut lines = vec![node.name.label()];
    if details {
        let degree = [node.title.as_deref(), node.institution.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        if !degree.is_empty() {
            lines.push(degree);
        }
        if let Some(year) = &node.year {
            lines.push(year.clone());
        }
    }
    lines
}

/// Render the graph as a Graphviz digraph.
///
/// Nodes and edges are written in ascending id order, so the same graph
/// always produces the same bytes.
pub fn to_dot(graph: &AncestryGraph, details: bool) -> String {
    let mut dot = String::from("digraph genealogy {\n");

    for node in graph.nodes() {
        let label = label_lines(node, details)
            .iter()
            .map(|line| escape_dot(line))
            .collect::<Vec<_>>()
            .join("\\n");
        let _ = writeln!(dot, "    {} [label=\"{}\"];", node_id(node.id), label);
    }

    let edges = graph.edges();
    if !edges.is_empty() {
        dot.push('\n');
    }
    for (advisor, advisee) in edges {
        let _ = writeln!(dot, "    {} -> {};", node_id(advisor), node_id(advisee));
    }

    dot.push_str("}\n");
    dot
}

#[derive(Debug, Serialize)]
struct JsonNode<'a> {
    id: PersonId,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    institution: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<&'a str>,
    distance: u32,
}

#[derive(Debug, Serialize)]
struct JsonEdge {
    advisor: PersonId,
    advisee: PersonId,
}

#[derive(Debug, Serialize)]
struct JsonGraph<'a> {
    nodes: Vec<JsonNode<'a>>,
    edges: Vec<JsonEdge>,
}

/// Render the graph as `{"nodes": [...], "edges": [...]}`.
pub fn to_json(graph: &AncestryGraph) -> Result<String> {
    let document = JsonGraph {
        nodes: graph
            .nodes()
            .map(|node| JsonNode {
                id: node.id,
                label: node.name.label(),
                title: node.title.as_deref(),
                institution: node.institution.as_deref(),
                year: node.year.as_deref(),
                distance: node.distance,
            })
            .collect(),
        edges: graph
            .edges()
            .into_iter()
            .map(|(advisor, advisee)| JsonEdge { advisor, advisee })
            .collect(),
    };

    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}
