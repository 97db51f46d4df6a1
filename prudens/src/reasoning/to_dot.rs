use std::collections::BTreeMap;

use crate::reasoning::justification::JustificationGraph;
use crate::reasoning::InferenceResult;

/// Contains a method to convert a specific data structure into a representation in the DOT language
/// For better visualisation
pub trait ToDot {
    fn to_dot(&self) -> String;
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Assigns `L<n>` ids to literal strings in order of first appearance.
#[derive(Default)]
struct NodeIds {
    ids: BTreeMap<String, usize>,
    order: Vec<String>,
}

impl NodeIds {
    fn id(&mut self, literal: &str) -> usize {
        if let Some(id) = self.ids.get(literal) {
            return *id;
        }
        let id = self.order.len();
        self.ids.insert(literal.to_string(), id);
        self.order.push(literal.to_string());
        id
    }
}

/// Literal nodes, one box per rule instance, premise -> instance -> conclusion.
fn graph_body(graph: &JustificationGraph, context: &[String], out: &mut String) {
    let mut nodes = NodeIds::default();
    let mut edges = String::new();
    let mut instances = String::new();
    let mut instance_count = 0;

    for literal in context {
        nodes.id(literal);
    }

    for (literal, node) in graph.iter() {
        let conclusion = nodes.id(literal);
        for justification in &node.justifications {
            let instance = instance_count;
            instance_count += 1;
            instances.push_str(&format!(
                "J{} [label=\"{} (rank {})\", shape=box]\n",
                instance,
                escape(&justification.rule),
                justification.rank
            ));
            for premise in &justification.premises {
                let id = nodes.id(premise);
                edges.push_str(&format!("L{} -> J{}\n", id, instance));
            }
            edges.push_str(&format!("J{} -> L{}\n", instance, conclusion));
        }
    }

    for (id, literal) in nodes.order.iter().enumerate() {
        let style = if context.contains(literal) {
            ", style=filled"
        } else {
            ""
        };
        out.push_str(&format!("L{} [label=\"{}\"{}]\n", id, escape(literal), style));
    }
    out.push_str(&instances);
    out.push('\n'); // Whitespace between nodes and relations
    out.push_str(&edges);
}

impl ToDot for JustificationGraph {
    fn to_dot(&self) -> String {
        let mut out = String::from("digraph {\n");
        graph_body(self, &[], &mut out);
        out.push('}');
        out
    }
}

/// Context facts are filled; derived facts are plain.
impl ToDot for InferenceResult {
    fn to_dot(&self) -> String {
        let context: Vec<String> = self
            .facts
            .iter()
            .filter(|l| !self.graph.contains(l))
            .map(|l| l.to_string())
            .collect();

        let mut out = String::from("digraph {\n");
        graph_body(&self.graph, &context, &mut out);
        out.push('}');
        out
    }
}
