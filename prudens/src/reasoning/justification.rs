/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use serde::Serialize;
use shared::literal::Literal;
use std::collections::BTreeMap;

/// One rule instance supporting a derived literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Justification {
    pub rule: String,
    /// Effective rank of the rule; lower wins.
    pub rank: usize,
    /// Canonical string of the substituted rule.
    pub instance: String,
    /// Ground relational and propositional body literals of the instance.
    pub premises: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    #[serde(skip)]
    pub literal: Literal,
    pub justifications: Vec<Justification>,
}

/// How a conflict with an already standing literal was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictOutcome {
    /// Every justification of the opposing literal ranked lower; it is gone.
    Defeated { discarded: Vec<Justification> },
    /// The opposing literal keeps a strictly stronger justification.
    Upheld {
        discarded: Vec<Justification>,
        strongest: usize,
    },
    /// Only justifications of the same rank remain; neither side wins.
    Tie { discarded: Vec<Justification> },
    /// The opposing literal is not a derivation (it came from the context).
    Unjustified,
}

/// Canonical literal string -> the rule instances currently supporting it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JustificationGraph {
    nodes: BTreeMap<String, GraphNode>,
}

impl JustificationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `justification` for `literal`; `false` if it was already recorded.
    pub fn justify(&mut self, literal: &Literal, justification: Justification) -> bool {
        let node = self
            .nodes
            .entry(literal.to_string())
            .or_insert_with(|| GraphNode {
                literal: literal.clone(),
                justifications: Vec::new(),
            });
        if node.justifications.iter().any(|j| j.instance == justification.instance) {
            return false;
        }
        node.justifications.push(justification);
        true
    }

    pub fn get(&self, literal: &Literal) -> Option<&GraphNode> {
        self.nodes.get(&literal.to_string())
    }

    pub fn justifications(&self, literal: &Literal) -> &[Justification] {
        self.get(literal)
            .map(|n| n.justifications.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.nodes.contains_key(&literal.to_string())
    }

    pub fn remove(&mut self, literal: &Literal) -> Option<GraphNode> {
        self.nodes.remove(&literal.to_string())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GraphNode)> {
        self.nodes.iter()
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.nodes.values().map(|n| &n.literal)
    }

    /// The graph as plain strings: literal -> rule instances.
    pub fn to_string_map(&self) -> BTreeMap<String, Vec<String>> {
        self.nodes
            .iter()
            .map(|(key, node)| {
                (
                    key.clone(),
                    node.justifications.iter().map(|j| j.instance.clone()).collect(),
                )
            })
            .collect()
    }

    /// A rule of rank `rank` derived the negation of `opposing`.
    ///
    /// Drops every justification of `opposing` ranked below `rank`; if none is
    /// left the opposing literal leaves the graph.
    pub fn resolve_conflict(&mut self, opposing: &Literal, rank: usize) -> ConflictOutcome {
        let key = opposing.to_string();
        let Some(node) = self.nodes.get_mut(&key) else {
            return ConflictOutcome::Unjustified;
        };

        let (discarded, kept): (Vec<_>, Vec<_>) = node
            .justifications
            .drain(..)
            .partition(|j| j.rank > rank);
        node.justifications = kept;

        match node.justifications.iter().map(|j| j.rank).min() {
            None => {
                self.nodes.remove(&key);
                ConflictOutcome::Defeated { discarded }
            }
            Some(strongest) if strongest < rank => ConflictOutcome::Upheld {
                discarded,
                strongest,
            },
            Some(_) => ConflictOutcome::Tie { discarded },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn justification(rule: &str, rank: usize, instance: &str) -> Justification {
        Justification {
            rule: rule.to_string(),
            rank,
            instance: instance.to_string(),
            premises: Vec::new(),
        }
    }

    #[test]
    fn test_justify_deduplicates_instances() {
        let mut graph = JustificationGraph::new();
        let lit = Literal::fact("flies", &["tweety"]);
        assert!(graph.justify(&lit, justification("r0", 0, "r0 :: bird(tweety) implies flies(tweety);")));
        assert!(!graph.justify(&lit, justification("r0", 0, "r0 :: bird(tweety) implies flies(tweety);")));
        assert_eq!(graph.justifications(&lit).len(), 1);
        assert_eq!(
            graph.to_string_map().get("flies(tweety)").unwrap(),
            &vec!["r0 :: bird(tweety) implies flies(tweety);".to_string()]
        );
    }

    #[test]
    fn test_stronger_rule_defeats_weaker_support() {
        let mut graph = JustificationGraph::new();
        let lit = Literal::fact("flies", &["tweety"]);
        graph.justify(&lit, justification("r1", 1, "a"));
        graph.justify(&lit, justification("r2", 2, "b"));

        let outcome = graph.resolve_conflict(&lit, 0);
        assert!(matches!(outcome, ConflictOutcome::Defeated { ref discarded } if discarded.len() == 2));
        assert!(!graph.contains(&lit));
    }

    #[test]
    fn test_partial_defeat_keeps_stronger_support() {
        let mut graph = JustificationGraph::new();
        let lit = Literal::fact("flies", &["tweety"]);
        graph.justify(&lit, justification("r0", 0, "a"));
        graph.justify(&lit, justification("r3", 3, "b"));

        let outcome = graph.resolve_conflict(&lit, 1);
        assert_eq!(
            outcome,
            ConflictOutcome::Upheld {
                discarded: vec![justification("r3", 3, "b")],
                strongest: 0
            }
        );
        assert_eq!(graph.justifications(&lit), &[justification("r0", 0, "a")]);
    }

    #[test]
    fn test_equal_rank_is_a_tie() {
        let mut graph = JustificationGraph::new();
        let lit = Literal::fact("flies", &["tweety"]);
        graph.justify(&lit, justification("r0", 2, "a"));
        assert_eq!(graph.resolve_conflict(&lit, 2), ConflictOutcome::Tie { discarded: vec![] });
        assert!(graph.contains(&lit));
    }

    #[test]
    fn test_unknown_literal_is_unjustified() {
        let mut graph = JustificationGraph::new();
        assert_eq!(
            graph.resolve_conflict(&Literal::fact("bird", &["tweety"]), 0),
            ConflictOutcome::Unjustified
        );
    }
}
