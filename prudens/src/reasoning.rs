/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */
pub mod builtins;
pub mod facts;
pub mod justification;
pub mod materialisation;
pub mod predicates;
pub mod rules;
pub mod to_dot;
pub mod unification;

use serde::Serialize;
use shared::literal::Literal;
use shared::rule::{KnowledgeBase, Rule};
use std::fmt;

use crate::config::ReasonerConfig;
use crate::error::LoadError;
use crate::reasoning::facts::FactSet;
use crate::reasoning::justification::JustificationGraph;
use crate::reasoning::predicates::{PredicateArgs, PredicateTable};

/// Rules, host predicates and run settings. Read-only during inference; each
/// call to `infer` owns its own facts and justification graph.
#[derive(Debug, Clone, Default)]
pub struct Reasoner {
    pub knowledge_base: KnowledgeBase,
    pub predicates: PredicateTable,
    pub config: ReasonerConfig,
}

impl Reasoner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ReasonerConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers every rule of `kb`, in order.
    pub fn from_knowledge_base(kb: KnowledgeBase) -> Result<Self, LoadError> {
        let mut reasoner = Reasoner::new();
        reasoner.add_rules(kb.rules)?;
        Ok(reasoner)
    }

    pub fn register_predicate<F>(&mut self, name: &str, parameters: &[&str], body: F)
    where
        F: Fn(&PredicateArgs) -> bool + Send + Sync + 'static,
    {
        self.predicates.register(name, parameters, body);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.knowledge_base.rules
    }
}

/// A standing literal removed because a stronger rule derived its negation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Retraction {
    pub round: usize,
    pub defeated: String,
    pub replaced_by: String,
    /// Rule instance that did the defeating.
    pub instance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// Opposite literals supported at the same rank; neither was retracted.
    PriorityTie {
        literal: String,
        opposing: String,
        rank: usize,
    },
    /// The context itself holds a literal and its negation.
    ContradictoryContext { literal: String },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::PriorityTie { literal, opposing, rank } => write!(
                f,
                "priority tie at rank {}: {} vs {}, neither retracted",
                rank, literal, opposing
            ),
            Anomaly::ContradictoryContext { literal } => {
                write!(f, "context contains both {} and its negation", literal)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InferenceResult {
    pub facts: FactSet,
    pub graph: JustificationGraph,
    pub rounds: usize,
    pub retractions: Vec<Retraction>,
    pub anomalies: Vec<Anomaly>,
}

impl InferenceResult {
    pub fn contains(&self, literal: &Literal) -> bool {
        self.facts.contains(literal)
    }

    /// Literals standing because of at least one rule instance.
    pub fn derived(&self) -> impl Iterator<Item = &Literal> {
        self.graph.literals()
    }
}

impl fmt::Display for InferenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inferences: {}", self.facts)
    }
}
