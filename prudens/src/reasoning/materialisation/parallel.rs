use rayon::prelude::*;
use shared::rule::{KnowledgeBase, Rule};
use shared::terms::Substitution;

use crate::reasoning::facts::FactSet;
use crate::reasoning::materialisation::infer_generic::InferenceStrategy;
use crate::reasoning::predicates::PredicateTable;
use crate::reasoning::rules::join_body;

/// Joins every rule at once against the facts as they stood when the round
/// began. The driver still merges the results one rule at a time.
#[derive(Debug, Default)]
pub struct ParallelStrategy {
    pending: Vec<Vec<Substitution>>,
}

impl InferenceStrategy for ParallelStrategy {
    fn begin_round(&mut self, kb: &KnowledgeBase, facts: &FactSet, predicates: &PredicateTable) {
        self.pending = kb
            .rules
            .par_iter()
            .map(|rule| join_body(&rule.body, facts, predicates))
            .collect();
    }

    fn evaluate_rule(
        &mut self,
        index: usize,
        _rule: &Rule,
        _facts: &FactSet,
        _predicates: &PredicateTable,
    ) -> Vec<Substitution> {
        self.pending
            .get_mut(index)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}
