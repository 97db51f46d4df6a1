use shared::rule::{KnowledgeBase, Rule};
use shared::terms::Substitution;

use crate::reasoning::facts::FactSet;
use crate::reasoning::predicates::PredicateTable;

/// Produces body substitutions for the fixpoint driver.
///
/// The driver calls `begin_round` once, then `evaluate_rule` for every rule in
/// priority order, merging each rule's derivations before asking for the next.
pub trait InferenceStrategy {
    fn begin_round(&mut self, _kb: &KnowledgeBase, _facts: &FactSet, _predicates: &PredicateTable) {}

    fn evaluate_rule(
        &mut self,
        index: usize,
        rule: &Rule,
        facts: &FactSet,
        predicates: &PredicateTable,
    ) -> Vec<Substitution>;
}
