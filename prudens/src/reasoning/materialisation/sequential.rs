use shared::rule::Rule;
use shared::terms::Substitution;

use crate::reasoning::facts::FactSet;
use crate::reasoning::materialisation::infer_generic::InferenceStrategy;
use crate::reasoning::predicates::PredicateTable;
use crate::reasoning::rules::join_body;

/// Joins each rule against the live fact set, so a rule sees what the
/// stronger rules before it derived in the same round.
#[derive(Debug, Default)]
pub struct SequentialStrategy;

impl InferenceStrategy for SequentialStrategy {
    fn evaluate_rule(
        &mut self,
        _index: usize,
        rule: &Rule,
        facts: &FactSet,
        predicates: &PredicateTable,
    ) -> Vec<Substitution> {
        join_body(&rule.body, facts, predicates)
    }
}
