use log::{debug, warn};
use shared::literal::{Literal, LiteralKind};
use shared::rule::Rule;
use shared::terms::Substitution;
use std::collections::HashSet;

use crate::error::{EvaluationError, LoadError};
use crate::reasoning::builtins::evaluate_deferred;
use crate::reasoning::facts::FactSet;
use crate::reasoning::predicates::PredicateTable;
use crate::reasoning::unification::{extend, unify};
use crate::reasoning::Reasoner;

/// Every unifier of `literal` against the facts.
fn extend_by_facts(literal: &Literal, facts: &FactSet) -> Vec<Substitution> {
    facts
        .iter()
        .filter(|fact| fact.arity() != 0)
        .filter_map(|fact| unify(literal, fact))
        .collect()
}

/// Joins one more relational literal into the running substitutions.
fn join_literal(
    literal: &Literal,
    facts: &FactSet,
    substitutions: Vec<Substitution>,
) -> Vec<Substitution> {
    let mut joined = Vec::new();
    for sub in substitutions {
        let instance = literal.apply(&sub);
        for fact in facts.iter() {
            if let Some(unifier) = unify(&instance, fact) {
                if let Some(extension) = extend(&sub, &unifier) {
                    joined.push(extension);
                }
            }
        }
    }
    joined
}

/// All substitutions satisfying `body` against `facts`.
///
/// Propositional literals are guards; procedural and built-in literals are
/// held back and checked once the relational join is done.
pub fn join_body(body: &[Literal], facts: &FactSet, predicates: &PredicateTable) -> Vec<Substitution> {
    // None until the first relational literal constrains anything.
    let mut substitutions: Option<Vec<Substitution>> = None;
    let mut deferred: Vec<&Literal> = Vec::new();

    for literal in body {
        match literal.kind {
            LiteralKind::Propositional => {
                if !facts.contains(literal) {
                    return Vec::new();
                }
            }
            LiteralKind::Procedural | LiteralKind::Equality | LiteralKind::Inequality => {
                deferred.push(literal);
            }
            LiteralKind::Relational | LiteralKind::Action => {
                let joined = match substitutions.take() {
                    None => extend_by_facts(literal, facts),
                    Some(current) => join_literal(literal, facts, current),
                };
                if joined.is_empty() {
                    return Vec::new();
                }
                substitutions = Some(joined);
            }
        }
    }

    let candidates = substitutions.unwrap_or_else(|| vec![Substitution::new()]);
    let mut seen = HashSet::new();
    let mut results = Vec::new();
    for sub in candidates {
        match evaluate_deferred(&deferred, sub, predicates) {
            Ok(Some(passed)) => {
                if seen.insert(passed.clone()) {
                    results.push(passed);
                }
            }
            Ok(None) => {}
            Err(err) => report_evaluation_error(&err),
        }
    }
    results
}

fn report_evaluation_error(err: &EvaluationError) {
    match err {
        EvaluationError::PredicateArityMismatch { .. } | EvaluationError::UnknownPredicate(_) => {
            warn!("predicate table mismatch, literal treated as false: {}", err)
        }
        _ => debug!("literal failed closed: {}", err),
    }
}

/// Checks a rule before it joins the knowledge base.
pub fn validate_rule(rule: &Rule) -> Result<(), LoadError> {
    if rule.head.kind.is_deferred() {
        return Err(LoadError::InvalidHead {
            rule: rule.name.clone(),
            head: rule.head.to_string(),
        });
    }

    for literal in &rule.body {
        let is_builtin = matches!(literal.kind, LiteralKind::Equality | LiteralKind::Inequality);
        if is_builtin && literal.arity() != 2 {
            return Err(LoadError::BuiltinArity {
                rule: rule.name.clone(),
                literal: literal.to_string(),
            });
        }
    }

    if let Some(variable) = rule.unbound_head_variables().into_iter().next() {
        return Err(LoadError::UnboundHeadVariable {
            rule: rule.name.clone(),
            variable,
        });
    }
    Ok(())
}

impl Reasoner {
    /// Appends a rule at the lowest priority so far.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), LoadError> {
        validate_rule(&rule)?;
        if self.knowledge_base.get(&rule.name).is_some() {
            return Err(LoadError::DuplicateRuleName(rule.name));
        }
        debug!("registered rule #{}: {}", self.knowledge_base.len(), rule);
        self.knowledge_base.rules.push(rule);
        Ok(())
    }

    pub fn add_rules<I: IntoIterator<Item = Rule>>(&mut self, rules: I) -> Result<(), LoadError> {
        for rule in rules {
            self.add_rule(rule)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::terms::Term;

    fn var(name: &str) -> Term {
        Term::Variable(name.to_string())
    }

    fn facts(literals: &[Literal]) -> FactSet {
        literals.iter().cloned().collect()
    }

    #[test]
    fn test_join_chains_shared_variables() {
        let body = vec![
            Literal::new("parent", true, vec![var("X"), var("Y")]),
            Literal::new("parent", true, vec![var("Y"), var("Z")]),
        ];
        let facts = facts(&[
            Literal::fact("parent", &["ann", "bob"]),
            Literal::fact("parent", &["bob", "carl"]),
            Literal::fact("parent", &["dora", "eve"]),
        ]);

        let subs = join_body(&body, &facts, &PredicateTable::new());
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].get("X").map(String::as_str), Some("ann"));
        assert_eq!(subs[0].get("Z").map(String::as_str), Some("carl"));
    }

    #[test]
    fn test_propositional_guard() {
        let body = vec![
            Literal::new("raining", true, vec![]),
            Literal::new("person", true, vec![var("X")]),
        ];
        let without = facts(&[Literal::fact("person", &["ann"])]);
        assert!(join_body(&body, &without, &PredicateTable::new()).is_empty());

        let with = facts(&[Literal::fact("person", &["ann"]), Literal::fact("raining", &[])]);
        assert_eq!(join_body(&body, &with, &PredicateTable::new()).len(), 1);
    }

    #[test]
    fn test_purely_propositional_body_yields_empty_substitution() {
        let body = vec![Literal::new("raining", true, vec![])];
        let subs = join_body(&body, &facts(&[Literal::fact("raining", &[])]), &PredicateTable::new());
        assert_eq!(subs, vec![Substitution::new()]);
    }

    #[test]
    fn test_unmatched_literal_empties_the_join() {
        let body = vec![
            Literal::new("bird", true, vec![var("X")]),
            Literal::new("penguin", true, vec![var("X")]),
        ];
        let facts = facts(&[Literal::fact("bird", &["tweety"]), Literal::fact("penguin", &["pingu"])]);
        assert!(join_body(&body, &facts, &PredicateTable::new()).is_empty());
    }

    #[test]
    fn test_deferred_literals_filter_and_bind() {
        let body = vec![
            Literal::new("val", true, vec![var("X")]),
            Literal::new("?<", true, vec![var("X"), Term::Constant("5".into())]),
        ];
        let facts = facts(&[Literal::fact("val", &["7"]), Literal::fact("val", &["2"])]);
        let subs = join_body(&body, &facts, &PredicateTable::new());
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].get("X").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_validate_rule() {
        let unbound = Rule::new(
            "r0",
            vec![Literal::new("a", true, vec![var("X")])],
            Literal::new("b", true, vec![var("Y")]),
        );
        assert_eq!(
            validate_rule(&unbound),
            Err(LoadError::UnboundHeadVariable {
                rule: "r0".to_string(),
                variable: "Y".to_string()
            })
        );

        let builtin_head = Rule::new(
            "r1",
            vec![Literal::new("a", true, vec![var("X")])],
            Literal::new("?<", true, vec![var("X"), var("X")]),
        );
        assert!(matches!(validate_rule(&builtin_head), Err(LoadError::InvalidHead { .. })));

        let short_builtin = Rule::new(
            "r2",
            vec![
                Literal::new("a", true, vec![var("X")]),
                Literal::new("?=", true, vec![var("X")]),
            ],
            Literal::new("b", true, vec![var("X")]),
        );
        assert!(matches!(validate_rule(&short_builtin), Err(LoadError::BuiltinArity { .. })));

        let floating_equality = Rule::new(
            "r3",
            vec![
                Literal::new("a", true, vec![var("X")]),
                Literal::new("?=", true, vec![var("Y"), var("Z")]),
            ],
            Literal::new("b", true, vec![var("Y")]),
        );
        assert_eq!(
            validate_rule(&floating_equality),
            Err(LoadError::UnboundHeadVariable {
                rule: "r3".to_string(),
                variable: "Y".to_string()
            })
        );

        let negated_equality = Rule::new(
            "r4",
            vec![
                Literal::new("a", true, vec![var("X")]),
                Literal::new("?=", false, vec![var("Y"), var("X")]),
            ],
            Literal::new("b", true, vec![var("Y")]),
        );
        assert!(matches!(
            validate_rule(&negated_equality),
            Err(LoadError::UnboundHeadVariable { .. })
        ));
    }
}
