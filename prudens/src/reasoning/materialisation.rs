use log::{debug, info, trace, warn};
use rustc_hash::FxHashSet;
use shared::literal::Literal;
use shared::rule::Rule;
use shared::terms::Substitution;
use std::time::Instant;

pub mod infer_generic;
pub mod parallel;
pub mod sequential;

use crate::config::OperationMode;
use crate::error::InferenceError;
use crate::reasoning::facts::FactSet;
use crate::reasoning::justification::{ConflictOutcome, Justification, JustificationGraph};
use crate::reasoning::materialisation::infer_generic::InferenceStrategy;
use crate::reasoning::materialisation::parallel::ParallelStrategy;
use crate::reasoning::materialisation::sequential::SequentialStrategy;
use crate::reasoning::{Anomaly, InferenceResult, Reasoner, Retraction};

/// What happened to one candidate head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New fact.
    Added,
    /// Already standing; only the justification may be new.
    Known,
    /// Defeated its negation and took its place.
    Replaced,
    /// Lost against the context, a stronger rule, or a tie.
    Blocked,
}

/// State of one inference run. Owns the facts and the justification graph.
pub struct InferenceSession<'a> {
    reasoner: &'a Reasoner,
    context: FxHashSet<Literal>,
    facts: FactSet,
    graph: JustificationGraph,
    retractions: Vec<Retraction>,
    anomalies: Vec<Anomaly>,
    round: usize,
}

impl<'a> InferenceSession<'a> {
    pub fn new(reasoner: &'a Reasoner, context: &[Literal]) -> Self {
        let facts: FactSet = context.iter().cloned().collect();
        let mut anomalies = Vec::new();
        for literal in facts.iter().filter(|l| l.sign) {
            if facts.contains(&literal.negated()) {
                warn!("context contains both {} and its negation", literal);
                anomalies.push(Anomaly::ContradictoryContext {
                    literal: literal.to_string(),
                });
            }
        }

        Self {
            reasoner,
            context: context.iter().cloned().collect(),
            facts,
            graph: JustificationGraph::new(),
            retractions: Vec::new(),
            anomalies,
            round: 0,
        }
    }

    pub fn facts(&self) -> &FactSet {
        &self.facts
    }

    pub fn graph(&self) -> &JustificationGraph {
        &self.graph
    }

    /// One pass over every rule in priority order. `true` if anything changed.
    pub fn run_round<S: InferenceStrategy>(&mut self, strat: &mut S) -> bool {
        let reasoner = self.reasoner;
        let kb = &reasoner.knowledge_base;
        self.round += 1;
        strat.begin_round(kb, &self.facts, &reasoner.predicates);

        let mut progress = false;
        for (index, rule) in kb.rules.iter().enumerate() {
            let substitutions = strat.evaluate_rule(index, rule, &self.facts, &reasoner.predicates);
            for sub in &substitutions {
                match self.merge(index, rule, sub) {
                    MergeOutcome::Added | MergeOutcome::Replaced => progress = true,
                    MergeOutcome::Known | MergeOutcome::Blocked => {}
                }
            }
        }
        progress
    }

    /// Applies `sub` to the rule head and settles it against the facts.
    pub fn merge(&mut self, index: usize, rule: &Rule, sub: &Substitution) -> MergeOutcome {
        let head = rule.head.apply(sub);
        if !head.is_ground() {
            debug!("rule {}: head {} is not ground, skipped", rule.name, head);
            return MergeOutcome::Blocked;
        }

        let rank = self.reasoner.knowledge_base.rank_of(index);
        let grounded = rule.apply(sub);
        let instance = grounded.to_string();
        let opposing = head.negated();
        let mut replaced = false;

        if self.facts.contains(&opposing) {
            if self.context.contains(&opposing) {
                trace!("{} blocked by context fact {}", head, opposing);
                return MergeOutcome::Blocked;
            }
            match self.graph.resolve_conflict(&opposing, rank) {
                ConflictOutcome::Defeated { discarded } => {
                    debug!(
                        "round {}: {} defeats {} ({} justification(s) dropped)",
                        self.round,
                        head,
                        opposing,
                        discarded.len()
                    );
                    self.facts.remove(&opposing);
                    self.retractions.push(Retraction {
                        round: self.round,
                        defeated: opposing.to_string(),
                        replaced_by: head.to_string(),
                        instance: instance.clone(),
                    });
                    replaced = true;
                }
                ConflictOutcome::Upheld { strongest, .. } => {
                    trace!("{} blocked by {} (rank {} < {})", head, opposing, strongest, rank);
                    return MergeOutcome::Blocked;
                }
                ConflictOutcome::Tie { .. } => {
                    let anomaly = Anomaly::PriorityTie {
                        literal: head.to_string(),
                        opposing: opposing.to_string(),
                        rank,
                    };
                    if !self.anomalies.contains(&anomaly) {
                        warn!("{}", anomaly);
                        self.anomalies.push(anomaly);
                    }
                    return MergeOutcome::Blocked;
                }
                ConflictOutcome::Unjustified => {
                    trace!("{} blocked by unjustified fact {}", head, opposing);
                    return MergeOutcome::Blocked;
                }
            }
        }

        self.graph.justify(
            &head,
            Justification {
                rule: rule.name.clone(),
                rank,
                instance,
                premises: grounded
                    .body
                    .iter()
                    .filter(|l| !l.kind.is_deferred())
                    .map(|l| l.to_string())
                    .collect(),
            },
        );
        let added = self.facts.insert(head);
        if replaced {
            MergeOutcome::Replaced
        } else if added {
            trace!("round {}: derived via {}", self.round, rule.name);
            MergeOutcome::Added
        } else {
            MergeOutcome::Known
        }
    }

    pub fn into_result(self) -> InferenceResult {
        InferenceResult {
            facts: self.facts,
            graph: self.graph,
            rounds: self.round,
            retractions: self.retractions,
            anomalies: self.anomalies,
        }
    }
}

impl Reasoner {
    /// Forward chaining to a fixpoint, using the configured operation mode.
    pub fn infer(&self, context: &[Literal]) -> Result<InferenceResult, InferenceError> {
        match self.config.operation_mode {
            OperationMode::SingleThread => self.infer_with_strategy(context, SequentialStrategy),
            OperationMode::MultiThread => {
                self.infer_with_strategy(context, ParallelStrategy::default())
            }
        }
    }

    pub fn infer_with_strategy<S: InferenceStrategy>(
        &self,
        context: &[Literal],
        mut strat: S,
    ) -> Result<InferenceResult, InferenceError> {
        let started = Instant::now();
        let budget = self.config.time_budget();
        let mut session = InferenceSession::new(self, context);
        info!(
            "inference started: {} rules, {} context facts",
            self.knowledge_base.len(),
            session.facts.len()
        );

        loop {
            if session.round >= self.config.max_rounds {
                warn!("no fixpoint after {} rounds, giving up", session.round);
                return Err(InferenceError::RoundLimitExceeded {
                    limit: self.config.max_rounds,
                    partial: Box::new(session.into_result()),
                });
            }
            if let Some(budget) = budget {
                if started.elapsed() > budget {
                    warn!("time budget {:?} exhausted after {} rounds", budget, session.round);
                    let rounds = session.round;
                    return Err(InferenceError::TimeBudgetExceeded {
                        budget,
                        rounds,
                        partial: Box::new(session.into_result()),
                    });
                }
            }

            let progress = session.run_round(&mut strat);
            debug!(
                "round {}: {} facts, {} retractions so far",
                session.round,
                session.facts.len(),
                session.retractions.len()
            );
            if !progress {
                break;
            }
        }

        info!(
            "fixpoint after {} rounds: {} facts ({} derived)",
            session.round,
            session.facts.len(),
            session.graph.len()
        );
        Ok(session.into_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::terms::Term;

    fn rule(name: &str, body: &str, head: &str, sign: bool) -> Rule {
        Rule::new(
            name,
            vec![Literal::new(body, true, vec![Term::Variable("X".into())])],
            Literal::new(head, sign, vec![Term::Variable("X".into())]),
        )
    }

    #[test]
    fn test_merge_outcomes() {
        let mut reasoner = Reasoner::new();
        reasoner.add_rule(rule("r0", "bird", "flies", true)).unwrap();
        reasoner.add_rule(rule("r1", "penguin", "flies", false)).unwrap();

        let context = vec![Literal::fact("bird", &["tweety"])];
        let mut session = InferenceSession::new(&reasoner, &context);
        let mut sub = Substitution::new();
        sub.insert("X".to_string(), "tweety".to_string());

        let r0 = reasoner.knowledge_base.rules[0].clone();
        let r1 = reasoner.knowledge_base.rules[1].clone();

        // Weaker rule first, then the stronger one replaces it.
        assert_eq!(session.merge(1, &r1, &sub), MergeOutcome::Added);
        assert_eq!(session.merge(0, &r0, &sub), MergeOutcome::Replaced);
        assert_eq!(session.merge(0, &r0, &sub), MergeOutcome::Known);
        assert_eq!(session.merge(1, &r1, &sub), MergeOutcome::Blocked);

        let result = session.into_result();
        assert!(result.contains(&Literal::fact("flies", &["tweety"])));
        assert!(!result.contains(&Literal::fact("flies", &["tweety"]).negated()));
        assert_eq!(result.retractions.len(), 1);
        assert_eq!(result.retractions[0].defeated, "-flies(tweety)");
    }

    #[test]
    fn test_contradictory_context_is_reported() {
        let reasoner = Reasoner::new();
        let p = Literal::fact("p", &[]);
        let result = reasoner.infer(&[p.clone(), p.negated()]).unwrap();
        assert_eq!(
            result.anomalies,
            vec![Anomaly::ContradictoryContext { literal: "p()".to_string() }]
        );
        assert_eq!(result.facts.len(), 2);
        assert_eq!(result.rounds, 1);
    }
}
