/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;
use thiserror::Error;

use crate::reasoning::InferenceResult;

/// Which text a syntax error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    KnowledgeBase,
    Context,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::KnowledgeBase => write!(f, "knowledge base"),
            SourceKind::Context => write!(f, "context"),
        }
    }
}

/// Malformed input text. Aborts the run before any inference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error in {kind}: {message}")]
    Syntax { kind: SourceKind, message: String },
    #[error("found more than one @KnowledgeBase decorator")]
    MultipleKnowledgeBaseDecorators,
    #[error("context literal `{0}` is not ground; every argument must be a constant")]
    NonGroundContext(String),
}

/// Rejected at rule registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("rule `{rule}`: head variable `{variable}` is never bound by the body")]
    UnboundHeadVariable { rule: String, variable: String },
    #[error("rule name `{0}` is already taken")]
    DuplicateRuleName(String),
    #[error("rule `{rule}`: `{head}` cannot be used as a head")]
    InvalidHead { rule: String, head: String },
    #[error("rule `{rule}`: built-in `{literal}` takes exactly two arguments")]
    BuiltinArity { rule: String, literal: String },
}

/// Per-literal evaluation failure. These fail closed: the candidate
/// substitution is dropped and inference carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("predicate `{predicate}` expects {expected} arguments, got {found}")]
    PredicateArityMismatch {
        predicate: String,
        expected: usize,
        found: usize,
    },
    #[error("no procedural predicate named `{0}` is registered")]
    UnknownPredicate(String),
    #[error("`{0}`: neither side can be resolved")]
    UnresolvableEquality(String),
    #[error("`{literal}`: variable `{variable}` is unbound")]
    UnboundArgument { literal: String, variable: String },
    #[error("`{literal}`: `{value}` is not a number")]
    NonNumericOperand { literal: String, value: String },
    #[error("`{0}`: division by zero")]
    DivisionByZero(String),
}

impl EvaluationError {
    /// True when a later equality binding could still make the literal evaluable.
    pub fn awaits_binding(&self) -> bool {
        matches!(
            self,
            EvaluationError::UnresolvableEquality(_) | EvaluationError::UnboundArgument { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("no fixpoint after {limit} rounds")]
    RoundLimitExceeded {
        limit: usize,
        partial: Box<InferenceResult>,
    },
    #[error("time budget of {budget:?} exhausted after {rounds} rounds")]
    TimeBudgetExceeded {
        budget: Duration,
        rounds: usize,
        partial: Box<InferenceResult>,
    },
}

impl InferenceError {
    /// Whatever had been derived when the budget ran out.
    pub fn partial(&self) -> &InferenceResult {
        match self {
            InferenceError::RoundLimitExceeded { partial, .. } => partial,
            InferenceError::TimeBudgetExceeded { partial, .. } => partial,
        }
    }
}

/// Everything that can stop a run, from text to fixpoint.
#[derive(Debug, Error)]
pub enum PrudensError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
