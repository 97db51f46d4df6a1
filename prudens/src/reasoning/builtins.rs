/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Deferred body literals: `?=`, `?<` and host procedural predicates.
//!
//! Every check answers `Ok(Some(sub))` when it holds (possibly with new
//! bindings), `Ok(None)` when it is simply false, and `Err` when it cannot be
//! evaluated at all. Callers treat `Err` as false.

use shared::literal::{Literal, LiteralKind};
use shared::terms::{numeric_value, Argument, Expression, Operator, Substitution, Term};

use crate::error::EvaluationError;
use crate::reasoning::predicates::{PredicateArgs, PredicateTable};

/// How one side of a built-in looks under the current substitution.
enum Side {
    Value(String),
    Unbound(String),
    Pending(String),
}

/// Runs the deferred literals, threading equality bindings through. A literal
/// still waiting on a binding is retried after the others until a pass binds
/// nothing new.
pub fn evaluate_deferred(
    literals: &[&Literal],
    mut sub: Substitution,
    predicates: &PredicateTable,
) -> Result<Option<Substitution>, EvaluationError> {
    let mut pending: Vec<&Literal> = literals.to_vec();
    loop {
        let mut waiting = Vec::new();
        let mut last_error = None;
        for literal in pending.iter().copied() {
            match deferred_check(literal, &sub, predicates) {
                Ok(Some(next)) => sub = next,
                Ok(None) => return Ok(None),
                Err(err) if err.awaits_binding() => {
                    waiting.push(literal);
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        match last_error {
            None => return Ok(Some(sub)),
            Some(err) if waiting.len() == pending.len() => return Err(err),
            Some(_) => pending = waiting,
        }
    }
}

fn deferred_check(
    literal: &Literal,
    sub: &Substitution,
    predicates: &PredicateTable,
) -> Result<Option<Substitution>, EvaluationError> {
    match literal.kind {
        LiteralKind::Equality => equality_check(literal, sub.clone()),
        LiteralKind::Inequality => Ok(inequality_check(literal, sub)?.then(|| sub.clone())),
        LiteralKind::Procedural => {
            Ok(procedural_check(literal, sub, predicates)?.then(|| sub.clone()))
        }
        // Only deferred kinds are routed here.
        _ => Ok(Some(sub.clone())),
    }
}

/// `?=(L, R)`: compares two resolved sides, or binds the single unbound variable.
/// A negated equality only compares.
pub fn equality_check(
    literal: &Literal,
    sub: Substitution,
) -> Result<Option<Substitution>, EvaluationError> {
    let (left, right) = builtin_sides(literal, &sub)?;

    match (left, right) {
        (Side::Value(l), Side::Value(r)) => {
            Ok((values_equal(&l, &r) == literal.sign).then_some(sub))
        }
        (Side::Unbound(var), Side::Value(value)) | (Side::Value(value), Side::Unbound(var))
            if literal.sign =>
        {
            let mut extended = sub;
            extended.insert(var, value);
            Ok(Some(extended))
        }
        _ => Err(EvaluationError::UnresolvableEquality(literal.to_string())),
    }
}

/// `?<(L, R)`: both sides must resolve to numbers.
pub fn inequality_check(literal: &Literal, sub: &Substitution) -> Result<bool, EvaluationError> {
    let (left, right) = builtin_sides(literal, sub)?;
    let l = numeric_side(literal, left)?;
    let r = numeric_side(literal, right)?;
    Ok((l < r) == literal.sign)
}

/// `?name(...)`: binds every formal parameter and asks the host.
pub fn procedural_check(
    literal: &Literal,
    sub: &Substitution,
    predicates: &PredicateTable,
) -> Result<bool, EvaluationError> {
    let predicate = predicates
        .get(&literal.name)
        .ok_or_else(|| EvaluationError::UnknownPredicate(literal.name.clone()))?;

    if predicate.parameters.len() != literal.arity() {
        return Err(EvaluationError::PredicateArityMismatch {
            predicate: literal.name.clone(),
            expected: predicate.parameters.len(),
            found: literal.arity(),
        });
    }

    let mut values = Vec::with_capacity(literal.arity());
    for (parameter, arg) in predicate.parameters.iter().zip(&literal.arguments) {
        match resolve(literal, arg, sub)? {
            Side::Value(v) => values.push((parameter.clone(), v)),
            Side::Unbound(variable) | Side::Pending(variable) => {
                return Err(EvaluationError::UnboundArgument {
                    literal: literal.to_string(),
                    variable,
                })
            }
        }
    }

    let holds = (predicate.body)(&PredicateArgs::new(values));
    Ok(holds == literal.sign)
}

fn builtin_sides(literal: &Literal, sub: &Substitution) -> Result<(Side, Side), EvaluationError> {
    match literal.arguments.as_slice() {
        [left, right] => Ok((resolve(literal, left, sub)?, resolve(literal, right, sub)?)),
        _ => Err(EvaluationError::UnresolvableEquality(literal.to_string())),
    }
}

fn resolve(literal: &Literal, arg: &Argument, sub: &Substitution) -> Result<Side, EvaluationError> {
    match &arg.term {
        Term::Constant(c) => Ok(Side::Value(c.clone())),
        Term::Variable(v) => Ok(match sub.get(v) {
            Some(value) => Side::Value(value.clone()),
            None => Side::Unbound(v.clone()),
        }),
        Term::Muted => Ok(Side::Pending("_".to_string())),
        Term::Expression(expr) => {
            let mut vars = Vec::new();
            expr.variables(&mut vars);
            match vars.into_iter().find(|v| !sub.contains_key(v)) {
                Some(missing) => Ok(Side::Pending(missing)),
                None => {
                    let value = evaluate_expression(literal, &expr.apply(sub))?;
                    if !value.is_finite() {
                        return Err(EvaluationError::NonNumericOperand {
                            literal: literal.to_string(),
                            value: value.to_string(),
                        });
                    }
                    Ok(Side::Value(format_number(value)))
                }
            }
        }
    }
}

fn numeric_side(literal: &Literal, side: Side) -> Result<f64, EvaluationError> {
    match side {
        Side::Value(v) => parse_number(literal, &v),
        Side::Unbound(variable) | Side::Pending(variable) => Err(EvaluationError::UnboundArgument {
            literal: literal.to_string(),
            variable,
        }),
    }
}

fn parse_number(literal: &Literal, value: &str) -> Result<f64, EvaluationError> {
    numeric_value(value).ok_or_else(|| EvaluationError::NonNumericOperand {
        literal: literal.to_string(),
        value: value.to_string(),
    })
}

/// Evaluates a ground arithmetic expression.
pub fn evaluate_expression(literal: &Literal, expr: &Expression) -> Result<f64, EvaluationError> {
    match expr {
        Expression::Constant(c) => parse_number(literal, c),
        Expression::Variable(v) => Err(EvaluationError::UnboundArgument {
            literal: literal.to_string(),
            variable: v.clone(),
        }),
        Expression::Negate(inner) => Ok(-evaluate_expression(literal, inner)?),
        Expression::Binary(op, lhs, rhs) => {
            let l = evaluate_expression(literal, lhs)?;
            let r = evaluate_expression(literal, rhs)?;
            match op {
                Operator::Add => Ok(l + r),
                Operator::Subtract => Ok(l - r),
                Operator::Multiply => Ok(l * r),
                Operator::Divide | Operator::Remainder if r == 0.0 => {
                    Err(EvaluationError::DivisionByZero(literal.to_string()))
                }
                Operator::Divide => Ok(l / r),
                Operator::Remainder => Ok(l % r),
            }
        }
    }
}

/// Numbers compare by value, everything else by text.
pub fn values_equal(left: &str, right: &str) -> bool {
    match (numeric_value(left), numeric_value(right)) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}

/// Integral results print without a fractional part, so `3 + 1` gives `4`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
