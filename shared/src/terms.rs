/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Single solution mapping: variable name -> ground value.
pub type Substitution = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Remainder => "%",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide | Operator::Remainder => 2,
        }
    }
}

/// Arithmetic expression, only found inside `?=` / `?<` literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    Variable(String),
    Constant(String),
    Negate(Box<Expression>),
    Binary(Operator, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn variables(&self, out: &mut Vec<String>) {
        match self {
            Expression::Variable(v) => out.push(v.clone()),
            Expression::Constant(_) => {}
            Expression::Negate(inner) => inner.variables(out),
            Expression::Binary(_, lhs, rhs) => {
                lhs.variables(out);
                rhs.variables(out);
            }
        }
    }

    pub fn apply(&self, sub: &Substitution) -> Expression {
        match self {
            Expression::Variable(v) => match sub.get(v) {
                Some(value) => Expression::Constant(value.clone()),
                None => self.clone(),
            },
            Expression::Constant(_) => self.clone(),
            Expression::Negate(inner) => Expression::Negate(Box::new(inner.apply(sub))),
            Expression::Binary(op, lhs, rhs) => {
                Expression::Binary(*op, Box::new(lhs.apply(sub)), Box::new(rhs.apply(sub)))
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expression::Binary(op, _, _) => op.precedence(),
            Expression::Negate(_) => 3,
            _ => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parenthesise: bool) -> fmt::Result {
        if parenthesise {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Variable(v) => write!(f, "{}", v),
            Expression::Constant(c) => write!(f, "{}", c),
            Expression::Negate(inner) => {
                write!(f, "-")?;
                inner.fmt_operand(f, inner.precedence() < 3)
            }
            Expression::Binary(op, lhs, rhs) => {
                let p = op.precedence();
                lhs.fmt_operand(f, lhs.precedence() < p)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_operand(f, rhs.precedence() <= p)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Variable(String),
    Constant(String),
    /// The anonymous `_` slot.
    Muted,
    Expression(Expression),
}

impl Term {
    pub fn is_assigned(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// Variables the term needs bound before it has a value. A muted slot
    /// never has one, so it reports as `_`.
    pub fn variables(&self, out: &mut Vec<String>) {
        match self {
            Term::Variable(v) => out.push(v.clone()),
            Term::Muted => out.push("_".to_string()),
            Term::Expression(e) => e.variables(out),
            Term::Constant(_) => {}
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Term::Constant(c) => Some(c),
            _ => None,
        }
    }
}

/// Reads `text` as a number when it has the shape of a numeric constant,
/// `-?\d+(\.\d*)?`. Symbols such as `nan` or `inf` stay symbols.
pub fn numeric_value(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    let well_formed = !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl From<Expression> for Term {
    fn from(expr: Expression) -> Self {
        match expr {
            Expression::Variable(v) if v == "_" => Term::Muted,
            Expression::Variable(v) => Term::Variable(v),
            Expression::Constant(c) => Term::Constant(c),
            other => Term::Expression(other),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Constant(c) => write!(f, "{}", c),
            Term::Muted => write!(f, "_"),
            Term::Expression(e) => write!(f, "{}", e),
        }
    }
}

/// A positional argument of a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub index: usize,
    pub term: Term,
}

impl Argument {
    pub fn new(index: usize, term: Term) -> Self {
        Self { index, term }
    }

    pub fn is_assigned(&self) -> bool {
        self.term.is_assigned()
    }

    pub fn is_muted(&self) -> bool {
        matches!(self.term, Term::Muted)
    }

    pub fn value(&self) -> Option<&str> {
        self.term.value()
    }

    /// Replaces a bound variable (or the variables of an expression) by its value.
    pub fn apply(&self, sub: &Substitution) -> Argument {
        let term = match &self.term {
            Term::Variable(v) => match sub.get(v) {
                Some(value) => Term::Constant(value.clone()),
                None => self.term.clone(),
            },
            Term::Expression(e) => Term::from(e.apply(sub)),
            _ => self.term.clone(),
        };
        Argument { index: self.index, term }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(op: Operator, lhs: Expression, rhs: Expression) -> Expression {
        Expression::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    #[test]
    fn test_expression_display_keeps_grouping() {
        let x = Expression::Variable("X".to_string());
        let one = Expression::Constant("1".to_string());
        let two = Expression::Constant("2".to_string());

        let sum = binary(Operator::Add, x.clone(), one.clone());
        assert_eq!(sum.to_string(), "X + 1");

        let scaled = binary(Operator::Multiply, sum.clone(), two.clone());
        assert_eq!(scaled.to_string(), "(X + 1) * 2");

        let right_nested = binary(Operator::Subtract, two, sum);
        assert_eq!(right_nested.to_string(), "2 - (X + 1)");

        let negated = Expression::Negate(Box::new(binary(Operator::Add, x, one)));
        assert_eq!(negated.to_string(), "-(X + 1)");
    }

    #[test]
    fn test_apply_grounds_expression_variables() {
        let mut sub = Substitution::new();
        sub.insert("X".to_string(), "3".to_string());

        let arg = Argument::new(
            1,
            Term::Expression(binary(
                Operator::Add,
                Expression::Variable("X".to_string()),
                Expression::Constant("1".to_string()),
            )),
        );
        assert_eq!(arg.apply(&sub).to_string(), "3 + 1");

        let plain = Argument::new(0, Term::Variable("X".to_string()));
        assert_eq!(plain.apply(&sub).term, Term::Constant("3".to_string()));

        let muted = Argument::new(0, Term::Muted);
        assert!(muted.apply(&sub).is_muted());
    }

    #[test]
    fn test_numeric_value_follows_constant_shape() {
        assert_eq!(numeric_value("42"), Some(42.0));
        assert_eq!(numeric_value("-3.5"), Some(-3.5));
        assert_eq!(numeric_value("7."), Some(7.0));

        for symbol in ["nan", "inf", "infinity", "1e5", "-", ".5", "tweety", ""] {
            assert_eq!(numeric_value(symbol), None, "{}", symbol);
        }
    }
}
