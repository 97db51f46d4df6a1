/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */
use crate::terms::{Argument, Substitution, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EQUALITY_NAME: &str = "?=";
pub const INEQUALITY_NAME: &str = "?<";

/// Fixed once when the literal is built, from its name marker and arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    Relational,
    Propositional,
    /// Head marked with `!`; carried into the fact set, never executed.
    Action,
    /// `?name(...)`, evaluated by a host-registered predicate.
    Procedural,
    Equality,
    Inequality,
}

impl LiteralKind {
    pub fn is_deferred(&self) -> bool {
        matches!(
            self,
            LiteralKind::Procedural | LiteralKind::Equality | LiteralKind::Inequality
        )
    }
}

/// A signed, named predicate application.
///
/// `name` never carries the `?` / `!` markers of procedural and action
/// literals; those live in `kind` and come back in the canonical string.
/// Built-ins keep their reserved names `?=` and `?<`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub name: String,
    pub sign: bool,
    pub kind: LiteralKind,
    pub arguments: Vec<Argument>,
}

impl Literal {
    /// Builds a literal from its source name (markers included) and terms.
    pub fn new(name: &str, sign: bool, terms: Vec<Term>) -> Self {
        let arguments: Vec<Argument> = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| Argument::new(i, t))
            .collect();

        let (kind, name) = if name == EQUALITY_NAME {
            (LiteralKind::Equality, name)
        } else if name == INEQUALITY_NAME {
            (LiteralKind::Inequality, name)
        } else if let Some(stripped) = name.strip_prefix('?') {
            (LiteralKind::Procedural, stripped)
        } else if let Some(stripped) = name.strip_prefix('!') {
            (LiteralKind::Action, stripped)
        } else if arguments.is_empty() {
            (LiteralKind::Propositional, name)
        } else {
            (LiteralKind::Relational, name)
        };

        Literal {
            name: name.to_string(),
            sign,
            kind,
            arguments,
        }
    }

    /// Positive ground literal over constants, mostly for building contexts in code.
    pub fn fact(name: &str, values: &[&str]) -> Self {
        Self::new(
            name,
            true,
            values.iter().map(|v| Term::Constant(v.to_string())).collect(),
        )
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_ground(&self) -> bool {
        self.arguments.iter().all(|a| a.is_assigned())
    }

    pub fn negated(&self) -> Literal {
        Literal {
            sign: !self.sign,
            ..self.clone()
        }
    }

    /// Same predicate symbol: name, sign, arity and kind.
    pub fn same_symbol(&self, other: &Literal) -> bool {
        self.name == other.name
            && self.sign == other.sign
            && self.kind == other.kind
            && self.arity() == other.arity()
    }

    pub fn apply(&self, sub: &Substitution) -> Literal {
        Literal {
            arguments: self.arguments.iter().map(|a| a.apply(sub)).collect(),
            ..self.clone()
        }
    }

    /// Variables in argument order, duplicates kept; expression variables included.
    pub fn variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        for arg in &self.arguments {
            match &arg.term {
                Term::Variable(v) => out.push(v.clone()),
                Term::Expression(e) => e.variables(&mut out),
                _ => {}
            }
        }
        out
    }

    fn marker(&self) -> &'static str {
        match self.kind {
            LiteralKind::Procedural => "?",
            LiteralKind::Action => "!",
            _ => "",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.sign {
            write!(f, "-")?;
        }
        write!(f, "{}{}(", self.marker(), self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

/// `l1; l2; l3;`
pub fn literals_to_string<'a, I>(literals: I) -> String
where
    I: IntoIterator<Item = &'a Literal>,
{
    literals
        .into_iter()
        .map(|l| format!("{};", l))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_taken_from_markers() {
        assert_eq!(Literal::new("?=", true, vec![Term::Muted, Term::Muted]).kind, LiteralKind::Equality);
        assert_eq!(Literal::new("?<", true, vec![Term::Muted, Term::Muted]).kind, LiteralKind::Inequality);

        let procedural = Literal::new("?even", true, vec![Term::Variable("X".into())]);
        assert_eq!(procedural.kind, LiteralKind::Procedural);
        assert_eq!(procedural.name, "even");

        let action = Literal::new("!notify", true, vec![Term::Constant("bob".into())]);
        assert_eq!(action.kind, LiteralKind::Action);
        assert_eq!(action.to_string(), "!notify(bob)");

        assert_eq!(Literal::new("raining", true, vec![]).kind, LiteralKind::Propositional);
    }

    #[test]
    fn test_canonical_string() {
        let lit = Literal::new(
            "parent",
            false,
            vec![Term::Variable("X".into()), Term::Constant("ann".into()), Term::Muted],
        );
        assert_eq!(lit.to_string(), "-parent(X, ann, _)");
        assert_eq!(Literal::new("raining", true, vec![]).to_string(), "raining()");

        let facts = vec![Literal::fact("bird", &["tweety"]), Literal::fact("p", &[])];
        assert_eq!(literals_to_string(&facts), "bird(tweety); p();");
    }

    #[test]
    fn test_deep_equality_tracks_sign_and_values() {
        let a = Literal::fact("flies", &["tweety"]);
        let b = Literal::fact("flies", &["tweety"]);
        assert_eq!(a, b);
        assert_ne!(a, a.negated());
        assert_ne!(a, Literal::fact("flies", &["polly"]));
    }
}
