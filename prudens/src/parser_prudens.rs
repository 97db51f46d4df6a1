/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Text front end for knowledge bases and contexts.
//!
//! ```text
//! <imports>
//! @KnowledgeBase
//! r0 :: bird(X) implies flies(X);
//! r1 :: penguin(X), ?=(Y, 2 * X) implies -flies(X);
//! @Code
//! <host code, kept verbatim>
//! ```

use log::{debug, warn};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{all_consuming, cut, map, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use serde::Serialize;
use shared::literal::{Literal, LiteralKind, EQUALITY_NAME, INEQUALITY_NAME};
use shared::rule::{KnowledgeBase, Rule};
use shared::terms::{Expression, Operator, Term};
use std::fmt;

use crate::custom_error::format_section_error;
use crate::error::{ParseError, SourceKind};

pub const KNOWLEDGE_BASE_DECORATOR: &str = "@KnowledgeBase";
pub const CODE_DECORATOR: &str = "@Code";

/// Non-fatal findings about a knowledge-base document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    CodeNotFound,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::CodeNotFound => write!(
                f,
                "CodeNotFound: the @Code section is empty; it is meant for host predicate definitions"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedKnowledgeBase {
    /// Free text above `@KnowledgeBase`, trimmed.
    pub imports: String,
    pub rules: Vec<Rule>,
    /// Text below `@Code`, trimmed. Never executed.
    pub code: Option<String>,
    pub warnings: Vec<Warning>,
}

impl ParsedKnowledgeBase {
    pub fn knowledge_base(&self) -> KnowledgeBase {
        KnowledgeBase {
            rules: self.rules.clone(),
        }
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

// [a-z]\w*
fn predicate_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(|c| c.is_ascii_lowercase()), take_while(is_word)))(input)
}

// 3.25, or [a-z0-9]\w* (which also covers plain integers)
fn constant(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(tuple((digit1, char('.'), digit0))),
        recognize(pair(
            satisfy(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
            take_while(is_word),
        )),
    ))(input)
}

// [A-Z_]\w*
fn variable(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_uppercase() || c == '_'),
        take_while(is_word),
    ))(input)
}

fn parse_term(input: &str) -> IResult<&str, Term> {
    alt((
        map(constant, |c: &str| Term::Constant(c.to_string())),
        map(variable, |v: &str| {
            if v == "_" {
                Term::Muted
            } else {
                Term::Variable(v.to_string())
            }
        }),
    ))(input)
}

fn parse_atom(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        delimited(char('('), parse_expression, char(')')),
        map(preceded(char('-'), parse_atom), |e| Expression::Negate(Box::new(e))),
        map(constant, |c: &str| Expression::Constant(c.to_string())),
        map(variable, |v: &str| Expression::Variable(v.to_string())),
    )))(input)
}

fn fold_binary(first: Expression, rest: Vec<(char, Expression)>) -> Expression {
    rest.into_iter().fold(first, |lhs, (symbol, rhs)| {
        let op = match symbol {
            '+' => Operator::Add,
            '-' => Operator::Subtract,
            '*' => Operator::Multiply,
            '/' => Operator::Divide,
            _ => Operator::Remainder,
        };
        Expression::Binary(op, Box::new(lhs), Box::new(rhs))
    })
}

fn parse_factor(input: &str) -> IResult<&str, Expression> {
    let (input, first) = parse_atom(input)?;
    let (input, rest) = many0(pair(one_of("*/%"), parse_atom))(input)?;
    Ok((input, fold_binary(first, rest)))
}

/// Arithmetic with the usual precedence; only legal inside `?=` and `?<`.
pub fn parse_expression(input: &str) -> IResult<&str, Expression> {
    let (input, first) = parse_factor(input)?;
    let (input, rest) = many0(pair(one_of("+-"), parse_factor))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn literal_name(input: &str) -> IResult<&str, &str> {
    alt((
        tag(EQUALITY_NAME),
        tag(INEQUALITY_NAME),
        recognize(pair(one_of("?!"), predicate_name)),
        predicate_name,
    ))(input)
}

/// `[-]name(args)`; `name()` is propositional.
pub fn parse_literal(input: &str) -> IResult<&str, Literal> {
    let (input, negated) = opt(ws(char('-')))(input)?;
    let (input, name) = ws(literal_name)(input)?;
    let (input, _) = char('(')(input)?;
    let (input, terms) = if name == EQUALITY_NAME || name == INEQUALITY_NAME {
        separated_list1(char(','), map(parse_expression, Term::from))(input)?
    } else {
        separated_list0(char(','), ws(parse_term))(input)?
    };
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, Literal::new(name, negated.is_none(), terms)))
}

fn parse_body_literal(input: &str) -> IResult<&str, Literal> {
    let start = input;
    let (input, literal) = parse_literal(input)?;
    if literal.kind == LiteralKind::Action {
        let start = start.trim_start();
        return Err(nom::Err::Failure(NomError::new(start, ErrorKind::Verify)));
    }
    Ok((input, literal))
}

fn rule_name(input: &str) -> IResult<&str, &str> {
    take_while1(is_word)(input)
}

/// `name :: body implies head;`
pub fn parse_rule(input: &str) -> IResult<&str, Rule> {
    let (input, name) = ws(rule_name)(input)?;
    let (input, _) = tag("::")(input)?;
    let (input, (body, head)) = cut(pair(
        separated_list1(char(','), parse_body_literal),
        delimited(ws(tag("implies")), parse_literal, ws(char(';'))),
    ))(input)?;
    Ok((input, Rule::new(name, body, head)))
}

fn parse_rules(input: &str) -> IResult<&str, Vec<Rule>> {
    all_consuming(terminated(many0(parse_rule), multispace0))(input)
}

fn parse_context_literals(input: &str) -> IResult<&str, Vec<Literal>> {
    all_consuming(terminated(
        many0(terminated(parse_literal, ws(char(';')))),
        multispace0,
    ))(input)
}

/// Parses a whole document: optional imports and `@KnowledgeBase`, the rules,
/// and an optional `@Code` section.
pub fn parse_knowledge_base(document: &str) -> Result<ParsedKnowledgeBase, ParseError> {
    // The code section is verbatim text; decorators inside it are not ours.
    let (head, code) = match document.split_once(CODE_DECORATOR) {
        Some((head, code)) => (head, Some(code.trim())),
        None => (document, None),
    };
    if head.matches(KNOWLEDGE_BASE_DECORATOR).count() > 1 {
        return Err(ParseError::MultipleKnowledgeBaseDecorators);
    }

    let (imports, rules_text) = match head.split_once(KNOWLEDGE_BASE_DECORATOR) {
        Some((imports, rules)) => (imports.trim(), rules),
        None => ("", head),
    };

    let mut warnings = Vec::new();
    if code == Some("") {
        warn!("{}", Warning::CodeNotFound);
        warnings.push(Warning::CodeNotFound);
    }

    let rules = match parse_rules(rules_text) {
        Ok((_, rules)) => rules,
        Err(err) => {
            return Err(ParseError::Syntax {
                kind: SourceKind::KnowledgeBase,
                message: format_section_error(document, rules_text, err),
            })
        }
    };
    debug!("parsed {} rules", rules.len());

    Ok(ParsedKnowledgeBase {
        imports: imports.to_string(),
        rules,
        code: code.map(str::to_string),
        warnings,
    })
}

/// Parses `l1; l2; ...`. Every literal must be ground.
pub fn parse_context(text: &str) -> Result<Vec<Literal>, ParseError> {
    let literals = match parse_context_literals(text) {
        Ok((_, literals)) => literals,
        Err(err) => {
            return Err(ParseError::Syntax {
                kind: SourceKind::Context,
                message: format_section_error(text, text, err),
            })
        }
    };

    for literal in &literals {
        let plain = matches!(
            literal.kind,
            LiteralKind::Relational | LiteralKind::Propositional
        );
        if !plain || !literal.is_ground() {
            return Err(ParseError::NonGroundContext(literal.to_string()));
        }
    }
    debug!("parsed {} context facts", literals.len());
    Ok(literals)
}
