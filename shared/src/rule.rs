use crate::literal::{Literal, LiteralKind};
use crate::terms::{Substitution, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub body: Vec<Literal>,
    pub head: Literal,
    /// Explicit rank; when absent the rule ranks by its position.
    pub priority: Option<usize>,
}

impl Rule {
    pub fn new(name: &str, body: Vec<Literal>, head: Literal) -> Self {
        Self {
            name: name.to_string(),
            body,
            head,
            priority: None,
        }
    }

    pub fn with_priority(mut self, rank: usize) -> Self {
        self.priority = Some(rank);
        self
    }

    /// Variables some body literal can bind: relational arguments, then any
    /// bare variable on one side of a positive equality once every variable
    /// on the other side is bindable, repeated until nothing changes.
    pub fn bindable_variables(&self) -> BTreeSet<String> {
        let mut vars: BTreeSet<String> = self
            .body
            .iter()
            .filter(|literal| literal.kind == LiteralKind::Relational)
            .flat_map(|literal| literal.variables())
            .collect();

        let equalities: Vec<&Literal> = self
            .body
            .iter()
            .filter(|literal| literal.kind == LiteralKind::Equality && literal.sign)
            .collect();

        loop {
            let before = vars.len();
            for literal in &equalities {
                if let [left, right] = literal.arguments.as_slice() {
                    for (target, source) in [(&left.term, &right.term), (&right.term, &left.term)] {
                        let Term::Variable(v) = target else { continue };
                        let mut needed = Vec::new();
                        source.variables(&mut needed);
                        if needed.iter().all(|n| vars.contains(n)) {
                            vars.insert(v.clone());
                        }
                    }
                }
            }
            if vars.len() == before {
                return vars;
            }
        }
    }

    /// Head variables the body can never bind; `_` counts as unbound.
    pub fn unbound_head_variables(&self) -> Vec<String> {
        let bindable = self.bindable_variables();
        let mut unbound = Vec::new();
        for arg in &self.head.arguments {
            match &arg.term {
                Term::Variable(v) if !bindable.contains(v) => unbound.push(v.clone()),
                Term::Muted => unbound.push("_".to_string()),
                _ => {}
            }
        }
        unbound
    }

    /// The rule instance under `sub`, used as a justification.
    pub fn apply(&self, sub: &Substitution) -> Rule {
        Rule {
            name: self.name.clone(),
            body: self.body.iter().map(|l| l.apply(sub)).collect(),
            head: self.head.apply(sub),
            priority: self.priority,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: ", self.name)?;
        for (i, literal) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", literal)?;
        }
        write!(f, " implies {};", self.head)
    }
}

/// Rules in priority order: index 0 wins every conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub rules: Vec<Rule>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Effective rank of the rule at `index`; lower is stronger.
    pub fn rank_of(&self, index: usize) -> usize {
        self.rules
            .get(index)
            .and_then(|r| r.priority)
            .unwrap_or(index)
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}
