use rustc_hash::FxHashSet;
use serde::{Serialize, Serializer};
use shared::literal::{literals_to_string, Literal};
use std::fmt;

/// Ground literals deduplicated by structural equality.
///
/// The vector keeps insertion order so listings are stable; membership goes
/// through the hash set.
#[derive(Debug, Clone, Default)]
pub struct FactSet {
    all_facts: Vec<Literal>,
    known_facts: FxHashSet<Literal>,
}

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the literal was already present.
    pub fn insert(&mut self, literal: Literal) -> bool {
        if self.known_facts.contains(&literal) {
            return false;
        }
        self.known_facts.insert(literal.clone());
        self.all_facts.push(literal);
        true
    }

    pub fn remove(&mut self, literal: &Literal) -> bool {
        if !self.known_facts.remove(literal) {
            return false;
        }
        self.all_facts.retain(|l| l != literal);
        true
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.known_facts.contains(literal)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Literal> {
        self.all_facts.iter()
    }

    pub fn len(&self) -> usize {
        self.all_facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_facts.is_empty()
    }

    pub fn as_slice(&self) -> &[Literal] {
        &self.all_facts
    }

    pub fn into_vec(self) -> Vec<Literal> {
        self.all_facts
    }
}

impl FromIterator<Literal> for FactSet {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        let mut facts = FactSet::new();
        for literal in iter {
            facts.insert(literal);
        }
        facts
    }
}

impl<'a> IntoIterator for &'a FactSet {
    type Item = &'a Literal;
    type IntoIter = std::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.all_facts.iter()
    }
}

impl PartialEq for FactSet {
    fn eq(&self, other: &Self) -> bool {
        self.known_facts == other.known_facts
    }
}

impl Eq for FactSet {}

impl Serialize for FactSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.all_facts.iter().map(|l| l.to_string()))
    }
}

impl fmt::Display for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", literals_to_string(&self.all_facts))
    }
}
