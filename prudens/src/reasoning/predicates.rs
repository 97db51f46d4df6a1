use shared::terms::numeric_value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Values handed to a procedural predicate, one per formal parameter, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateArgs {
    values: Vec<(String, String)>,
}

impl PredicateArgs {
    pub fn new(values: Vec<(String, String)>) -> Self {
        Self { values }
    }

    /// Value bound to the formal parameter `parameter`.
    pub fn get(&self, parameter: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(p, _)| p == parameter)
            .map(|(_, v)| v.as_str())
    }

    pub fn number(&self, parameter: &str) -> Option<f64> {
        self.get(parameter).and_then(numeric_value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub type PredicateFn = dyn Fn(&PredicateArgs) -> bool + Send + Sync;

#[derive(Clone)]
pub struct RegisteredPredicate {
    pub parameters: Vec<String>,
    pub body: Arc<PredicateFn>,
}

impl fmt::Debug for RegisteredPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredPredicate")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Host-supplied boolean tests for `?name(...)` literals.
#[derive(Debug, Clone, Default)]
pub struct PredicateTable {
    predicates: HashMap<String, RegisteredPredicate>,
}

impl PredicateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) `name`. The name is given without the `?` marker.
    pub fn register<F>(&mut self, name: &str, parameters: &[&str], body: F)
    where
        F: Fn(&PredicateArgs) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(
            name.trim_start_matches('?').to_string(),
            RegisteredPredicate {
                parameters: parameters.iter().map(|p| p.to_string()).collect(),
                body: Arc::new(body),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredPredicate> {
        self.predicates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}
