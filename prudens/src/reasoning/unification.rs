use shared::literal::Literal;
use shared::terms::{Substitution, Term};

/// Asymmetric unification: `fact` is ground, `instance` may carry variables.
///
/// Returns the bindings the instance needs to become `fact`, possibly none.
pub fn unify(instance: &Literal, fact: &Literal) -> Option<Substitution> {
    if !instance.same_symbol(fact) {
        return None;
    }

    let mut unifier = Substitution::new();
    for (x, y) in instance.arguments.iter().zip(&fact.arguments) {
        if x.is_muted() || y.is_muted() {
            continue;
        }
        let value = y.value()?;
        match &x.term {
            Term::Constant(c) => {
                if c != value {
                    return None;
                }
            }
            Term::Variable(name) => match unifier.get(name) {
                Some(bound) if bound != value => return None,
                Some(_) => {}
                None => {
                    unifier.insert(name.clone(), value.to_string());
                }
            },
            // Expressions only occur in built-ins, which never reach a fact.
            Term::Expression(_) | Term::Muted => return None,
        }
    }
    Some(unifier)
}

/// Union of `sub` and `unifier`, or `None` when they disagree on a variable.
pub fn extend(sub: &Substitution, unifier: &Substitution) -> Option<Substitution> {
    let mut extended = sub.clone();
    for (var, value) in unifier {
        match extended.get(var) {
            Some(bound) if bound != value => return None,
            Some(_) => {}
            None => {
                extended.insert(var.clone(), value.clone());
            }
        }
    }
    Some(extended)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Term {
        Term::Variable(name.to_string())
    }

    fn constant(value: &str) -> Term {
        Term::Constant(value.to_string())
    }

    #[test]
    fn test_unify_binds_variables() {
        let instance = Literal::new("parent", true, vec![var("X"), constant("bob")]);
        let fact = Literal::fact("parent", &["ann", "bob"]);

        let unifier = unify(&instance, &fact).unwrap();
        assert_eq!(unifier.get("X").map(String::as_str), Some("ann"));
        assert_eq!(unifier.len(), 1);
    }

    #[test]
    fn test_unify_rejects_mismatches() {
        let fact = Literal::fact("parent", &["ann", "bob"]);

        // Constant clash
        let instance = Literal::new("parent", true, vec![var("X"), constant("carl")]);
        assert!(unify(&instance, &fact).is_none());

        // Polarity
        let negated = Literal::new("parent", false, vec![var("X"), var("Y")]);
        assert!(unify(&negated, &fact).is_none());

        // Arity and name
        assert!(unify(&Literal::new("parent", true, vec![var("X")]), &fact).is_none());
        assert!(unify(&Literal::new("child", true, vec![var("X"), var("Y")]), &fact).is_none());
    }

    #[test]
    fn test_repeated_variable_must_agree() {
        let instance = Literal::new("edge", true, vec![var("X"), var("X")]);
        assert!(unify(&instance, &Literal::fact("edge", &["a", "b"])).is_none());

        let loop_edge = unify(&instance, &Literal::fact("edge", &["a", "a"])).unwrap();
        assert_eq!(loop_edge.get("X").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_muted_arguments_bind_nothing() {
        let instance = Literal::new("edge", true, vec![Term::Muted, var("Y")]);
        let unifier = unify(&instance, &Literal::fact("edge", &["a", "b"])).unwrap();
        assert_eq!(unifier.len(), 1);
        assert!(unifier.get("_").is_none());
    }

    #[test]
    fn test_extend_detects_conflicts() {
        let mut sub = Substitution::new();
        sub.insert("X".to_string(), "a".to_string());

        let mut agreeing = Substitution::new();
        agreeing.insert("X".to_string(), "a".to_string());
        agreeing.insert("Y".to_string(), "b".to_string());
        let merged = extend(&sub, &agreeing).unwrap();
        assert_eq!(merged.len(), 2);

        let mut clashing = Substitution::new();
        clashing.insert("X".to_string(), "c".to_string());
        assert!(extend(&sub, &clashing).is_none());
    }
}
