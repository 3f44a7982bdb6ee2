//! One-way matching and instantiation.
//!
//! Only the pattern side binds. Candidates are expected to be ground; a
//! variable on the candidate side is treated as an opaque value.

use crate::bindings::Bindings;
use crate::term::{Statement, Term};

/// Match `pattern` against `candidate`.
///
/// Returns `None` when the predicates or arities differ, when a pattern
/// constant meets a different term, or when a repeated pattern variable
/// would have to bind to two different terms.
pub fn match_statements(pattern: &Statement, candidate: &Statement) -> Option<Bindings> {
    if pattern.predicate() != candidate.predicate() || pattern.arity() != candidate.arity() {
        return None;
    }

    let mut bindings = Bindings::new();
    for (p, c) in pattern.terms().iter().zip(candidate.terms()) {
        if !match_term(p, c, &mut bindings) {
            return None;
        }
    }
    Some(bindings)
}

fn match_term(pattern: &Term, candidate: &Term, bindings: &mut Bindings) -> bool {
    match pattern {
        Term::Variable(name) => bindings.bind(name, candidate.clone()),
        Term::Constant(_) => pattern == candidate,
    }
}

/// Substitute every bound variable in `statement`.
///
/// Variables missing from `bindings` are kept, so the remaining antecedents of
/// a partially matched rule stay open for later matches.
pub fn instantiate(statement: &Statement, bindings: &Bindings) -> Statement {
    let terms = statement.terms().iter().map(|term| match term {
        Term::Variable(name) => bindings.get(name).cloned().unwrap_or_else(|| term.clone()),
        Term::Constant(_) => term.clone(),
    });
    Statement::new(statement.predicate(), terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(text: &str) -> Statement {
        Statement::from_tokens(text.split_whitespace()).unwrap()
    }

    #[test]
    fn test_match_binds_pattern_variables() {
        let bindings = match_statements(&stmt("isa ?x block"), &stmt("isa cube block")).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get("x"), Some(&Term::constant("cube")));
    }

    #[test]
    fn test_match_ground_equal_statements() {
        let bindings = match_statements(&stmt("on a b"), &stmt("on a b")).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_match_fails_on_predicate_or_arity() {
        assert!(match_statements(&stmt("on ?x b"), &stmt("under a b")).is_none());
        assert!(match_statements(&stmt("on ?x"), &stmt("on a b")).is_none());
    }

    #[test]
    fn test_match_fails_on_constant_mismatch() {
        assert!(match_statements(&stmt("on ?x table"), &stmt("on a b")).is_none());
    }

    #[test]
    fn test_repeated_variable_binds_consistently() {
        let pattern = stmt("same ?x ?x");
        assert!(match_statements(&pattern, &stmt("same a a")).is_some());
        assert!(match_statements(&pattern, &stmt("same a b")).is_none());
    }

    #[test]
    fn test_pattern_constant_does_not_match_candidate_variable() {
        assert!(match_statements(&stmt("on a b"), &stmt("on ?x b")).is_none());
    }

    #[test]
    fn test_pattern_variable_may_bind_to_variable() {
        let bindings = match_statements(&stmt("on ?x b"), &stmt("on ?y b")).unwrap();
        assert_eq!(bindings.get("x"), Some(&Term::var("y")));
    }

    #[test]
    fn test_instantiate_full() {
        let mut bindings = Bindings::new();
        bindings.bind("x", Term::constant("cube"));
        bindings.bind("y", Term::constant("table"));

        assert_eq!(instantiate(&stmt("on ?x ?y"), &bindings), stmt("on cube table"));
    }

    #[test]
    fn test_instantiate_partial_leaves_unbound() {
        let mut bindings = Bindings::new();
        bindings.bind("x", Term::constant("cube"));

        let result = instantiate(&stmt("on ?x ?y"), &bindings);
        assert_eq!(result, stmt("on cube ?y"));
        assert!(!result.is_ground());
    }

    #[test]
    fn test_match_then_instantiate_roundtrips_candidate() {
        let pattern = stmt("color ?obj ?c");
        let fact = stmt("color cube red");
        let bindings = match_statements(&pattern, &fact).unwrap();
        assert_eq!(instantiate(&pattern, &bindings), fact);
    }
}
