//! Term definitions - the arguments and statements the knowledge base stores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker that distinguishes a variable token from a constant token.
pub const VARIABLE_MARKER: char = '?';

/// Errors raised by the validating constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    #[error("empty token")]
    EmptyToken,

    #[error("statement has an empty predicate")]
    EmptyPredicate,

    #[error("variable marker `?` without a name")]
    EmptyVariable,
}

/// A single argument of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// An opaque atom, equal only to itself.
    Constant(String),

    /// A variable, scoped to the statement it appears in. Stored without the
    /// `?` marker.
    Variable(String),
}

impl Term {
    /// Create a constant term.
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    /// Create a variable term. `name` excludes the `?` marker.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// Classify a token: `?x` is a variable, anything else a constant.
    ///
    /// Does no validation; see [`Term::parse`].
    pub fn from_token(token: &str) -> Self {
        match token.strip_prefix(VARIABLE_MARKER) {
            Some(name) => Term::var(name),
            None => Term::constant(token),
        }
    }

    /// Like [`Term::from_token`] but rejects empty tokens and bare markers.
    pub fn parse(token: &str) -> Result<Self, TermError> {
        if token.is_empty() {
            return Err(TermError::EmptyToken);
        }
        let term = Term::from_token(token);
        if term.name().is_empty() {
            return Err(TermError::EmptyVariable);
        }
        Ok(term)
    }

    /// Check if this term is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// The constant's value or the variable's name (without the marker).
    pub fn name(&self) -> &str {
        match self {
            Term::Constant(name) | Term::Variable(name) => name,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Constant(name) => write!(f, "{}", name),
            Term::Variable(name) => write!(f, "{}{}", VARIABLE_MARKER, name),
        }
    }
}

/// A predicate applied to an ordered list of terms.
///
/// Equality is structural: same predicate, same arity and pairwise-equal
/// terms. Two variables are equal only when they have the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    predicate: String,
    terms: Vec<Term>,
}

impl Statement {
    /// Create a statement without validation.
    pub fn new(predicate: impl Into<String>, terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            predicate: predicate.into(),
            terms: terms.into_iter().collect(),
        }
    }

    /// Create a statement, rejecting an empty predicate or a nameless term.
    pub fn try_new(
        predicate: impl Into<String>,
        terms: impl IntoIterator<Item = Term>,
    ) -> Result<Self, TermError> {
        let statement = Self::new(predicate, terms);
        if statement.predicate.is_empty() {
            return Err(TermError::EmptyPredicate);
        }
        for term in &statement.terms {
            match term {
                Term::Constant(name) if name.is_empty() => return Err(TermError::EmptyToken),
                Term::Variable(name) if name.is_empty() => return Err(TermError::EmptyVariable),
                _ => {}
            }
        }
        Ok(statement)
    }

    /// Build a statement from already-split tokens: the first token is the
    /// predicate, the rest are classified with [`Term::from_token`].
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, TermError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = tokens.into_iter();
        let predicate = tokens.next().ok_or(TermError::EmptyPredicate)?;
        let terms = tokens
            .map(|token| Term::parse(token.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_new(predicate.as_ref(), terms)
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    /// True when no term is a variable.
    pub fn is_ground(&self) -> bool {
        !self.terms.iter().any(Term::is_variable)
    }

    /// Variable names in order of first occurrence, without repeats.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for term in &self.terms {
            if let Term::Variable(name) = term {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.predicate)?;
        for term in &self.terms {
            write!(f, " {}", term)?;
        }
        write!(f, ")")
    }
}
