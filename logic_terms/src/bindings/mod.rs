//! Bindings - the variable assignments produced by a successful match.

use serde::{Deserialize, Serialize};

use crate::term::{Term, VARIABLE_MARKER};

/// One variable bound to a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    /// Variable name, without the `?` marker.
    pub variable: String,
    pub value: Term,
}

/// An ordered, internally consistent set of bindings.
///
/// A variable is bound at most once. Order is the order in which the matcher
/// met the variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    /// Create an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the term a variable is bound to.
    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.entries
            .iter()
            .find(|b| b.variable == variable)
            .map(|b| &b.value)
    }

    /// Bind `variable` to `value`.
    ///
    /// Returns `false`, leaving the set unchanged, if the variable is already
    /// bound to a different term.
    pub fn bind(&mut self, variable: &str, value: Term) -> bool {
        match self.get(variable) {
            Some(existing) => *existing == value,
            None => {
                self.entries.push(Binding {
                    variable: variable.to_string(),
                    value,
                });
                true
            }
        }
    }

    pub fn is_bound(&self, variable: &str) -> bool {
        self.get(variable).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter()
    }
}

impl std::fmt::Display for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, binding) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}{} : {}", VARIABLE_MARKER, binding.variable, binding.value)?;
        }
        Ok(())
    }
}
