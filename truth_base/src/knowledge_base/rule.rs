//! Rule definitions - implications from antecedents to a consequent.

use logic_terms::Statement;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FactId, Provenance, Support};
use crate::error::KbError;

/// Unique identifier for rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub Uuid);

impl RuleId {
    /// Create a new random rule ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural identity of a rule: its antecedents and consequent.
pub type RuleKey = (Vec<Statement>, Statement);

/// `lhs[0] ∧ lhs[1] ∧ … ⇒ rhs`, with provenance.
///
/// `lhs` is never empty. Equality compares `lhs` and `rhs` only.
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub id: RuleId,

    lhs: Vec<Statement>,

    rhs: Statement,

    pub provenance: Provenance,
}

impl Rule {
    /// Create a caller-asserted rule.
    pub fn try_new(lhs: Vec<Statement>, rhs: Statement) -> Result<Self, KbError> {
        if lhs.is_empty() {
            return Err(KbError::EmptyAntecedents);
        }
        Ok(Self {
            id: RuleId::new(),
            lhs,
            rhs,
            provenance: Provenance::asserted(),
        })
    }

    /// Create a rule produced by one derivation.
    pub fn derived(
        lhs: Vec<Statement>,
        rhs: Statement,
        support: Support,
    ) -> Result<Self, KbError> {
        let mut rule = Self::try_new(lhs, rhs)?;
        rule.provenance = Provenance::derived(support);
        Ok(rule)
    }

    /// Add another justification pair.
    pub fn with_support(mut self, support: Support) -> Self {
        self.provenance.add_support(support);
        self
    }

    pub fn lhs(&self) -> &[Statement] {
        &self.lhs
    }

    pub fn rhs(&self) -> &Statement {
        &self.rhs
    }

    /// The antecedent the next fact must match.
    pub fn first_antecedent(&self) -> &Statement {
        &self.lhs[0]
    }

    /// Antecedents left once the first one is discharged.
    pub fn remaining_antecedents(&self) -> &[Statement] {
        &self.lhs[1..]
    }

    pub fn key(&self) -> RuleKey {
        (self.lhs.clone(), self.rhs.clone())
    }

    pub fn is_asserted(&self) -> bool {
        self.provenance.asserted
    }

    pub fn supported_by(&self) -> &[Support] {
        &self.provenance.supported_by
    }

    pub fn supports_facts(&self) -> &[FactId] {
        &self.provenance.supports_facts
    }

    pub fn supports_rules(&self) -> &[RuleId] {
        &self.provenance.supports_rules
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl Eq for Rule {}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, antecedent) in self.lhs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", antecedent)?;
        }
        write!(f, ") -> {}", self.rhs)
    }
}
