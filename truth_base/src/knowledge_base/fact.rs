//! Fact definitions - statements the knowledge base believes.

use logic_terms::Statement;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Provenance, RuleId, Support};

/// Unique identifier for facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactId(pub Uuid);

impl FactId {
    /// Create a new random fact ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A statement held by the knowledge base, with its provenance.
///
/// Two facts are equal when their statements are equal; ids and provenance
/// are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,

    pub statement: Statement,

    pub provenance: Provenance,
}

impl Fact {
    /// Create a caller-asserted fact.
    pub fn new(statement: Statement) -> Self {
        Self {
            id: FactId::new(),
            statement,
            provenance: Provenance::asserted(),
        }
    }

    /// Create a fact produced by one derivation.
    pub fn derived(statement: Statement, support: Support) -> Self {
        Self {
            id: FactId::new(),
            statement,
            provenance: Provenance::derived(support),
        }
    }

    /// Add another justification pair.
    pub fn with_support(mut self, support: Support) -> Self {
        self.provenance.add_support(support);
        self
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

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.statement == other.statement
    }
}

impl Eq for Fact {}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.statement)
    }
}
