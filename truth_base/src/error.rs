//! Error types for the knowledge base.

use thiserror::Error;

use crate::knowledge_base::ItemId;

/// Everything the public knowledge-base surface can report.
///
/// Failed matches and duplicate assertions are not errors; they are ordinary
/// outcomes. `DanglingReference` and `AsymmetricEdge` indicate a bug in graph
/// maintenance and are only produced by the consistency audit.
#[derive(Debug, Error)]
pub enum KbError {
    #[error("malformed query: expected a fact, found {found}")]
    MalformedQuery { found: String },

    #[error("only facts can be retracted, found {item}")]
    NotRetractable { item: String },

    #[error("a rule needs at least one antecedent")]
    EmptyAntecedents,

    #[error("{from} references {to}, which is not in the knowledge base")]
    DanglingReference { from: ItemId, to: ItemId },

    #[error("justification edge {producer} -> {dependent} is recorded on one side only")]
    AsymmetricEdge { producer: ItemId, dependent: ItemId },

    #[error("{kind} index out of sync with the arena")]
    IndexMismatch { kind: &'static str },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
