//! Knowledge Base module - the fact/rule store and its justification graph.
//!
//! The store consists of:
//! - **Facts**: Statements believed true, asserted or derived
//! - **Rules**: Implications from an antecedent list to a consequent
//! - **Provenance**: Support pairs and back-references linking the two

mod fact;
mod item;
mod provenance;
mod rule;
mod store;

pub use fact::*;
pub use item::*;
pub use provenance::*;
pub use rule::*;
pub use store::*;
