//! # Truth Base
//!
//! A forward-chaining knowledge base that remembers why it believes things.
//! Every derived fact or rule records the (fact, rule) pairs that produced it,
//! and every producer keeps back-references to what it produced, so retracting
//! a premise removes exactly the knowledge that depended on it alone.
//!
//! ## Core Components
//!
//! - **knowledge_base**: Fact/rule arena, dedup and merge-on-assert, queries
//! - **inference**: The forward-chaining step and the agenda that drives it
//! - **retraction**: Worklist cascade over the justification graph
//! - **config**: Retraction policy and graph auditing switches
//!
//! ## Example
//!
//! ```
//! use logic_terms::Statement;
//! use truth_base::{Fact, KnowledgeBase, Rule};
//!
//! let stmt = |s: &str| Statement::from_tokens(s.split_whitespace()).unwrap();
//!
//! let mut kb = KnowledgeBase::new();
//! kb.kb_assert(Fact::new(stmt("isa cube block"))).unwrap();
//! kb.kb_assert(Rule::try_new(vec![stmt("isa ?x block")], stmt("stackable ?x")).unwrap())
//!     .unwrap();
//!
//! assert_eq!(kb.kb_ask(stmt("stackable ?y")).len(), 1);
//!
//! kb.kb_retract(stmt("isa cube block")).unwrap();
//! assert!(kb.kb_ask(stmt("stackable ?y")).is_empty());
//! ```

pub mod config;
pub mod error;
mod inference;
pub mod knowledge_base;
pub mod retraction;

pub use config::*;
pub use error::*;
pub use knowledge_base::*;
pub use retraction::Retraction;
