//! # Logic Terms
//!
//! The vocabulary shared by every part of the knowledge base: statements,
//! variables, bindings and the one-way matcher that relates them.
//! This crate holds no knowledge-base state and performs no inference.
//!
//! ## Core Components
//!
//! - **term**: Constants, variables and statements (`(pred a ?x)`)
//! - **bindings**: Ordered variable → term maps produced by matching
//! - **unify**: `match_statements` and `instantiate`

pub mod bindings;
pub mod term;
pub mod unify;

pub use bindings::*;
pub use term::*;
pub use unify::*;
