//! Symbol and scope resolution for eTPL type definitions (§4.1).
//!
//! Computes, for any [`DefId`](etpl_ir::DefId) in a [`Collection`](etpl_ir::Collection),
//! the symbols it requires and the symbols it has in scope, and checks that
//! the former is a subset of the latter. Consumed by both the normaliser
//! (`etpl-lowering`, to avoid promoting a field whose promotion would break
//! a sibling reference) and the checker (`etpl-checker`, as the final
//! structural rule).

pub mod error;
pub mod scope;

pub use error::ResolveError;
pub use scope::{check_closure, known_symbols, required_symbols};
