//! Errors the IR arena itself can raise: name collisions and malformed
//! construction requests. Sort/check/width errors belong to the crates that
//! implement those passes (`etpl-resolve`, `etpl-checker`, `etpl-algebra`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("cyclic dependency involving '{0}'")]
    CyclicDependency(String),

    #[error("in struct \"{0}\": member with name \"{1}\" already exists")]
    DuplicateMember(String, String),

    #[error("invalid range for enumeration item \"{0}\"")]
    InvalidEnumRange(String),

    #[error("element \"{0}\" already exists")]
    DuplicateName(String),

    #[error("element has empty name")]
    EmptyName,
}
