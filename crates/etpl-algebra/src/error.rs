//! Errors the width/feature algebra can raise.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    /// Mirrors `core.py`'s `TPLError('Insufficient information to determine
    /// bit width')` / the various "cannot determine raw bit width of ..."
    /// messages: a size-bearing node's width depends on a symbol that isn't
    /// resolvable from the supplied arguments/selections, or the node's
    /// kind has no statically knowable width at all (a `DynamicVector`, or
    /// an embedded `Select`).
    #[error("cannot determine raw bit width of \"{name}\"")]
    WidthUndetermined { name: String },

    /// An `Instance`'s `type_name` doesn't resolve to any known
    /// definition. Should only happen on a collection that hasn't passed
    /// `etpl-checker`'s symbol/type closure checks yet.
    #[error("unknown type \"{name}\"")]
    UnknownType { name: String },
}
