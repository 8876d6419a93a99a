//! Errors the normaliser can raise.

use thiserror::Error;

use etpl_ir::IrError;
use etpl_resolve::ResolveError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoweringError {
    #[error(transparent)]
    Ir(#[from] IrError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An item-based vector was found to hold `opaque` elements, which have
    /// no fixed per-item width. Mirrors `core.py`'s
    /// `'Invalid use of opaque type in definition of "{0}"'`.
    #[error("invalid use of opaque type in definition of \"{0}\"")]
    OpaqueVectorItemBased(String),
}
