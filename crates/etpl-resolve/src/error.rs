//! Errors the symbol/scope engine can raise.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A definition refers to a symbol (via a size override, a vector
    /// length, an Instance argument, or a Select test variable) that isn't
    /// in scope where it's used. Mirrors `core.py`'s
    /// `'Unknown reference to "{0}" in definition of "{1}"'`.
    #[error("unknown reference to \"{symbol}\" in definition of \"{definition}\"")]
    UnknownSymbol { symbol: String, definition: String },
}
