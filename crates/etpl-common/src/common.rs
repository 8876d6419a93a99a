//! Common types and constants shared across the compiler pipeline.
//!
//! This module holds small enums used by several crates (the IR, the
//! normaliser, the width algebra) to avoid circular dependencies between
//! them.
//!
//! # Architecture
//!
//! ```text
//! etpl-common (base layer)
//!   |
//!   v
//! etpl-ir -> etpl-resolve -> etpl-lowering -> etpl-checker -> etpl-algebra
//! ```
//!
//! No module should depend on a module that appears later in this chain.

/// The unit a size or length is expressed in.
///
/// eTPL lets a vector length or a `size(...)` override be given either in
/// bits or in bytes (`(n:bits)` vs. `(n:bytes)`, `[n]` vs `[n:bits]`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SizeUnit {
    Bit,
    #[default]
    Byte,
}

impl SizeUnit {
    /// Number of raw bits one unit of this scale occupies.
    #[must_use]
    pub const fn bit_scale(self) -> u64 {
        match self {
            SizeUnit::Bit => 1,
            SizeUnit::Byte => 8,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SizeUnit::Bit => "bits",
            SizeUnit::Byte => "bytes",
        }
    }
}

/// Signedness of a built-in integer type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Signedness {
    Signed,
    Unsigned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_scale_matches_unit() {
        assert_eq!(SizeUnit::Bit.bit_scale(), 1);
        assert_eq!(SizeUnit::Byte.bit_scale(), 8);
    }
}
