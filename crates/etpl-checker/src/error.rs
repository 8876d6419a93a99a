//! The `CheckError` taxonomy (§7): one named rule id per structural
//! invariant the checker enforces, plus the symbol-closure failure
//! delegated to `etpl-resolve`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Invariant 5: a non-optional struct member follows an optional one.
    /// Mirrors `core.py`'s `StructDef.selfCheck` ordering check.
    #[error("non-optional member \"{member}\" follows optional member in \"{owner}\"")]
    NonOptAfterOpt { owner: String, member: String },

    /// Invariant 6: a `distinctive` member's resolved type isn't an Enum.
    #[error("distinctive member \"{member}\" in \"{owner}\" does not resolve to an enum")]
    DistinctiveNonEnum { owner: String, member: String },

    /// Invariants 1/7: two members of the same struct (after Select-case
    /// disambiguation) share a name.
    #[error("duplicate member name \"{name}\" in \"{owner}\"")]
    DuplicateMember { owner: String, name: String },

    /// Invariant 7: a nested Select embeds a member name that can't be
    /// disambiguated against its siblings.
    #[error("ambiguous nested member name \"{name}\" in \"{owner}\"")]
    AmbiguousNested { owner: String, name: String },

    /// Invariant 3: a Select's parent is not a Struct.
    #[error("select \"{name}\" does not appear directly inside a struct")]
    SelectOutsideStruct { name: String },

    /// Invariant 4: a Select has no default case.
    #[error("select \"{name}\" has no default case")]
    MissingDefault { name: String },

    /// Invariant 4: a Select has more than one default case.
    #[error("select \"{name}\" has more than one default case")]
    MultipleDefault { name: String },

    /// Invariant 4: a Select's default case isn't its last case.
    #[error("select \"{name}\"'s default case is not its last case")]
    DefaultNotLast { name: String },

    /// Invariant 4: a Select's cases don't all carry the same member arity.
    #[error("select \"{name}\"'s cases have unbalanced member counts")]
    UnbalancedCases { name: String },

    /// An Enum declares more than one Fallback item.
    #[error("enum \"{name}\" declares more than one fallback item")]
    MultipleFallback { name: String },

    /// Invariant 8: an Instance argument isn't an integer expression.
    ///
    /// Unreachable in practice: `InstanceDef::args` is typed
    /// `IndexMap<String, IntElement>`, so the IR can't represent a
    /// non-integer argument in the first place. Kept in the taxonomy for
    /// §7-completeness and so diagnostics rendering has a stable variant to
    /// match on.
    #[error("argument to \"{name}\" is not an integer expression")]
    NonIntegerArg { name: String },

    /// A required symbol isn't in scope. Delegated to `etpl-resolve`.
    #[error(transparent)]
    Symbol(#[from] etpl_resolve::ResolveError),
}
