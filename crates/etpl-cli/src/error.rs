//! `PipelineError`: the CLI-level error type that unifies every stage of the
//! pipeline (§10.2, §12).
//!
//! `SPEC_FULL.md` §10.2 places this type in `etpl_common::diagnostics`, but
//! `etpl-common` sits upstream of `etpl-ir`/`etpl-resolve`/`etpl-lowering`/
//! `etpl-checker`/`etpl-algebra` in the dependency chain documented in
//! `etpl_common::common`'s module doc — it cannot `impl From<IrError>` for
//! anything, since `IrError` is foreign to it and the orphan rules forbid
//! the reverse dependency. `PipelineError` lives here instead, one layer
//! above every crate it wraps, so a `#[from]` conversion is available for
//! each. See `DESIGN.md`'s Open Questions.

use etpl_algebra::AlgebraError;
use etpl_checker::CheckError;
use etpl_ir::IrError;
use etpl_lowering::LoweringError;
use etpl_resolve::ResolveError;
use thiserror::Error;

use etpl_common::diagnostics::diagnostic_codes;

use crate::backend::EmitError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A command-line argument is missing or inconsistent (e.g. `-F`
    /// without `-b`), caught before the pipeline runs at all.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Ir(#[from] IrError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Lowering(#[from] LoweringError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("malformed input: {0}")]
    Parse(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON IR: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// The stable numeric code this error reports as, per
    /// `etpl_common::diagnostics::diagnostic_codes`. CLI-only variants
    /// (`Usage`, `Parse`, `Io`) have no pipeline diagnostic code of their
    /// own and report 0.
    #[must_use]
    pub fn code(&self) -> u32 {
        use diagnostic_codes::*;
        match self {
            PipelineError::Usage(_) | PipelineError::Io(_) | PipelineError::Emit(_) => 0,
            PipelineError::Json(_) | PipelineError::Parse(_) => SYNTAX_ERROR,
            PipelineError::Ir(e) => match e {
                IrError::UnknownType(_) => UNKNOWN_TYPE,
                IrError::CyclicDependency(_) => CYCLIC_DEPENDENCY,
                IrError::DuplicateMember(_, _) | IrError::DuplicateName(_) => DUPLICATE_DEFINITION,
                IrError::InvalidEnumRange(_) | IrError::EmptyName => SYNTAX_ERROR,
            },
            PipelineError::Resolve(ResolveError::UnknownSymbol { .. }) => UNKNOWN_SYMBOL,
            PipelineError::Lowering(e) => match e {
                LoweringError::Ir(inner) => {
                    return PipelineError::Ir(inner.clone()).code();
                }
                LoweringError::Resolve(inner) => {
                    return PipelineError::Resolve(inner.clone()).code();
                }
                LoweringError::OpaqueVectorItemBased(_) => SYNTAX_ERROR,
            },
            PipelineError::Check(e) => match e {
                CheckError::NonOptAfterOpt { .. } => NON_OPT_AFTER_OPT,
                CheckError::DistinctiveNonEnum { .. } => DISTINCTIVE_NON_ENUM,
                CheckError::DuplicateMember { .. } => DUPLICATE_MEMBER,
                CheckError::AmbiguousNested { .. } => AMBIGUOUS_NESTED,
                CheckError::SelectOutsideStruct { .. } => SELECT_OUTSIDE_STRUCT,
                CheckError::MissingDefault { .. } => MISSING_DEFAULT,
                CheckError::MultipleDefault { .. } => MULTIPLE_DEFAULT,
                CheckError::DefaultNotLast { .. } => DEFAULT_NOT_LAST,
                CheckError::UnbalancedCases { .. } => UNBALANCED_CASES,
                CheckError::MultipleFallback { .. } => MULTIPLE_FALLBACK,
                CheckError::NonIntegerArg { .. } => NON_INTEGER_ARG,
                CheckError::Symbol(inner) => {
                    return PipelineError::Resolve(inner.clone()).code();
                }
            },
            PipelineError::Algebra(e) => match e {
                AlgebraError::WidthUndetermined { .. } => WIDTH_UNDETERMINED,
                AlgebraError::UnknownType { .. } => UNKNOWN_TYPE,
            },
        }
    }

    /// The chained name of the definition this error names, when it names
    /// one — used to look up a source line for diagnostic rendering.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            PipelineError::Ir(e) => Self::ir_subject(e),
            PipelineError::Resolve(ResolveError::UnknownSymbol { definition, .. }) => Some(definition.as_str()),
            PipelineError::Check(e) => match e {
                CheckError::NonOptAfterOpt { owner, .. }
                | CheckError::DistinctiveNonEnum { owner, .. }
                | CheckError::DuplicateMember { owner, .. } => Some(owner.as_str()),
                CheckError::AmbiguousNested { name, .. }
                | CheckError::SelectOutsideStruct { name }
                | CheckError::MissingDefault { name }
                | CheckError::MultipleDefault { name }
                | CheckError::DefaultNotLast { name }
                | CheckError::UnbalancedCases { name }
                | CheckError::MultipleFallback { name }
                | CheckError::NonIntegerArg { name } => Some(name.as_str()),
                CheckError::Symbol(ResolveError::UnknownSymbol { definition, .. }) => Some(definition.as_str()),
            },
            PipelineError::Algebra(e) => match e {
                AlgebraError::WidthUndetermined { name } | AlgebraError::UnknownType { name } => Some(name.as_str()),
            },
            PipelineError::Lowering(e) => match e {
                LoweringError::Ir(inner) => Self::ir_subject(inner),
                LoweringError::Resolve(ResolveError::UnknownSymbol { definition, .. }) => Some(definition.as_str()),
                LoweringError::OpaqueVectorItemBased(name) => Some(name.as_str()),
            },
            PipelineError::Usage(_) | PipelineError::Emit(_) | PipelineError::Parse(_) | PipelineError::Io(_) | PipelineError::Json(_) => None,
        }
    }

    fn ir_subject(e: &IrError) -> Option<&str> {
        match e {
            IrError::UnknownType(n)
            | IrError::CyclicDependency(n)
            | IrError::DuplicateName(n)
            | IrError::InvalidEnumRange(n) => Some(n.as_str()),
            IrError::DuplicateMember(owner, _) => Some(owner.as_str()),
            IrError::EmptyName => None,
        }
    }
}
