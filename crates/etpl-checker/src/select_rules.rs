//! Select structural rules: invariants 3 and 4.
//!
//! Grounded on `core.py`'s `SelectDef.selfCheck`. Note what's deliberately
//! *not* checked here: the test symbol's resolved type being an Enum isn't
//! part of `SelectDef.selfCheck` in the original, and isn't in scope per
//! this checker's own invariant-3 wording either — only "exists directly
//! inside a struct" is enforced.

use etpl_ir::{Collection, DefId, Definition, SelectDef};

use crate::error::CheckError;

pub fn check_select(collection: &Collection, id: DefId, sel: &SelectDef) -> Result<(), CheckError> {
    let name = collection.chained_name(id);

    if !matches!(collection.get(collection.parent_of(id)), Definition::Struct(_)) {
        return Err(CheckError::SelectOutsideStruct { name });
    }

    let is_default: Vec<bool> = sel
        .cases
        .iter()
        .map(|&c| matches!(collection.get(c), Definition::DefaultCase(_)))
        .collect();
    let n_defaults = is_default.iter().filter(|&&b| b).count();
    if n_defaults == 0 {
        return Err(CheckError::MissingDefault { name });
    }
    if n_defaults > 1 {
        return Err(CheckError::MultipleDefault { name });
    }
    if is_default.last() != Some(&true) {
        return Err(CheckError::DefaultNotLast { name });
    }

    let arities: Vec<usize> = sel.cases.iter().map(|&c| collection.get(c).children().len()).collect();
    if let (Some(min), Some(max)) = (arities.iter().min(), arities.iter().max()) {
        if min != max {
            return Err(CheckError::UnbalancedCases { name });
        }
    }

    Ok(())
}
