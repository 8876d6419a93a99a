//! The structural checker (§4.5): per-definition-kind invariant checks,
//! recursively into children, followed by the node's own symbol-closure
//! check — mirroring `core.py`'s `TypeDef.check()` ordering exactly
//! (`selfCheck()` then children then the symbol check, not the reverse).

pub mod alias;
pub mod enum_rules;
pub mod error;
pub mod instance_rules;
pub mod select_rules;
pub mod struct_rules;

pub use error::CheckError;

use etpl_ir::{Collection, DefId, Definition};

/// Check every definition reachable from `collection`'s top level (built-ins
/// included, mirroring `core.py`'s `TypeDefCollection.check()`; a built-in
/// has an empty self-check and no children, so it's a no-op here too).
pub fn check_collection(collection: &Collection) -> Result<(), CheckError> {
    for &id in collection.top_level() {
        check_node(collection, id)?;
    }
    Ok(())
}

/// `core.py`'s `TypeDef.check()`: self-check, then recurse into children,
/// then verify this node's own required symbols are all in scope.
fn check_node(collection: &Collection, id: DefId) -> Result<(), CheckError> {
    self_check(collection, id)?;

    for child in collection.get(id).children() {
        check_node(collection, child)?;
    }

    etpl_resolve::check_closure(collection, id)?;
    Ok(())
}

fn self_check(collection: &Collection, id: DefId) -> Result<(), CheckError> {
    match collection.get(id) {
        Definition::Struct(s) => {
            struct_rules::check_struct_like(collection, id, &s.members, false)
        }
        Definition::Case(c) => struct_rules::check_struct_like(collection, id, &c.members, true),
        Definition::DefaultCase(dc) => {
            struct_rules::check_struct_like(collection, id, &dc.members, true)
        }
        Definition::Select(sel) => select_rules::check_select(collection, id, sel),
        Definition::Enum(e) => enum_rules::check_enum(collection, id, e),
        Definition::Instance(inst) => instance_rules::check_instance(collection, id, inst),
        _ => Ok(()),
    }
}
