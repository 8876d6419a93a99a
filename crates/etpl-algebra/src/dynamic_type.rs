//! Dynamic type names (§4.6): the cartesian product of a compound type's
//! distinctive enum members' item names, joined with `+`.
//!
//! Grounded on `core.py`'s `StructDef.getDynamicTypeNames`/
//! `EnumDef.getDynamicTypeNames`.

use etpl_ir::{Collection, DefFlags, DefId, Definition};

/// Follow an `Instance` alias chain to its first non-Instance target.
/// Duplicated from `etpl-checker::alias::resolve_instance_chain` rather
/// than shared: this crate depends only on `etpl-ir`, and the helper is a
/// handful of lines.
fn resolve_instance_chain(collection: &Collection, id: DefId) -> DefId {
    match collection.get(id) {
        Definition::Instance(inst) => match collection.lookup(&inst.type_name) {
            Some(target) if target != id => resolve_instance_chain(collection, target),
            _ => id,
        },
        _ => id,
    }
}

/// `id`'s dynamic type set: an Enum's own item names, a compound type's
/// distinctive-member cartesian product, or empty for anything else.
#[must_use]
pub fn dynamic_type_names(collection: &Collection, id: DefId) -> Vec<String> {
    match collection.get(id) {
        Definition::Enum(e) => e.items.iter().filter_map(|item| item.name().map(str::to_string)).collect(),
        Definition::Struct(s) => cartesian_distinctive_names(collection, &s.members),
        Definition::Case(c) => cartesian_distinctive_names(collection, &c.members),
        Definition::DefaultCase(dc) => cartesian_distinctive_names(collection, &dc.members),
        _ => Vec::new(),
    }
}

fn cartesian_distinctive_names(collection: &Collection, members: &[DefId]) -> Vec<String> {
    let distinctive: Vec<DefId> = members
        .iter()
        .copied()
        .filter(|&m| collection.get(m).flags().contains(DefFlags::DISTINCTIVE))
        .collect();
    if distinctive.is_empty() {
        return Vec::new();
    }

    let per_member: Vec<Vec<String>> = distinctive
        .iter()
        .map(|&m| dynamic_type_names(collection, resolve_instance_chain(collection, m)))
        .collect();

    per_member.into_iter().fold(vec![String::new()], |acc, choices| {
        acc.iter()
            .flat_map(|prefix| {
                choices.iter().map(move |choice| {
                    if prefix.is_empty() { choice.clone() } else { format!("{prefix}+{choice}") }
                })
            })
            .collect()
    })
}
