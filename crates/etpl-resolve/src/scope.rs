//! The symbol/scope engine (§4.1): for a given [`DefId`], what symbols it
//! *requires* (free variable references in its size/length/argument
//! expressions) and what symbols it *knows* (parameters in scope, from its
//! own parameter list up through its ancestors to the Collection's globals
//! and constants).
//!
//! Grounded on `core.py`'s `TypeDef.getRequiredSymbols`/`getKnownSymbols`
//! and their per-kind overrides (`InstanceDef`, `VectorDef`/
//! `StaticVectorDef`, `StructDef`, `SelectDef`), and
//! `TypeDefCollection.getKnownSymbols`/`getUndefinedSymbols` for the
//! Collection-level base case.

use rustc_hash::{FxHashMap, FxHashSet};

use etpl_ir::{Collection, DefId, Definition};

use crate::error::ResolveError;

/// The free symbol names `id`'s own expressions reference: its size
/// override (if symbolic), and per-kind contributions (Instance argument
/// expressions, vector lengths, Select's test variable, a Struct/Case's
/// members minus the names those members themselves bind).
///
/// A `Const` requires nothing — mirrors `core.py`'s override returning
/// `set()` unconditionally, dropping the base size-override contribution
/// too (a Const has no size override in practice).
#[must_use]
pub fn required_symbols(collection: &Collection, id: DefId) -> FxHashSet<String> {
    let def = collection.get(id);
    if matches!(def, Definition::Const(_)) {
        return FxHashSet::default();
    }

    let mut symbols = FxHashSet::default();
    if let Some(size) = &def.common().size {
        symbols.extend(size.value.required_symbols());
    }

    match def {
        Definition::Instance(inst) => {
            for arg in inst.args.values() {
                symbols.extend(arg.required_symbols());
            }
        }
        Definition::StaticVector(v) => {
            symbols.extend(required_symbols(collection, v.element));
            if let Some(length) = &v.length {
                symbols.extend(length.required_symbols());
            }
        }
        Definition::DynamicVector(v) => {
            symbols.extend(required_symbols(collection, v.element));
        }
        Definition::Fragment(f) => {
            symbols.extend(required_symbols(collection, f.element));
        }
        Definition::Struct(s) => collect_member_symbols(collection, id, &s.members, &mut symbols),
        Definition::Case(c) => collect_member_symbols(collection, id, &c.members, &mut symbols),
        Definition::DefaultCase(dc) => {
            collect_member_symbols(collection, id, &dc.members, &mut symbols);
        }
        Definition::Select(sel) => {
            symbols.insert(sel.test_symbol.clone());
            for &case in &sel.cases {
                symbols.extend(required_symbols(collection, case));
            }
        }
        _ => {}
    }

    symbols
}

/// Union the members' required symbols, then drop anything a member itself
/// binds into `owner`'s scope (a later member referencing an earlier
/// sibling by name isn't a free reference at the struct's level). Mirrors
/// `core.py`'s `StructDef.getRequiredSymbols`.
fn collect_member_symbols(
    collection: &Collection,
    owner: DefId,
    members: &[DefId],
    out: &mut FxHashSet<String>,
) {
    for &member in members {
        out.extend(required_symbols(collection, member));
        for (name, bound_by) in known_symbols(collection, member) {
            if bound_by == owner {
                out.remove(&name);
            }
        }
    }
}

/// The symbols visible to `id`: its own parameter list, merged with
/// whatever its parent makes visible to it. Each symbol maps to the
/// [`DefId`] that introduces it (`DefId::ROOT` for Collection-level globals
/// and constants). Mirrors `core.py`'s `TypeDef.getKnownSymbols`.
#[must_use]
pub fn known_symbols(collection: &Collection, id: DefId) -> FxHashMap<String, DefId> {
    let parent = collection.parent_of(id);
    let mut symbols = if parent.is_root() {
        collection_scope(collection)
    } else {
        known_symbols_seen_by_child(collection, parent, id)
    };
    for param in &collection.get(id).common().params {
        symbols.insert(param.clone(), id);
    }
    symbols
}

/// What `owner` makes visible to a specific child (its `ref` in
/// `core.py`'s terms). Only Struct/Case/DefaultCase narrow this: a member
/// sees every sibling declared before it, in addition to whatever `owner`
/// itself sees.
fn known_symbols_seen_by_child(
    collection: &Collection,
    owner: DefId,
    child: DefId,
) -> FxHashMap<String, DefId> {
    let mut symbols = known_symbols(collection, owner);
    let members: &[DefId] = match collection.get(owner) {
        Definition::Struct(s) => &s.members,
        Definition::Case(c) => &c.members,
        Definition::DefaultCase(dc) => &dc.members,
        _ => return symbols,
    };
    if let Some(pos) = members.iter().position(|&m| m == child) {
        for &sibling in &members[..pos] {
            symbols.insert(collection.name_of(sibling).to_string(), owner);
        }
    }
    symbols
}

/// The Collection's own scope: global symbols plus every `Const`'s name,
/// all attributed to `DefId::ROOT`. Mirrors
/// `TypeDefCollection.getKnownSymbols`.
fn collection_scope(collection: &Collection) -> FxHashMap<String, DefId> {
    let mut symbols: FxHashMap<String, DefId> = collection
        .global_symbols()
        .iter()
        .map(|name| (name.clone(), DefId::ROOT))
        .collect();
    for name in collection.const_names() {
        symbols.insert(name, DefId::ROOT);
    }
    symbols
}

/// Check that every symbol `id` requires is in scope for it. The single-node
/// half of `core.py`'s `TypeDef.check()`; callers (the normaliser, the
/// checker) walk the tree and call this per node.
pub fn check_closure(collection: &Collection, id: DefId) -> Result<(), ResolveError> {
    let required = required_symbols(collection, id);
    let known = known_symbols(collection, id);
    for symbol in required {
        if !known.contains_key(&symbol) {
            return Err(ResolveError::UnknownSymbol {
                symbol,
                definition: collection.name_of(id).to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use etpl_ir::{ConstDef, DefCommon, InstanceDef, Size, StructDef};
    use indexmap::IndexMap;

    fn collection_with_global(name: &str) -> Collection {
        Collection::new(FxHashSet::from_iter([name.to_string()]))
    }

    #[test]
    fn instance_requires_args_symbols() {
        let mut c = collection_with_global("n");
        let inst = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("F", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::from_iter([("min".to_string(), etpl_ir::IntElement::symbol("n"))]),
        }));
        let id = c.add_top_level(inst, false).unwrap();
        let required = required_symbols(&c, id);
        assert!(required.contains("n"));
        assert!(check_closure(&c, id).is_ok());
    }

    #[test]
    fn unbound_symbol_fails_closure_check() {
        let mut c = Collection::new(FxHashSet::default());
        let inst = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("F", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::from_iter([("min".to_string(), etpl_ir::IntElement::symbol("missing"))]),
        }));
        let id = c.add_top_level(inst, false).unwrap();
        let err = check_closure(&c, id).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownSymbol { symbol: "missing".into(), definition: "F".into() }
        );
    }

    #[test]
    fn const_never_requires_anything() {
        let mut c = Collection::new(FxHashSet::default());
        let const_def = Definition::Const(ConstDef { common: DefCommon::new("K", DefId::ROOT), value: 1 });
        let id = c.add_top_level(const_def, false).unwrap();
        assert!(required_symbols(&c, id).is_empty());
    }

    #[test]
    fn struct_member_sees_earlier_sibling_by_name() {
        let mut c = Collection::new(FxHashSet::default());
        let struct_id = c.alloc(Definition::Struct(StructDef {
            common: DefCommon::new("S", DefId::ROOT),
            members: Vec::new(),
        }));
        let len_field = c.alloc(Definition::Const(ConstDef {
            common: DefCommon::new("len", struct_id),
            value: 4,
        }));
        let mut payload_common = DefCommon::new("payload", struct_id);
        payload_common.size = Some(Size::bytes(etpl_ir::IntElement::symbol("len")));
        let payload = c.alloc(Definition::Instance(Box::new(InstanceDef {
            common: payload_common,
            type_name: "opaque".into(),
            args: IndexMap::new(),
        })));
        if let Definition::Struct(s) = c.get_mut(struct_id) {
            s.members.push(len_field);
            s.members.push(payload);
        }

        let known = known_symbols(&c, payload);
        assert_eq!(known.get("len"), Some(&struct_id));
        assert!(check_closure(&c, payload).is_ok());

        // at the struct's own level, "len" is locally bound and not a free
        // reference
        assert!(!required_symbols(&c, struct_id).contains("len"));
    }

    #[test]
    fn select_requires_its_test_symbol() {
        use etpl_ir::{CaseDef, SelectDef};
        let mut c = collection_with_global("tag");
        let case = c.alloc(Definition::Case(CaseDef {
            common: DefCommon::new("c1", DefId::ROOT),
            cond: vec!["A".into()],
            members: Vec::new(),
        }));
        let select = Definition::Select(Box::new(SelectDef {
            common: DefCommon::new("sel", DefId::ROOT),
            test_symbol: "tag".into(),
            cases: vec![case],
        }));
        let id = c.add_top_level(select, false).unwrap();
        assert!(required_symbols(&c, id).contains("tag"));
        assert!(check_closure(&c, id).is_ok());
    }
}
