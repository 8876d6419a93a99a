//! Feature paths (§4.6): the set of `<property>@<path>` and bare
//! `<path>:<type>%` strings a type definition contributes to the generated
//! accessor surface.
//!
//! Grounded on `core.py`'s per-kind `getFeatures` overrides
//! (`TypeDef`/`VectorDef`/`EnumDef`/`StructDef`/`SelectDef`) and
//! `concatFeatureStrings`. This is a clean re-derivation from
//! `SPEC_FULL.md §4.6`'s bullet-point wording rather than a byte-faithful
//! port: `concatFeatureStrings`'s trailing-slash path artifacts are an
//! accident of Python string joining, not semantics worth reproducing (see
//! `DESIGN.md`).

use rustc_hash::FxHashSet;

use etpl_ir::{Collection, DefId, Definition, EnumDef};

use crate::dynamic_type::dynamic_type_names;

/// Duplicated from `dynamic_type::resolve_instance_chain` (and
/// `etpl-checker::alias::resolve_instance_chain`): this crate has no shared
/// internal module for it yet, and each copy is a handful of lines.
fn resolve_instance_chain(collection: &Collection, id: DefId) -> DefId {
    match collection.get(id) {
        Definition::Instance(inst) => match collection.lookup(&inst.type_name) {
            Some(target) if target != id => resolve_instance_chain(collection, target),
            _ => id,
        },
        _ => id,
    }
}

/// Whether `id`'s own size (an explicit `size(...)` override) is symbolic
/// rather than a resolved literal — the trigger for `.overflow@`/
/// `.underflow@` features, independent of any ancestor's dynamic length.
fn has_symbolic_size(collection: &Collection, id: DefId) -> bool {
    collection
        .get(id)
        .common()
        .size
        .as_ref()
        .is_some_and(|s| s.value.as_literal().is_none())
}

/// Every feature path reachable from `root`, sorted by `(property, path)`.
#[must_use]
pub fn features(collection: &Collection, root: DefId) -> Vec<String> {
    let mut out = FxHashSet::default();
    walk(collection, root, "", false, &mut out);
    let mut result: Vec<String> = out.into_iter().collect();
    result.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    result
}

/// `(property, path)`: the sort key `features.py`'s
/// `tuple(f.split('@')[::-1])` computes for a `prop@path` feature, extended
/// to bare (no `@`) paths by sorting them under the empty property.
#[must_use]
pub fn sort_key(f: &str) -> (String, String) {
    match f.split_once('@') {
        Some((prop, path)) => (prop.to_string(), path.to_string()),
        None => (String::new(), f.to_string()),
    }
}

fn walk(collection: &Collection, id: DefId, path: &str, dynlen: bool, out: &mut FxHashSet<String>) {
    let def = collection.get(id);
    let node_dynlen = dynlen || has_symbolic_size(collection, id);
    if node_dynlen {
        out.insert(format!("overflow@{path}"));
        out.insert(format!("underflow@{path}"));
    }

    match def {
        Definition::Struct(s) => walk_members(collection, &s.members, path, node_dynlen, out),
        Definition::Case(c) => walk_members(collection, &c.members, path, node_dynlen, out),
        Definition::DefaultCase(dc) => walk_members(collection, &dc.members, path, node_dynlen, out),
        Definition::Select(sel) => {
            for &case in &sel.cases {
                walk(collection, case, path, node_dynlen, out);
            }
        }
        Definition::Instance(inst) => {
            if let Some(target) = collection.lookup(&inst.type_name) {
                let resolved = resolve_instance_chain(collection, target);
                if let Definition::Enum(e) = collection.get(resolved) {
                    emit_enum_features(collection, resolved, e, path, out);
                } else {
                    walk(collection, resolved, path, node_dynlen, out);
                }
            }
        }
        Definition::StaticVector(v) => {
            walk_vector_element(collection, v.element, path, node_dynlen, out);
        }
        Definition::DynamicVector(v) => {
            walk_vector_element(collection, v.element, path, true, out);
        }
        Definition::Fragment(f) => walk(collection, f.element, path, node_dynlen, out),
        Definition::Enum(e) => emit_enum_features(collection, id, e, path, out),
        Definition::Int(_) | Definition::Fixed(_) | Definition::Opaque(_) | Definition::Const(_) => {}
    }
}

fn walk_members(collection: &Collection, members: &[DefId], path: &str, dynlen: bool, out: &mut FxHashSet<String>) {
    for &m in members {
        if matches!(collection.get(m), Definition::Select(_)) {
            walk(collection, m, path, dynlen, out);
            continue;
        }
        let name = collection.name_of(m);
        let seg = if path.is_empty() { name.to_string() } else { format!("{path}/{name}") };
        walk(collection, m, &seg, dynlen, out);
    }
}

/// `core.py`'s `VectorDef.getFeatures` enum/struct element special cases: an
/// enum element contributes one bare `path:EnumName:Item%` feature per item;
/// a struct element expands once per dynamic type, prefixed `path:Struct:Type%`,
/// with its own sub-features nested beneath. Anything else recurses plainly.
fn walk_vector_element(collection: &Collection, element: DefId, path: &str, dynlen: bool, out: &mut FxHashSet<String>) {
    let target = resolve_instance_chain(collection, element);
    match collection.get(target) {
        Definition::Enum(e) => emit_enum_features(collection, target, e, path, out),
        Definition::Struct(_) => {
            let struct_name = collection.name_of(target);
            for dyn_name in dynamic_type_names(collection, target) {
                let seg = format!("{path}:{struct_name}:{dyn_name}%");
                walk(collection, target, &seg, dynlen, out);
            }
        }
        _ => walk(collection, target, path, dynlen, out),
    }
}

fn emit_enum_features(collection: &Collection, enum_id: DefId, e: &EnumDef, path: &str, out: &mut FxHashSet<String>) {
    let enum_name = collection.name_of(enum_id);
    for item in &e.items {
        if let Some(item_name) = item.name() {
            let seg = if path.is_empty() {
                format!("{enum_name}:{item_name}%")
            } else {
                format!("{path}/{enum_name}:{item_name}%")
            };
            out.insert(seg);
        }
    }
}
