//! The per-kind normalisation dispatch (§4.2), rebuilding a fresh
//! [`Collection`] from a raw one.
//!
//! Grounded on `examples/original_source/normalize.py`'s monkey-patched
//! `normalize` methods (`VectorDef`/`StaticVectorDef`/`DynamicVectorDef`/
//! `StructDef`/`SelectDef`), with the default `TypeDef.normalize` (identity)
//! applying to every other kind. Builds a brand-new arena rather than
//! mutating in place (§9: "prefer returning a new node than mutating in
//! place").

use indexmap::IndexMap;

use etpl_ir::{
    CaseDef, Collection, CollectionState, ConstDef, DefCommon, DefId, DefaultCaseDef, Definition,
    InstanceDef, IntElement, SelectDef, StaticVectorDef, StructDef,
};

use crate::error::LoweringError;
use crate::field::make_field;

/// Rebuild `source` into a fresh, normalised `Collection`. Mirrors
/// `core.py`'s `TypeDefCollection.normalize`.
pub fn normalize(source: &Collection) -> Result<Collection, LoweringError> {
    let mut out = Collection::new(source.global_symbols().clone());
    for id in source.user_defined().collect::<Vec<_>>() {
        let def = source.get(id).clone();
        let new_id = normalize_owned(source, &mut out, DefId::ROOT, def)?;
        out.promote_to_top_level(new_id)?;
    }
    out.set_state(CollectionState::Normal);
    Ok(out)
}

/// Allocate a throwaway placeholder slot, so a container's own `DefId` is
/// known before its children (which need it as `parent`) are built.
fn reserve(out: &mut Collection, parent: DefId) -> DefId {
    out.alloc(Definition::Const(ConstDef { common: DefCommon::new(String::new(), parent), value: 0 }))
}

/// Deep-copy a subtree into `out` verbatim, with no normalisation applied
/// at all. Used for `Fragment`'s element, which `core.py` never recurses
/// into (no override exists for `FragmentDef.normalize`).
fn deep_copy_into(source: &Collection, out: &mut Collection, parent: DefId, mut def: Definition) -> DefId {
    let id = reserve(out, parent);
    match &mut def {
        Definition::StaticVector(v) => {
            let child = source.get(v.element).clone();
            v.element = deep_copy_into(source, out, id, child);
        }
        Definition::DynamicVector(v) => {
            let child = source.get(v.element).clone();
            v.element = deep_copy_into(source, out, id, child);
        }
        Definition::Fragment(v) => {
            let child = source.get(v.element).clone();
            v.element = deep_copy_into(source, out, id, child);
        }
        Definition::Struct(s) => {
            s.members = s
                .members
                .iter()
                .map(|&m| deep_copy_into(source, out, id, source.get(m).clone()))
                .collect();
        }
        Definition::Case(c) => {
            c.members = c
                .members
                .iter()
                .map(|&m| deep_copy_into(source, out, id, source.get(m).clone()))
                .collect();
        }
        Definition::DefaultCase(dc) => {
            dc.members = dc
                .members
                .iter()
                .map(|&m| deep_copy_into(source, out, id, source.get(m).clone()))
                .collect();
        }
        Definition::Select(sel) => {
            sel.cases = sel
                .cases
                .iter()
                .map(|&c| deep_copy_into(source, out, id, source.get(c).clone()))
                .collect();
        }
        _ => {}
    }
    def.common_mut().parent = parent;
    *out.get_mut(id) = def;
    id
}

/// Normalise an owned definition (its nested children still referencing
/// `source`'s arena) and allocate the result into `out` under `parent`.
fn normalize_owned(
    source: &Collection,
    out: &mut Collection,
    parent: DefId,
    mut def: Definition,
) -> Result<DefId, LoweringError> {
    match &def {
        Definition::Int(_)
        | Definition::Fixed(_)
        | Definition::Opaque(_)
        | Definition::Const(_)
        | Definition::Instance(_)
        | Definition::Enum(_) => {
            def.common_mut().parent = parent;
            Ok(out.alloc(def))
        }
        Definition::Fragment(f) => {
            let mut common = def.common().clone();
            common.parent = parent;
            let id = out.alloc(Definition::Fragment(Box::new(etpl_ir::FragmentDef {
                common,
                element: DefId::ROOT,
            })));
            let elem = source.get(f.element).clone();
            let elem_id = deep_copy_into(source, out, id, elem);
            if let Definition::Fragment(fd) = out.get_mut(id) {
                fd.element = elem_id;
            }
            Ok(id)
        }
        Definition::StaticVector(_) => normalize_static_vector(source, out, parent, def),
        Definition::DynamicVector(_) => normalize_dynamic_vector(source, out, parent, def),
        Definition::Struct(_) => normalize_struct(source, out, parent, def),
        Definition::Case(_) => normalize_case(source, out, parent, def),
        Definition::DefaultCase(_) => normalize_default_case(source, out, parent, def),
        Definition::Select(_) => normalize_select(source, out, parent, def),
    }
}

/// Whether a struct/case member is left inline rather than hoisted out to
/// its own top-level definition. Mirrors `normalize.py`'s
/// `keepInStructDef`.
fn keep_in_struct(def: &Definition) -> bool {
    matches!(
        def,
        Definition::Fragment(_) | Definition::Select(_) | Definition::StaticVector(_)
    )
}

/// Whether a (already kind-normalised) element resolves, by following
/// Instance alias chains, to the `opaque` built-in. Mirrors `core.py`'s
/// `followInstantiation()[0]` combined with an `isinstance(..., OpaqueDef)`
/// check.
fn resolves_to_opaque(out: &Collection, id: DefId) -> bool {
    match out.get(id) {
        Definition::Opaque(_) => true,
        Definition::Instance(inst) => {
            if inst.type_name == "opaque" {
                true
            } else if let Some(target) = out.lookup(&inst.type_name) {
                resolves_to_opaque(out, target)
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Flatten a vector's element: default-name it, recursively normalise it,
/// then unconditionally hoist it to a field (`makeField`). Shared by
/// `StaticVectorDef` and `DynamicVectorDef`'s normalisation. Mirrors
/// `normalize.py`'s `VectorDef.normalize`.
fn flatten_element(
    source: &Collection,
    out: &mut Collection,
    owner: DefId,
    element_src: DefId,
) -> Result<DefId, LoweringError> {
    let mut elem = source.get(element_src).clone();
    if elem.name().is_empty() {
        elem.common_mut().name = "_E".to_string();
    }
    let elem_id = normalize_owned(source, out, owner, elem)?;
    let mut field = make_field(out, elem_id)?;
    field.common_mut().parent = owner;
    Ok(out.alloc(field))
}

fn normalize_static_vector(
    source: &Collection,
    out: &mut Collection,
    parent: DefId,
    def: Definition,
) -> Result<DefId, LoweringError> {
    let Definition::StaticVector(sv) = def else { unreachable!() };
    let mut common = sv.common.clone();
    common.parent = parent;
    let id = out.alloc(Definition::StaticVector(Box::new(StaticVectorDef {
        common: common.clone(),
        element: DefId::ROOT,
        length: sv.length.clone(),
        unit: sv.unit,
        item_based: sv.item_based,
    })));

    let field_id = flatten_element(source, out, id, sv.element)?;

    if resolves_to_opaque(out, field_id) {
        if sv.item_based {
            return Err(LoweringError::OpaqueVectorItemBased(out.chained_name(id)));
        }
        *out.get_mut(id) = Definition::Instance(Box::new(InstanceDef {
            common,
            type_name: "opaque".into(),
            args: IndexMap::new(),
        }));
        return Ok(id);
    }

    if let Definition::StaticVector(v) = out.get_mut(id) {
        v.element = field_id;
    }
    Ok(id)
}

/// Smallest `i` such that `2^i > max_value`. Mirrors `core.py`'s
/// `TypeDef.getNDigits(number, base=2)`, used to size the synthetic `_N`
/// length field of a lowered `DynamicVector`.
fn bits_needed(max_value: i64) -> u32 {
    let mut i = 0u32;
    loop {
        match 2i64.checked_pow(i) {
            Some(v) if v > max_value => return i,
            None => return i,
            _ => i += 1,
        }
    }
}

fn natural_max_for_width(width: u32) -> i64 {
    if width >= 63 {
        i64::MAX
    } else {
        (1i64 << width) - 1
    }
}

/// Lower a `DynamicVector` into a `Struct{_N, _V}` (§4.2's `_N`/`_V`
/// synthesis). Mirrors `normalize.py`'s `DynamicVectorDef.normalize`.
fn normalize_dynamic_vector(
    source: &Collection,
    out: &mut Collection,
    parent: DefId,
    def: Definition,
) -> Result<DefId, LoweringError> {
    let Definition::DynamicVector(dv) = def else { unreachable!() };
    let mut struct_common = dv.common.clone();
    struct_common.parent = parent;
    let struct_id = out.alloc(Definition::Struct(StructDef {
        common: struct_common,
        members: Vec::new(),
    }));

    let width = bits_needed(dv.length_max).max(1);
    let natural_max = natural_max_for_width(width);
    let mut n_args = IndexMap::new();
    if dv.length_min != 0 {
        n_args.insert("min".to_string(), IntElement::Literal(dv.length_min));
    }
    if dv.length_max != natural_max {
        n_args.insert("max".to_string(), IntElement::Literal(dv.length_max));
    }
    let field_n = Definition::Instance(Box::new(InstanceDef {
        common: DefCommon::new("_N", struct_id),
        type_name: format!("uint{width}"),
        args: n_args,
    }));
    let field_n_id = out.alloc(field_n);

    let field_id = flatten_element(source, out, struct_id, dv.element)?;

    let vector_id = if resolves_to_opaque(out, field_id) {
        if dv.item_based {
            return Err(LoweringError::OpaqueVectorItemBased(dv.common.name.clone()));
        }
        let mut args = IndexMap::new();
        args.insert("nbytes".to_string(), IntElement::symbol("_N"));
        let mut common = DefCommon::new("_V", struct_id);
        common.size = dv.common.size.clone();
        out.alloc(Definition::Instance(Box::new(InstanceDef {
            common,
            type_name: "opaque".into(),
            args,
        })))
    } else {
        let common = DefCommon::new("_V", struct_id);
        out.alloc(Definition::StaticVector(Box::new(StaticVectorDef {
            common,
            element: field_id,
            length: Some(IntElement::symbol("_N")),
            unit: dv.unit,
            item_based: dv.item_based,
        })))
    };

    if let Definition::Struct(s) = out.get_mut(struct_id) {
        s.members = vec![field_n_id, vector_id];
    }
    Ok(struct_id)
}

/// Normalise a member list shared by Struct/Case/DefaultCase: default-name
/// blank members `_M{i}`, recursively normalise, then hoist anything not
/// in [`keep_in_struct`]. Mirrors `normalize.py`'s `StructDef.normalize`
/// (inherited unmodified by `CaseDef`/`DefaultCaseDef`).
fn normalize_members(
    source: &Collection,
    out: &mut Collection,
    owner: DefId,
    members: &[DefId],
) -> Result<Vec<DefId>, LoweringError> {
    let mut result = Vec::with_capacity(members.len());
    for (i, &member_src) in members.iter().enumerate() {
        let mut member = source.get(member_src).clone();
        if member.name().is_empty() {
            member.common_mut().name = format!("_M{i}");
        }
        let normalized_id = normalize_owned(source, out, owner, member)?;
        let final_id = if keep_in_struct(out.get(normalized_id)) {
            normalized_id
        } else {
            let mut field = make_field(out, normalized_id)?;
            field.common_mut().parent = owner;
            out.alloc(field)
        };
        result.push(final_id);
    }
    Ok(result)
}

fn normalize_struct(
    source: &Collection,
    out: &mut Collection,
    parent: DefId,
    def: Definition,
) -> Result<DefId, LoweringError> {
    let Definition::Struct(s) = def else { unreachable!() };
    let mut common = s.common.clone();
    common.parent = parent;
    let id = out.alloc(Definition::Struct(StructDef { common, members: Vec::new() }));
    let members = normalize_members(source, out, id, &s.members)?;
    if let Definition::Struct(sd) = out.get_mut(id) {
        sd.members = members;
    }
    Ok(id)
}

fn normalize_case(
    source: &Collection,
    out: &mut Collection,
    parent: DefId,
    def: Definition,
) -> Result<DefId, LoweringError> {
    let Definition::Case(c) = def else { unreachable!() };
    let mut common = c.common.clone();
    common.parent = parent;
    let id = out.alloc(Definition::Case(CaseDef {
        common,
        cond: c.cond.clone(),
        members: Vec::new(),
    }));
    let members = normalize_members(source, out, id, &c.members)?;
    if let Definition::Case(cd) = out.get_mut(id) {
        cd.members = members;
    }
    Ok(id)
}

fn normalize_default_case(
    source: &Collection,
    out: &mut Collection,
    parent: DefId,
    def: Definition,
) -> Result<DefId, LoweringError> {
    let Definition::DefaultCase(dc) = def else { unreachable!() };
    let mut common = dc.common.clone();
    common.parent = parent;
    let id = out.alloc(Definition::DefaultCase(DefaultCaseDef { common, members: Vec::new() }));
    let members = normalize_members(source, out, id, &dc.members)?;
    if let Definition::DefaultCase(dcd) = out.get_mut(id) {
        dcd.members = members;
    }
    Ok(id)
}

/// Mirrors `normalize.py`'s `SelectDef.normalize`: default-name blank
/// cases `_C{i}`, recursively normalise each (which runs the same
/// member-hoisting logic as a Struct), but the cases themselves are never
/// hoisted out of the Select.
fn normalize_select(
    source: &Collection,
    out: &mut Collection,
    parent: DefId,
    def: Definition,
) -> Result<DefId, LoweringError> {
    let Definition::Select(sel) = def else { unreachable!() };
    let mut common = sel.common.clone();
    common.parent = parent;
    let id = out.alloc(Definition::Select(Box::new(SelectDef {
        common,
        test_symbol: sel.test_symbol.clone(),
        cases: Vec::new(),
    })));
    let mut cases = Vec::with_capacity(sel.cases.len());
    for (i, &case_src) in sel.cases.iter().enumerate() {
        let mut case = source.get(case_src).clone();
        if case.name().is_empty() {
            case.common_mut().name = format!("_C{i}");
        }
        cases.push(normalize_owned(source, out, id, case)?);
    }
    if let Definition::Select(s) = out.get_mut(id) {
        s.cases = cases;
    }
    Ok(id)
}
