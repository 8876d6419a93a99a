//! Struct (and Case/DefaultCase, which share the same member-list shape)
//! structural rules: invariants 1, 5, 6, 7.
//!
//! Grounded on `core.py`'s `StructDef.selfCheck`/`getMemberNameCounts`/
//! `disambiguateMemberName`, and `CaseDef`'s override of the latter.

use rustc_hash::FxHashMap;

use etpl_ir::{Collection, DefFlags, DefId, Definition};

use crate::alias::{resolve_instance_chain, resolves_to_enum};
use crate::error::CheckError;

/// Run the four member-list invariants for a Struct (`owner_is_case =
/// false`) or a Case/DefaultCase (`owner_is_case = true`, which switches
/// nested-ambiguity disambiguation to the select-aware `Type%name` form).
pub fn check_struct_like(
    collection: &Collection,
    id: DefId,
    members: &[DefId],
    owner_is_case: bool,
) -> Result<(), CheckError> {
    let chained = collection.chained_name(id);
    check_optional_ordering(collection, members, &chained)?;
    check_distinctive_enum(collection, members, &chained)?;

    let name = collection.name_of(id).to_string();
    check_duplicate_members(collection, members, &name)?;
    check_ambiguous_nested(collection, members, &name, owner_is_case)?;
    Ok(())
}

/// Invariant 5: once an optional member appears, every following member
/// must also be optional.
fn check_optional_ordering(
    collection: &Collection,
    members: &[DefId],
    owner: &str,
) -> Result<(), CheckError> {
    let mut seen_optional = false;
    for &m in members {
        let optional = collection.get(m).flags().contains(DefFlags::OPTIONAL);
        if optional {
            seen_optional = true;
        } else if seen_optional {
            return Err(CheckError::NonOptAfterOpt {
                owner: owner.to_string(),
                member: collection.name_of(m).to_string(),
            });
        }
    }
    Ok(())
}

/// Invariant 6: a `distinctive` member must resolve to an Enum.
fn check_distinctive_enum(
    collection: &Collection,
    members: &[DefId],
    owner: &str,
) -> Result<(), CheckError> {
    for &m in members {
        if collection.get(m).flags().contains(DefFlags::DISTINCTIVE)
            && !resolves_to_enum(collection, m)
        {
            return Err(CheckError::DistinctiveNonEnum {
                owner: owner.to_string(),
                member: collection.name_of(m).to_string(),
            });
        }
    }
    Ok(())
}

/// Invariants 1/7: no two members (folding each embedded Select's names in
/// as a single count, since its cases are mutually exclusive) share a name.
fn check_duplicate_members(
    collection: &Collection,
    members: &[DefId],
    owner: &str,
) -> Result<(), CheckError> {
    let counts = member_name_counts(collection, members, false, true, false, true);
    if let Some((name, _)) = first_duplicate(&counts) {
        return Err(CheckError::DuplicateMember { owner: owner.to_string(), name });
    }
    Ok(())
}

/// Invariant 7: embedded Select members, once disambiguated, must still be
/// distinguishable from their siblings.
fn check_ambiguous_nested(
    collection: &Collection,
    members: &[DefId],
    owner: &str,
    owner_is_case: bool,
) -> Result<(), CheckError> {
    let counts = member_name_counts(collection, members, owner_is_case, true, true, false);
    if let Some((name, _)) = first_duplicate(&counts) {
        return Err(CheckError::AmbiguousNested { owner: owner.to_string(), name });
    }
    Ok(())
}

fn first_duplicate(counts: &FxHashMap<String, u32>) -> Option<(String, u32)> {
    counts
        .iter()
        .filter(|&(_, &count)| count > 1)
        .map(|(name, &count)| (name.clone(), count))
        .min_by(|a, b| a.0.cmp(&b.0))
}

/// Mirrors `core.py`'s `StructDef.getMemberNameCounts`: count each direct
/// member once (by its plain name, or `disambiguate_member_name` when
/// `disambiguate`), except that an embedded Select (when `include_embedded`)
/// contributes its *cases'* member-name counts instead of its own name —
/// either summed across cases (`merge_embedded = false`) or folded to one
/// per distinct name (`merge_embedded = true`, since a select's cases never
/// coexist on the wire).
fn member_name_counts(
    collection: &Collection,
    members: &[DefId],
    owner_is_case: bool,
    include_embedded: bool,
    disambiguate: bool,
    merge_embedded: bool,
) -> FxHashMap<String, u32> {
    let mut counts = FxHashMap::default();
    for &m in members {
        if include_embedded {
            if let Definition::Select(sel) = collection.get(m) {
                let embedded = select_member_name_counts(collection, &sel.cases, disambiguate);
                if merge_embedded {
                    for name in embedded.keys() {
                        *counts.entry(name.clone()).or_insert(0) += 1;
                    }
                } else {
                    for (name, count) in embedded {
                        *counts.entry(name).or_insert(0) += count;
                    }
                }
                continue;
            }
        }
        let name = if disambiguate {
            disambiguate_member_name(collection, m, owner_is_case)
        } else {
            collection.name_of(m).to_string()
        };
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}

/// A Select's own counts: the union of its cases' (always `owner_is_case =
/// true`, never merged further down — `core.py`'s `SelectDef.
/// getMemberNameCounts` doesn't propagate `mergeEmbedded` past one level).
fn select_member_name_counts(
    collection: &Collection,
    cases: &[DefId],
    disambiguate: bool,
) -> FxHashMap<String, u32> {
    let mut counts = FxHashMap::default();
    for &case in cases {
        let members = case_members(collection, case);
        let case_counts = member_name_counts(collection, members, true, true, disambiguate, false);
        for (name, count) in case_counts {
            *counts.entry(name).or_insert(0) += count;
        }
    }
    counts
}

fn case_members(collection: &Collection, case: DefId) -> &[DefId] {
    match collection.get(case) {
        Definition::Case(c) => &c.members,
        Definition::DefaultCase(dc) => &dc.members,
        _ => &[],
    }
}

/// Struct members keep their plain name. Case/DefaultCase members are
/// prefixed with their resolved type's name (`Type%name`) only when the
/// plain name recurs more than once across the whole enclosing select (not
/// just this case) — mirrors `core.py`'s `CaseDef.disambiguateMemberName`.
fn disambiguate_member_name(collection: &Collection, member: DefId, owner_is_case: bool) -> String {
    let plain = collection.name_of(member);
    if !owner_is_case {
        return plain.to_string();
    }
    let case = collection.parent_of(member);
    let root_select = root_select_of(collection, case);
    let Definition::Select(sel) = collection.get(root_select) else {
        return plain.to_string();
    };
    let root_counts = select_member_name_counts(collection, &sel.cases, false);
    if root_counts.get(plain).copied().unwrap_or(0) > 1 {
        let resolved = resolve_instance_chain(collection, member);
        format!("{}%{}", collection.name_of(resolved), plain)
    } else {
        plain.to_string()
    }
}

/// Walk up through nested Select/Case pairs to the outermost Select a case
/// belongs to. Mirrors `core.py`'s `CaseDef.getRootSelectDef`.
fn root_select_of(collection: &Collection, case: DefId) -> DefId {
    let select = collection.parent_of(case);
    let select_parent = collection.parent_of(select);
    match collection.get(select_parent) {
        Definition::Case(_) | Definition::DefaultCase(_) => root_select_of(collection, select_parent),
        _ => select,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etpl_ir::{CaseDef, DefCommon, DefaultCaseDef, InstanceDef, SelectDef, StructDef};
    use indexmap::IndexMap;
    use rustc_hash::FxHashSet;

    fn instance(name: &str, type_name: &str, parent: DefId) -> Definition {
        Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new(name, parent),
            type_name: type_name.into(),
            args: IndexMap::new(),
        }))
    }

    #[test]
    fn non_optional_after_optional_is_rejected() {
        let mut c = Collection::new(FxHashSet::default());
        let struct_id = c.alloc(Definition::Struct(StructDef {
            common: DefCommon::new("S", DefId::ROOT),
            members: Vec::new(),
        }));
        let mut opt = instance("a", "uint8", struct_id);
        opt.common_mut().flags.insert(DefFlags::OPTIONAL);
        let opt_id = c.alloc(opt);
        let req_id = c.alloc(instance("b", "uint8", struct_id));
        if let Definition::Struct(s) = c.get_mut(struct_id) {
            s.members = vec![opt_id, req_id];
        }

        let err = check_struct_like(&c, struct_id, &[opt_id, req_id], false).unwrap_err();
        assert_eq!(
            err,
            CheckError::NonOptAfterOpt { owner: c.chained_name(struct_id), member: "b".into() }
        );
    }

    #[test]
    fn duplicate_member_names_are_rejected() {
        let mut c = Collection::new(FxHashSet::default());
        let struct_id = c.alloc(Definition::Struct(StructDef {
            common: DefCommon::new("S", DefId::ROOT),
            members: Vec::new(),
        }));
        let a = c.alloc(instance("x", "uint8", struct_id));
        let b = c.alloc(instance("x", "uint8", struct_id));
        if let Definition::Struct(s) = c.get_mut(struct_id) {
            s.members = vec![a, b];
        }

        let err = check_struct_like(&c, struct_id, &[a, b], false).unwrap_err();
        assert_eq!(err, CheckError::DuplicateMember { owner: "S".into(), name: "x".into() });
    }

    #[test]
    fn distinctive_member_must_resolve_to_enum() {
        let mut c = Collection::new(FxHashSet::default());
        let struct_id = c.alloc(Definition::Struct(StructDef {
            common: DefCommon::new("S", DefId::ROOT),
            members: Vec::new(),
        }));
        let mut tag = instance("tag", "uint8", struct_id);
        tag.common_mut().flags.insert(DefFlags::DISTINCTIVE);
        let tag_id = c.alloc(tag);
        if let Definition::Struct(s) = c.get_mut(struct_id) {
            s.members = vec![tag_id];
        }

        let err = check_struct_like(&c, struct_id, &[tag_id], false).unwrap_err();
        assert_eq!(
            err,
            CheckError::DistinctiveNonEnum { owner: c.chained_name(struct_id), member: "tag".into() }
        );
    }

    #[test]
    fn embedded_select_disambiguates_by_resolved_type_when_name_recurs() {
        let mut c = Collection::new(FxHashSet::default());
        let struct_id = c.alloc(Definition::Struct(StructDef {
            common: DefCommon::new("S", DefId::ROOT),
            members: Vec::new(),
        }));
        let select_id = c.alloc(Definition::Select(Box::new(SelectDef {
            common: DefCommon::new("sel", struct_id),
            test_symbol: "tag".into(),
            cases: Vec::new(),
        })));

        let case_a = c.alloc(Definition::Case(CaseDef {
            common: DefCommon::new("caseA", select_id),
            cond: vec!["A".into()],
            members: Vec::new(),
        }));
        let a_payload = c.alloc(instance("payload", "uint8", case_a));
        if let Definition::Case(cd) = c.get_mut(case_a) {
            cd.members = vec![a_payload];
        }

        let case_b = c.alloc(Definition::Case(CaseDef {
            common: DefCommon::new("caseB", select_id),
            cond: vec!["B".into()],
            members: Vec::new(),
        }));
        let b_payload = c.alloc(instance("payload", "opaque", case_b));
        if let Definition::Case(cd) = c.get_mut(case_b) {
            cd.members = vec![b_payload];
        }

        let default_case = c.alloc(Definition::DefaultCase(DefaultCaseDef {
            common: DefCommon::new("default", select_id),
            members: Vec::new(),
        }));

        if let Definition::Select(sel) = c.get_mut(select_id) {
            sel.cases = vec![case_a, case_b, default_case];
        }
        if let Definition::Struct(s) = c.get_mut(struct_id) {
            s.members = vec![select_id];
        }

        // "payload" recurs in both cases with different resolved types, so
        // each case's member must disambiguate to "uint8%payload" /
        // "opaque%payload" rather than collapsing to the same name.
        assert_eq!(
            disambiguate_member_name(&c, a_payload, true),
            "uint8%payload"
        );
        assert_eq!(
            disambiguate_member_name(&c, b_payload, true),
            "opaque%payload"
        );

        check_struct_like(&c, struct_id, &[select_id], false).unwrap();
    }
}
