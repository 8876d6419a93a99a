//! `makeField`: hoist a nested definition to the Collection and leave an
//! `Instance` reference in its place (§4.2, §9's "central lowering").
//!
//! Grounded on `core.py`'s `TypeDef.makeField`.

use indexmap::IndexMap;

use etpl_ir::{Collection, DefCommon, DefFlags, DefId, Definition, InstanceDef, IntElement};

use crate::error::LoweringError;

/// Rename `id` to its chained name, promote it to a Collection top-level
/// definition, strip its per-use flags/size (replacing them with a fresh
/// parameter list for any symbol references that would otherwise break),
/// and return a new `Instance` definition to take its place at the call
/// site. The caller is responsible for setting the returned definition's
/// `parent` and allocating it.
pub fn make_field(out: &mut Collection, id: DefId) -> Result<Definition, LoweringError> {
    let required = etpl_resolve::required_symbols(out, id);
    let known = etpl_resolve::known_symbols(out, id);

    let mut broken: Vec<String> = known
        .into_iter()
        .filter(|(name, owner)| required.contains(name) && !owner.is_root())
        .map(|(name, _)| name)
        .collect();
    broken.sort();

    let field_args: IndexMap<String, IntElement> = broken
        .iter()
        .map(|name| (name.clone(), IntElement::symbol(name)))
        .collect();

    let field_name = out.name_of(id).to_string();
    let chained = out.chained_name(id);
    out.get_mut(id).common_mut().name = chained;
    out.promote_to_top_level(id)?;

    let field_flags = out.get(id).flags();
    let field_size = out.get(id).common().size.clone();

    {
        let common = out.get_mut(id).common_mut();
        common.flags = DefFlags::empty();
        common.size = None;
        common.params.extend(broken);
    }

    let mut field_common = DefCommon::new(field_name, DefId::ROOT);
    field_common.flags = field_flags;
    field_common.size = field_size;

    Ok(Definition::Instance(Box::new(InstanceDef {
        common: field_common,
        type_name: out.name_of(id).to_string(),
        args: field_args,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use etpl_ir::{Size, StructDef};
    use rustc_hash::FxHashSet;

    #[test]
    fn promotes_plain_instance_field() {
        let mut out = Collection::new(FxHashSet::default());
        let inst = out.alloc(Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("foo", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        })));
        let field = make_field(&mut out, inst).unwrap();
        assert_eq!(out.name_of(inst), "foo");
        assert!(!out.is_builtin(inst));
        match field {
            Definition::Instance(i) => {
                assert_eq!(i.common.name, "foo");
                assert_eq!(i.type_name, "foo");
            }
            _ => panic!("expected Instance"),
        }
    }

    #[test]
    fn broken_struct_sibling_reference_becomes_a_parameter() {
        let mut out = Collection::new(FxHashSet::default());
        let struct_id = out.alloc(Definition::Struct(StructDef {
            common: DefCommon::new("S", DefId::ROOT),
            members: Vec::new(),
        }));
        let len_field = out.alloc(Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("len", struct_id),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        })));
        let mut field_common = DefCommon::new("payload", struct_id);
        field_common.size = Some(Size::bytes(IntElement::symbol("len")));
        let field_id = out.alloc(Definition::Instance(Box::new(InstanceDef {
            common: field_common,
            type_name: "opaque".into(),
            args: IndexMap::new(),
        })));
        if let Definition::Struct(s) = out.get_mut(struct_id) {
            s.members.push(len_field);
            s.members.push(field_id);
        }

        let replacement = make_field(&mut out, field_id).unwrap();
        // the promoted definition gains "len" as a parameter
        assert!(out.get(field_id).common().params.contains(&"len".to_string()));
        match replacement {
            Definition::Instance(i) => {
                assert_eq!(i.common.size, Some(Size::bytes(IntElement::symbol("len"))));
                assert!(i.args.contains_key("len"));
            }
            _ => panic!("expected Instance"),
        }
    }
}
