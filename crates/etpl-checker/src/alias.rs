//! Alias-chain helpers shared by the per-kind rule checks. Mirrors
//! `core.py`'s `InstanceDef.followInstantiation`, which walks an Instance's
//! `type_name` through the collection until it lands on a non-Instance
//! definition.

use etpl_ir::{Collection, DefId, Definition};

/// Follow `id` through any chain of `Instance` aliases and return the
/// `DefId` of the first non-Instance definition reached. Returns `id`
/// itself if it isn't an Instance, or if an alias names a type the
/// collection has no record of (a dangling reference, reported elsewhere by
/// the symbol/scope engine rather than here).
#[must_use]
pub fn resolve_instance_chain(collection: &Collection, id: DefId) -> DefId {
    match collection.get(id) {
        Definition::Instance(inst) => match collection.lookup(&inst.type_name) {
            Some(target) if target != id => resolve_instance_chain(collection, target),
            _ => id,
        },
        _ => id,
    }
}

/// Whether `id`, after following any Instance alias chain, names an Enum.
/// Grounds invariant 6 (`distinctive` members must resolve to an enum).
#[must_use]
pub fn resolves_to_enum(collection: &Collection, id: DefId) -> bool {
    matches!(collection.get(resolve_instance_chain(collection, id)), Definition::Enum(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use etpl_ir::{DefCommon, EnumItem, InstanceDef};
    use indexmap::IndexMap;
    use rustc_hash::FxHashSet;

    #[test]
    fn follows_a_chain_of_aliases_to_the_enum() {
        let mut c = Collection::new(FxHashSet::default());
        let enum_id = c
            .add_top_level(
                Definition::Enum(etpl_ir::EnumDef {
                    common: DefCommon::new("Color", DefId::ROOT),
                    items: vec![EnumItem::Named {
                        name: "Red".into(),
                        min_code: etpl_ir::IntElement::Literal(0),
                        max_code: etpl_ir::IntElement::Literal(0),
                    }],
                }),
                false,
            )
            .unwrap();
        c.add_top_level(
            Definition::Instance(Box::new(InstanceDef {
                common: DefCommon::new("ColorAlias", DefId::ROOT),
                type_name: "Color".into(),
                args: IndexMap::new(),
            })),
            false,
        )
        .unwrap();
        let field = c.alloc(Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("c", DefId::ROOT),
            type_name: "ColorAlias".into(),
            args: IndexMap::new(),
        })));

        assert_eq!(resolve_instance_chain(&c, field), enum_id);
        assert!(resolves_to_enum(&c, field));
    }

    #[test]
    fn non_enum_target_is_reported_as_such() {
        let mut c = Collection::new(FxHashSet::default());
        let field = c.alloc(Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("n", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        })));
        assert!(!resolves_to_enum(&c, field));
    }
}
