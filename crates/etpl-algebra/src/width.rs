//! Raw bit width (§4.6's `rawBitWidth`): the wire size of a definition when
//! every symbol it depends on can be resolved from `env`.
//!
//! Grounded on `core.py`'s per-kind `getRawBitWidth` overrides.

use rustc_hash::FxHashMap;

use etpl_ir::{Collection, DefId, Definition};

use crate::error::AlgebraError;

/// Symbol name -> value bindings in scope for resolving a node's symbolic
/// size/length/argument expressions — the union of an Instance's own
/// arguments and whatever the caller supplies as external selections.
/// Mirrors `core.py`'s `args`/`selections` dicts: a map, not a multiset, so
/// a later binding for a name always replaces an earlier one instead of
/// both coexisting.
pub type Env = FxHashMap<String, i64>;

/// The wire size, in bits, of `id` given `env`. Fails if a symbolic length
/// can't be resolved, or the node's kind has no statically knowable width
/// (`DynamicVector`; a `Select`, which `core.py` never defines a width for
/// either).
pub fn raw_bit_width(collection: &Collection, id: DefId, env: &Env) -> Result<i64, AlgebraError> {
    let name = || collection.name_of(id).to_string();
    match collection.get(id) {
        Definition::Int(d) => Ok(i64::from(d.width)),
        Definition::Fixed(d) => Ok(i64::from(d.kind.width())),
        Definition::Opaque(_) => {
            let nbytes = env.get("nbytes").copied();
            let nbits = env.get("nbits").copied();
            if nbytes.is_none() && nbits.is_none() {
                Err(AlgebraError::WidthUndetermined { name: name() })
            } else {
                Ok(8 * nbytes.unwrap_or(0) + nbits.unwrap_or(0))
            }
        }
        Definition::Const(_) | Definition::Select(_) => {
            Err(AlgebraError::WidthUndetermined { name: name() })
        }
        Definition::Instance(inst) => {
            let target = collection
                .lookup(&inst.type_name)
                .ok_or_else(|| AlgebraError::UnknownType { name: inst.type_name.clone() })?;
            let mut merged = env.clone();
            for (arg_name, expr) in &inst.args {
                if let Some(value) = expr.resolve(env) {
                    merged.insert(arg_name.clone(), value);
                }
            }
            raw_bit_width(collection, target, &merged)
        }
        Definition::StaticVector(v) => {
            let length = v
                .length
                .as_ref()
                .and_then(|l| l.resolve(env))
                .ok_or_else(|| AlgebraError::WidthUndetermined { name: name() })?;
            if v.item_based {
                let element_width = raw_bit_width(collection, v.element, env)?;
                Ok(element_width * length)
            } else {
                Ok(length * i64::try_from(v.unit.bit_scale()).unwrap_or(i64::MAX))
            }
        }
        Definition::DynamicVector(_) => Err(AlgebraError::WidthUndetermined { name: name() }),
        // `FragmentDef`/`WrapperDef` never override `getRawBitWidth` in
        // core.py; both inherit `TypeDef.getRawBitWidth`'s unconditional
        // "Undefined raw bit width for abstract type".
        Definition::Fragment(_) => Err(AlgebraError::WidthUndetermined { name: name() }),
        Definition::Enum(e) => Ok(enum_bit_width(e)),
        Definition::Struct(s) => sum_members(collection, &s.members, env),
        Definition::Case(c) => sum_members(collection, &c.members, env),
        Definition::DefaultCase(dc) => sum_members(collection, &dc.members, env),
    }
}

fn sum_members(collection: &Collection, members: &[DefId], env: &Env) -> Result<i64, AlgebraError> {
    members.iter().try_fold(0i64, |acc, &m| Ok(acc + raw_bit_width(collection, m, env)?))
}

/// `core.py`'s `EnumDef.getEnumBitWidth`: `getNDigits(maxCode, 2)`, the
/// smallest `i` with `2^i > maxCode`.
fn enum_bit_width(e: &etpl_ir::EnumDef) -> i64 {
    let max_code = e.items.iter().filter_map(etpl_ir::EnumItem::max_code_value).max().unwrap_or(0);
    let mut i = 0u32;
    loop {
        match 2i64.checked_pow(i) {
            Some(v) if v > max_code => return i64::from(i),
            None => return i64::from(i),
            _ => i += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etpl_ir::{DefCommon, EnumItem, InstanceDef, IntElement};
    use indexmap::IndexMap;

    #[test]
    fn builtin_int_widths_are_fixed() {
        let c = Collection::new(rustc_hash::FxHashSet::default());
        let id = c.lookup("uint16").unwrap();
        assert_eq!(raw_bit_width(&c, id, &Env::default()).unwrap(), 16);
    }

    #[test]
    fn opaque_width_comes_from_instance_args() {
        let mut c = Collection::new(rustc_hash::FxHashSet::default());
        let id = c
            .add_top_level(
                Definition::Instance(Box::new(InstanceDef {
                    common: DefCommon::new("Blob", DefId::ROOT),
                    type_name: "opaque".into(),
                    args: IndexMap::from_iter([("nbytes".to_string(), IntElement::Literal(4))]),
                })),
                false,
            )
            .unwrap();
        assert_eq!(raw_bit_width(&c, id, &Env::default()).unwrap(), 32);
    }

    #[test]
    fn struct_width_sums_its_members() {
        let mut c = Collection::new(rustc_hash::FxHashSet::default());
        let struct_id = c.alloc(Definition::Struct(etpl_ir::StructDef {
            common: DefCommon::new("S", DefId::ROOT),
            members: Vec::new(),
        }));
        let a = c.alloc(Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("a", struct_id),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        })));
        let b = c.alloc(Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("b", struct_id),
            type_name: "uint16".into(),
            args: IndexMap::new(),
        })));
        if let Definition::Struct(s) = c.get_mut(struct_id) {
            s.members = vec![a, b];
        }
        assert_eq!(raw_bit_width(&c, struct_id, &Env::default()).unwrap(), 24);
    }

    #[test]
    fn dynamic_vector_width_is_undetermined() {
        let mut c = Collection::new(rustc_hash::FxHashSet::default());
        let elem = c.alloc(Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        })));
        let id = c
            .add_top_level(
                Definition::DynamicVector(Box::new(etpl_ir::DynamicVectorDef {
                    common: DefCommon::new("Payload", DefId::ROOT),
                    element: elem,
                    length_min: 0,
                    length_max: 255,
                    unit: etpl_common::SizeUnit::Byte,
                    item_based: true,
                })),
                false,
            )
            .unwrap();
        assert!(matches!(
            raw_bit_width(&c, id, &Env::default()),
            Err(AlgebraError::WidthUndetermined { .. })
        ));
    }

    #[test]
    fn fragment_width_is_undetermined_even_when_its_element_is_known() {
        let mut c = Collection::new(rustc_hash::FxHashSet::default());
        let elem = c.alloc(Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        })));
        let id = c
            .add_top_level(
                Definition::Fragment(Box::new(etpl_ir::FragmentDef {
                    common: DefCommon::new("Frag", DefId::ROOT),
                    element: elem,
                })),
                false,
            )
            .unwrap();
        assert!(matches!(
            raw_bit_width(&c, id, &Env::default()),
            Err(AlgebraError::WidthUndetermined { .. })
        ));
    }

    #[test]
    fn opaque_width_with_a_zero_selection_is_determined_not_undetermined() {
        // `opaque x[n]` with `selections = {n: 0}`: a legitimate zero-length
        // trailing payload, distinct from `n` being absent from `env`.
        let mut c = Collection::new(rustc_hash::FxHashSet::default());
        let id = c
            .add_top_level(
                Definition::Instance(Box::new(InstanceDef {
                    common: DefCommon::new("Blob", DefId::ROOT),
                    type_name: "opaque".into(),
                    args: IndexMap::from_iter([("nbytes".to_string(), IntElement::symbol("n"))]),
                })),
                false,
            )
            .unwrap();
        let env = Env::from_iter([("n".to_string(), 0i64)]);
        assert_eq!(raw_bit_width(&c, id, &env).unwrap(), 0);
    }

    #[test]
    fn enum_width_fits_the_largest_code() {
        let e = etpl_ir::EnumDef {
            common: DefCommon::new("E", DefId::ROOT),
            items: vec![
                EnumItem::Named { name: "A".into(), min_code: IntElement::Literal(0), max_code: IntElement::Literal(0) },
                EnumItem::Named { name: "B".into(), min_code: IntElement::Literal(3), max_code: IntElement::Literal(3) },
            ],
        };
        assert_eq!(enum_bit_width(&e), 2);
    }
}
