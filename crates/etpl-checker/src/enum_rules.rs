//! Enum structural rule: at most one Fallback item.
//!
//! Grounded on `core.py`'s `EnumDef.selfCheck`.

use etpl_ir::{Collection, DefId, Definition, EnumDef};

use crate::error::CheckError;

pub fn check_enum(collection: &Collection, id: DefId, e: &EnumDef) -> Result<(), CheckError> {
    let fallback_count = e.items.iter().filter(|item| item.is_fallback()).count();
    if fallback_count > 1 {
        return Err(CheckError::MultipleFallback { name: collection.name_of(id).to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use etpl_ir::{DefCommon, EnumItem};
    use rustc_hash::FxHashSet;

    #[test]
    fn a_single_fallback_is_allowed() {
        let mut c = Collection::new(FxHashSet::default());
        let e = EnumDef {
            common: DefCommon::new("E", DefId::ROOT),
            items: vec![
                EnumItem::Named {
                    name: "A".into(),
                    min_code: etpl_ir::IntElement::Literal(0),
                    max_code: etpl_ir::IntElement::Literal(0),
                },
                EnumItem::Fallback { name: None },
            ],
        };
        let id = c.add_top_level(Definition::Enum(e.clone()), false).unwrap();
        assert!(check_enum(&c, id, &e).is_ok());
    }

    #[test]
    fn two_fallbacks_are_rejected() {
        let mut c = Collection::new(FxHashSet::default());
        let e = EnumDef {
            common: DefCommon::new("E", DefId::ROOT),
            items: vec![
                EnumItem::Fallback { name: Some("a".into()) },
                EnumItem::Fallback { name: Some("b".into()) },
            ],
        };
        let id = c.add_top_level(Definition::Enum(e.clone()), false).unwrap();
        assert_eq!(check_enum(&c, id, &e).unwrap_err(), CheckError::MultipleFallback { name: "E".into() });
    }
}
