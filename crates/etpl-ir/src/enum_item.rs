//! Enum item shapes (§3.1: "ordered items: Named(name, minCode, maxCode),
//! Anonymous(minCode,maxCode), Fallback(name?)").

use serde::{Deserialize, Serialize};

use crate::int_element::IntElement;

/// One entry in an Enum definition's ordered item list.
///
/// Grounded in `core.py`'s `EnumItem`/`EnumItemFallback` pair, collapsed
/// into a single tagged type since Rust has no need for the abstract base
/// class `EnumItemAbstract` was standing in for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnumItem {
    Named {
        name: String,
        min_code: IntElement,
        max_code: IntElement,
    },
    Anonymous {
        min_code: IntElement,
        max_code: IntElement,
    },
    Fallback {
        name: Option<String>,
    },
}

impl EnumItem {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            EnumItem::Named { name, .. } => Some(name),
            EnumItem::Anonymous { .. } => None,
            EnumItem::Fallback { name } => name.as_deref(),
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, EnumItem::Fallback { .. })
    }

    /// The item's maximum code value, when resolvable as a literal. Fallback
    /// items have no code and contribute nothing to the enum's bit width.
    #[must_use]
    pub fn max_code_value(&self) -> Option<i64> {
        match self {
            EnumItem::Named { max_code, .. } | EnumItem::Anonymous { max_code, .. } => {
                max_code.as_literal()
            }
            EnumItem::Fallback { .. } => None,
        }
    }

    #[must_use]
    pub fn is_range(&self) -> bool {
        match self {
            EnumItem::Named { min_code, max_code, .. }
            | EnumItem::Anonymous { min_code, max_code } => min_code != max_code,
            EnumItem::Fallback { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_item_exposes_its_name() {
        let item = EnumItem::Named {
            name: "red".into(),
            min_code: IntElement::Literal(1),
            max_code: IntElement::Literal(1),
        };
        assert_eq!(item.name(), Some("red"));
        assert!(!item.is_range());
    }

    #[test]
    fn fallback_item_has_no_code() {
        let item = EnumItem::Fallback { name: Some("other".into()) };
        assert!(item.is_fallback());
        assert_eq!(item.max_code_value(), None);
    }

    #[test]
    fn range_item_reports_is_range() {
        let item = EnumItem::Anonymous {
            min_code: IntElement::Literal(1),
            max_code: IntElement::Literal(4),
        };
        assert!(item.is_range());
        assert_eq!(item.max_code_value(), Some(4));
    }
}
