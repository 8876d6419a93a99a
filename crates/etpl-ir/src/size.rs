//! Size overrides and vector length bounds (§3.1: "optional size override
//! (integer literal or symbol, with a bit or byte unit)").

use etpl_common::SizeUnit;
use serde::{Deserialize, Serialize};

use crate::int_element::IntElement;

/// A `size(...)` override, or a static/dynamic vector's length bound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub value: IntElement,
    pub unit: SizeUnit,
}

impl Size {
    #[must_use]
    pub fn new(value: IntElement, unit: SizeUnit) -> Self {
        Size { value, unit }
    }

    #[must_use]
    pub fn bits(value: IntElement) -> Self {
        Size::new(value, SizeUnit::Bit)
    }

    #[must_use]
    pub fn bytes(value: IntElement) -> Self {
        Size::new(value, SizeUnit::Byte)
    }

    /// The value expressed in raw bits, when the value is a resolved literal.
    #[must_use]
    pub fn as_bits(&self) -> Option<i64> {
        self.value
            .as_literal()
            .map(|v| v * self.unit.bit_scale() as i64)
    }
}
