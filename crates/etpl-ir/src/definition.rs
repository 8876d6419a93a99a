//! The `Definition` tagged-variant enum: one entry per §3.1 entity kind.
//!
//! Follows the teacher's `Type` enum shape (`tsz-checker::types::type_def`):
//! a flat enum wrapping per-kind structs, large variants boxed to keep the
//! enum small, with a shared "common fields" struct embedded in every
//! variant's payload and a dispatcher method for the fields every kind
//! shares (name, flags, size, parameters, parent, type-ID).

use etpl_common::{SizeUnit, Signedness};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::def_id::DefId;
use crate::enum_item::EnumItem;
use crate::flags::DefFlags;
use crate::int_element::IntElement;
use crate::size::Size;

/// Fields every non-root Definition carries (§3.1's closing paragraph).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefCommon {
    pub name: String,
    pub parent: DefId,
    pub flags: DefFlags,
    pub size: Option<Size>,
    pub params: Vec<String>,
    pub type_id: Option<u32>,
    /// Source line, when the definition came from the surface parser
    /// (§6.1: "Each definition carries an optional source line number").
    pub line: Option<u32>,
}

impl DefCommon {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: DefId) -> Self {
        DefCommon {
            name: name.into(),
            parent,
            flags: DefFlags::empty(),
            size: None,
            params: Vec::new(),
            type_id: None,
            line: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntDef {
    pub common: DefCommon,
    pub width: u8,
    pub signedness: Signedness,
}

/// Bit (width 1) or Byte (width 8): the two fixed-width built-in opaques.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedKind {
    Bit,
    Byte,
}

impl FixedKind {
    #[must_use]
    pub const fn width(self) -> u8 {
        match self {
            FixedKind::Bit => 1,
            FixedKind::Byte => 8,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixedDef {
    pub common: DefCommon,
    pub kind: FixedKind,
}

/// The `opaque` built-in, parameterised by `nbits`/`nbytes`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpaqueDef {
    pub common: DefCommon,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstDef {
    pub common: DefCommon,
    pub value: i64,
}

/// An Instance: either a top-level alias (parent is the Collection root) or
/// a struct field promoted in place of a compound member (§4.2's
/// `makeField`). `isAlias` is derived from the parent link, never stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstanceDef {
    pub common: DefCommon,
    pub type_name: String,
    pub args: IndexMap<String, IntElement>,
}

impl InstanceDef {
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.common.parent.is_root()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaticVectorDef {
    pub common: DefCommon,
    pub element: DefId,
    pub length: Option<IntElement>,
    pub unit: SizeUnit,
    pub item_based: bool,
}

/// `length_min`/`length_max` are always integer literals (§3.1): the surface
/// grammar's `<a..b>` range bounds, never symbolic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DynamicVectorDef {
    pub common: DefCommon,
    pub element: DefId,
    pub length_min: i64,
    pub length_max: i64,
    pub unit: SizeUnit,
    pub item_based: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FragmentDef {
    pub common: DefCommon,
    pub element: DefId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnumDef {
    pub common: DefCommon,
    pub items: Vec<EnumItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StructDef {
    pub common: DefCommon,
    pub members: Vec<DefId>,
}

/// A `case <cond>:` branch of a Select; `cond` is the (possibly
/// multi-valued) set of enum item names it matches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseDef {
    pub common: DefCommon,
    pub cond: Vec<String>,
    pub members: Vec<DefId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultCaseDef {
    pub common: DefCommon,
    pub members: Vec<DefId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectDef {
    pub common: DefCommon,
    pub test_symbol: String,
    pub cases: Vec<DefId>,
}

/// All possible definition variants. Large variants are boxed to keep the
/// enum small.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Definition {
    Int(IntDef),
    Fixed(FixedDef),
    Opaque(OpaqueDef),
    Const(ConstDef),
    Instance(Box<InstanceDef>),
    StaticVector(Box<StaticVectorDef>),
    DynamicVector(Box<DynamicVectorDef>),
    Fragment(Box<FragmentDef>),
    Enum(EnumDef),
    Struct(StructDef),
    Case(CaseDef),
    DefaultCase(DefaultCaseDef),
    Select(Box<SelectDef>),
}

impl Definition {
    #[must_use]
    pub fn common(&self) -> &DefCommon {
        match self {
            Definition::Int(d) => &d.common,
            Definition::Fixed(d) => &d.common,
            Definition::Opaque(d) => &d.common,
            Definition::Const(d) => &d.common,
            Definition::Instance(d) => &d.common,
            Definition::StaticVector(d) => &d.common,
            Definition::DynamicVector(d) => &d.common,
            Definition::Fragment(d) => &d.common,
            Definition::Enum(d) => &d.common,
            Definition::Struct(d) => &d.common,
            Definition::Case(d) => &d.common,
            Definition::DefaultCase(d) => &d.common,
            Definition::Select(d) => &d.common,
        }
    }

    #[must_use]
    pub fn common_mut(&mut self) -> &mut DefCommon {
        match self {
            Definition::Int(d) => &mut d.common,
            Definition::Fixed(d) => &mut d.common,
            Definition::Opaque(d) => &mut d.common,
            Definition::Const(d) => &mut d.common,
            Definition::Instance(d) => &mut d.common,
            Definition::StaticVector(d) => &mut d.common,
            Definition::DynamicVector(d) => &mut d.common,
            Definition::Fragment(d) => &mut d.common,
            Definition::Enum(d) => &mut d.common,
            Definition::Struct(d) => &mut d.common,
            Definition::Case(d) => &mut d.common,
            Definition::DefaultCase(d) => &mut d.common,
            Definition::Select(d) => &mut d.common,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.common().name
    }

    #[must_use]
    pub fn flags(&self) -> DefFlags {
        self.common().flags
    }

    #[must_use]
    pub fn parent(&self) -> DefId {
        self.common().parent
    }

    /// A human-readable kind tag, used in diagnostics and `getTypeStr`-style
    /// rendering.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Definition::Int(d) => match d.signedness {
                Signedness::Signed => "sint",
                Signedness::Unsigned => "uint",
            },
            Definition::Fixed(d) => match d.kind {
                FixedKind::Bit => "bit",
                FixedKind::Byte => "byte",
            },
            Definition::Opaque(_) => "opaque",
            Definition::Const(_) => "const",
            Definition::Instance(_) => "instance",
            Definition::StaticVector(_) => "static_vector",
            Definition::DynamicVector(_) => "dynamic_vector",
            Definition::Fragment(_) => "fragment",
            Definition::Enum(_) => "enum",
            Definition::Struct(_) => "struct",
            Definition::Case(_) => "case",
            Definition::DefaultCase(_) => "default_case",
            Definition::Select(_) => "select",
        }
    }

    /// Whether this definition is a "real" (space-occupying) type, as
    /// opposed to a control construct like Case/DefaultCase/Select that only
    /// wraps real members. Mirrors `core.py`'s `isReal()`.
    #[must_use]
    pub fn is_real(&self) -> bool {
        !matches!(
            self,
            Definition::Case(_) | Definition::DefaultCase(_) | Definition::Select(_)
        )
    }

    /// Direct structural children, in order. Mirrors `core.py`'s
    /// `getChildren()`: wrappers yield their element, Struct yields its
    /// members, Select yields its cases.
    #[must_use]
    pub fn children(&self) -> Vec<DefId> {
        match self {
            Definition::StaticVector(d) => vec![d.element],
            Definition::DynamicVector(d) => vec![d.element],
            Definition::Fragment(d) => vec![d.element],
            Definition::Struct(d) => d.members.clone(),
            Definition::Case(d) => d.members.clone(),
            Definition::DefaultCase(d) => d.members.clone(),
            Definition::Select(d) => d.cases.clone(),
            _ => Vec::new(),
        }
    }
}
