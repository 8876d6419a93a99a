//! The eTPL intermediate representation: a flat arena of [`Definition`]s
//! addressed by [`DefId`], plus the [`Collection`] that owns them.
//!
//! This crate only models the tree and the handful of whole-collection
//! operations that don't belong to a later pass (dependency sort, type-ID
//! assignment, built-in population). Symbol resolution lives in
//! `etpl-resolve`, normalisation in `etpl-lowering`, structural validation in
//! `etpl-checker`, and the width/feature algebra in `etpl-algebra`.

pub mod collection;
pub mod def_id;
pub mod definition;
pub mod enum_item;
pub mod error;
pub mod flags;
pub mod int_element;
pub mod naming;
pub mod size;

pub use collection::{Collection, CollectionState};
pub use def_id::DefId;
pub use definition::{
    CaseDef, ConstDef, DefCommon, DefaultCaseDef, Definition, DynamicVectorDef, EnumDef,
    FixedDef, FixedKind, FragmentDef, InstanceDef, IntDef, OpaqueDef, SelectDef, StaticVectorDef,
    StructDef,
};
pub use enum_item::EnumItem;
pub use error::IrError;
pub use flags::DefFlags;
pub use int_element::{IntElement, IntOp};
pub use naming::unique_name;
pub use size::Size;
