//! The normaliser (§4.2): rewrites a raw [`Collection`](etpl_ir::Collection)
//! into one where every struct member is either an `Instance` reference to a
//! top-level definition or one of the three kinds left inline (Fragment,
//! Select, StaticVector), and every `DynamicVector` has been lowered into a
//! `Struct{_N, _V}` pair.
//!
//! Grounded on `examples/original_source/normalize.py` and `core.py`'s
//! `TypeDef.makeField`.

pub mod error;
pub mod field;
pub mod normalize;

pub use error::LoweringError;
pub use field::make_field;
pub use normalize::normalize;
