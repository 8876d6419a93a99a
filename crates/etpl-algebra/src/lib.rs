//! Width, dynamic-type, and feature-path algebra for eTPL type definitions
//! (§4.6). Consumes a `Collection` that has already passed `etpl-resolve`'s
//! symbol closure and `etpl-checker`'s structural invariants; this crate
//! assumes that input is well-formed and surfaces its own narrower set of
//! errors only for the unresolved-symbol / unknown-type cases the checker
//! doesn't already rule out (a caller supplying too few arguments, an
//! `Instance` whose target hasn't been looked up yet).

pub mod dynamic_type;
pub mod error;
pub mod features;
pub mod width;

pub use dynamic_type::dynamic_type_names;
pub use error::AlgebraError;
pub use features::{features, sort_key};
pub use width::{raw_bit_width, Env};
