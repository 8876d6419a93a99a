//! Per-definition flag set (§3.1: "flag set drawn from {extern, optional,
//! distinctive}").

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct DefFlags: u8 {
        /// Declared `extern`: the field's storage is supplied by the caller,
        /// not read from the wire.
        const EXTERN = 1 << 0;
        /// Declared `optional`: may be absent; once one member of a struct is
        /// optional every later member must be too (inv. 5).
        const OPTIONAL = 1 << 1;
        /// Declared `distinctive`: contributes to the enclosing struct's
        /// dynamic type; must resolve to an Enum (inv. 6).
        const DISTINCTIVE = 1 << 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_and_query() {
        let f = DefFlags::OPTIONAL | DefFlags::DISTINCTIVE;
        assert!(f.contains(DefFlags::OPTIONAL));
        assert!(f.contains(DefFlags::DISTINCTIVE));
        assert!(!f.contains(DefFlags::EXTERN));
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(DefFlags::default(), DefFlags::empty());
    }
}
