//! Arena handle for definitions.

use serde::{Deserialize, Serialize};

/// Index into [`crate::Collection`]'s definition arena.
///
/// Cross-references between definitions (parent links, Instance targets once
/// resolved, wrapper elements) are all `DefId`s rather than `Rc<RefCell<_>>`:
/// the tree lives in one flat `Vec<Definition>` and is walked by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel for "no parent", used only by the Collection root itself.
    pub const ROOT: DefId = DefId(u32::MAX);

    #[must_use]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for DefId {
    fn from(value: usize) -> Self {
        DefId(u32::try_from(value).expect("arena index exceeds u32::MAX"))
    }
}
