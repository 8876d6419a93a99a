//! The `Collection`: root container of the definition arena, the single
//! owner of every `Definition` in a compilation (§3.1, §3.4).
//!
//! Grounded on `core.py`'s `TypeDefCollection` for behaviour (built-in
//! pre-population, `addDef`/`sort`/`generateTypeIDs`), re-expressed as a flat
//! arena per §9's design note rather than a Python list of `Rc`-like
//! objects.

use rustc_hash::FxHashSet;

use crate::def_id::DefId;
use crate::definition::{
    DefCommon, Definition, FixedDef, FixedKind, IntDef, OpaqueDef,
};
use crate::error::IrError;
use crate::naming::unique_name;
use etpl_common::Signedness;

/// Where a `Collection` sits in the pipeline (§4.7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionState {
    Raw,
    Normal,
    Sorted,
    Identified,
    Validated,
}

/// Owns every `Definition` in a compilation, addressed by [`DefId`].
///
/// `arena` holds *every* node reachable from the root, including nested
/// struct members, vector elements, and select cases — anything a
/// `Definition` variant points at via a `DefId`. `top_level` holds only the
/// Collection's direct children (what `core.py` calls `self.typedefs`), in
/// insertion order; built-ins occupy its front per `TypeDefCollection.__init__`.
#[derive(Clone, Debug)]
pub struct Collection {
    arena: Vec<Definition>,
    top_level: Vec<DefId>,
    builtin_count: usize,
    global_symbols: FxHashSet<String>,
    state: CollectionState,
}

impl Collection {
    #[must_use]
    pub fn new(global_symbols: FxHashSet<String>) -> Self {
        let mut c = Collection {
            arena: Vec::new(),
            top_level: Vec::new(),
            builtin_count: 0,
            global_symbols,
            state: CollectionState::Raw,
        };
        c.populate_builtins();
        c
    }

    fn populate_builtins(&mut self) {
        for width in 1u8..=64 {
            self.push_builtin(Definition::Int(IntDef {
                common: {
                    let mut common = DefCommon::new(format!("uint{width}"), DefId::ROOT);
                    common.params = vec!["min".into(), "max".into()];
                    common
                },
                width,
                signedness: Signedness::Unsigned,
            }));
        }
        for width in 1u8..=64 {
            self.push_builtin(Definition::Int(IntDef {
                common: {
                    let mut common = DefCommon::new(format!("sint{width}"), DefId::ROOT);
                    common.params = vec!["min".into(), "max".into()];
                    common
                },
                width,
                signedness: Signedness::Signed,
            }));
        }
        self.push_builtin(Definition::Fixed(FixedDef {
            common: DefCommon::new("bit", DefId::ROOT),
            kind: FixedKind::Bit,
        }));
        self.push_builtin(Definition::Fixed(FixedDef {
            common: DefCommon::new("byte", DefId::ROOT),
            kind: FixedKind::Byte,
        }));
        self.push_builtin(Definition::Opaque(OpaqueDef {
            common: {
                let mut common = DefCommon::new("opaque", DefId::ROOT);
                common.params = vec!["nbits".into(), "nbytes".into()];
                common
            },
        }));
        self.builtin_count = self.top_level.len();
    }

    fn push_builtin(&mut self, def: Definition) {
        let id = DefId::from(self.arena.len());
        self.arena.push(def);
        self.top_level.push(id);
    }

    /// Allocate a new arena slot for a nested node (struct member, vector
    /// element, select case, ...) and return its handle. Callers are
    /// responsible for linking the new id into its parent's child list.
    pub fn alloc(&mut self, def: Definition) -> DefId {
        let id = DefId::from(self.arena.len());
        self.arena.push(def);
        id
    }

    /// Add a top-level definition (a Collection child). When
    /// `auto_update_name` is set the name is disambiguated against existing
    /// top-level names (§3.1's `_2`, `_3`, ... rule); otherwise a clash is a
    /// hard error, mirroring `core.py`'s `addDef(typedef, autoUpdateName)`.
    pub fn add_top_level(
        &mut self,
        mut def: Definition,
        auto_update_name: bool,
    ) -> Result<DefId, IrError> {
        if def.name().is_empty() {
            return Err(IrError::EmptyName);
        }
        let existing: Vec<String> = self.top_level.iter().map(|id| self.name_of(*id).to_string()).collect();
        if auto_update_name {
            let unique = unique_name(&existing, def.name());
            def.common_mut().name = unique;
        } else if existing.iter().any(|n| n == def.name()) {
            return Err(IrError::DuplicateName(def.name().to_string()));
        }
        let id = DefId::from(self.arena.len());
        def.common_mut().parent = DefId::ROOT;
        self.arena.push(def);
        self.top_level.push(id);
        Ok(id)
    }

    /// Register an *already-allocated* definition as a top-level entry,
    /// without moving it in the arena. Used when normalisation promotes a
    /// nested node up to the Collection (§4.2's `makeField`): the node keeps
    /// its arena identity, it just gains a place in `top_level` and its
    /// parent link is rewritten to the root.
    pub fn promote_to_top_level(&mut self, id: DefId) -> Result<(), IrError> {
        let name = self.name_of(id).to_string();
        if name.is_empty() {
            return Err(IrError::EmptyName);
        }
        if self.top_level.iter().any(|&t| self.name_of(t) == name) {
            return Err(IrError::DuplicateName(name));
        }
        self.get_mut(id).common_mut().parent = DefId::ROOT;
        self.top_level.push(id);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: DefId) -> &Definition {
        &self.arena[id.index()]
    }

    pub fn get_mut(&mut self, id: DefId) -> &mut Definition {
        &mut self.arena[id.index()]
    }

    #[must_use]
    pub fn name_of(&self, id: DefId) -> &str {
        self.get(id).name()
    }

    #[must_use]
    pub fn parent_of(&self, id: DefId) -> DefId {
        self.get(id).parent()
    }

    #[must_use]
    pub fn top_level(&self) -> &[DefId] {
        &self.top_level
    }

    /// Non-built-in top-level definitions, in current order. Mirrors
    /// `core.py`'s `getTypeDefs(includeBuiltIn=False)`.
    pub fn user_defined(&self) -> impl Iterator<Item = DefId> + '_ {
        self.top_level.iter().copied().filter(move |id| !self.is_builtin(*id))
    }

    #[must_use]
    pub fn is_builtin(&self, id: DefId) -> bool {
        self.top_level
            .iter()
            .take(self.builtin_count)
            .any(|&b| b == id)
    }

    #[must_use]
    pub fn global_symbols(&self) -> &FxHashSet<String> {
        &self.global_symbols
    }

    pub fn add_global_symbol(&mut self, name: impl Into<String>) {
        self.global_symbols.insert(name.into());
    }

    #[must_use]
    pub fn state(&self) -> CollectionState {
        self.state
    }

    pub fn set_state(&mut self, state: CollectionState) {
        self.state = state;
    }

    #[must_use]
    pub fn type_names(&self) -> FxHashSet<String> {
        self.top_level.iter().map(|id| self.name_of(*id).to_string()).collect()
    }

    /// Look up a top-level definition by name, the arena analogue of
    /// `core.py`'s `TypeDefCollection.__getitem__(str)`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<DefId> {
        self.top_level.iter().copied().find(|id| self.name_of(*id) == name)
    }

    /// Every Const definition's name — part of Collection's known-symbols
    /// set (§4.1).
    #[must_use]
    pub fn const_names(&self) -> FxHashSet<String> {
        self.top_level
            .iter()
            .filter_map(|&id| match self.get(id) {
                Definition::Const(c) => Some(c.common.name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Root-to-node chained name (§3.1/§9): join the names from Collection
    /// down to (and including) `id` with `_`, excluding the Collection
    /// itself. Memoisation is left to callers (§9 notes it's only worth
    /// memoising during emission, which is out of scope here).
    #[must_use]
    pub fn chained_name(&self, id: DefId) -> String {
        let mut parts = Vec::new();
        let mut cur = id;
        loop {
            parts.push(self.name_of(cur).to_string());
            let parent = self.parent_of(cur);
            if parent.is_root() {
                break;
            }
            cur = parent;
        }
        parts.reverse();
        parts.join("_")
    }

    /// Top-level type names a definition depends on, transitively (§4.3).
    /// Instance edges contribute their `type_name`; wrappers/struct/case/
    /// select recurse into their children. Mirrors `core.py`'s
    /// `dependsOnTypes`.
    #[must_use]
    pub fn depends_on_types(&self, id: DefId) -> FxHashSet<String> {
        let mut seen = FxHashSet::default();
        self.depends_on_types_into(id, &mut seen);
        seen
    }

    fn depends_on_types_into(&self, id: DefId, out: &mut FxHashSet<String>) {
        if let Definition::Instance(inst) = self.get(id) {
            out.insert(inst.type_name.clone());
        }
        for child in self.get(id).children() {
            self.depends_on_types_into(child, out);
        }
    }

    /// Union of `depends_on_types` over every top-level definition.
    #[must_use]
    pub fn collection_depends_on_types(&self) -> FxHashSet<String> {
        let mut out = FxHashSet::default();
        for &id in &self.top_level {
            self.depends_on_types_into(id, &mut out);
        }
        out
    }

    /// Topologically sort the top-level definitions so each definition
    /// follows every type it depends on (§4.3). Fails fast on an undefined
    /// type reference, then on a cycle.
    pub fn sort(&mut self) -> Result<(), IrError> {
        let known = self.type_names();
        let mut undefined = self.collection_depends_on_types();
        undefined.retain(|name| !known.contains(name));
        if let Some(name) = undefined.into_iter().next() {
            return Err(IrError::UnknownType(name));
        }

        let mut remaining = std::mem::take(&mut self.top_level);
        let mut placed: FxHashSet<String> = FxHashSet::default();
        let mut sorted = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let found = remaining.iter().position(|&id| {
                self.depends_on_types(id).iter().all(|dep| placed.contains(dep))
            });
            match found {
                Some(idx) => {
                    let id = remaining.remove(idx);
                    placed.insert(self.name_of(id).to_string());
                    sorted.push(id);
                }
                None => {
                    let name = self.name_of(remaining[0]).to_string();
                    sorted.extend(remaining);
                    self.top_level = sorted;
                    return Err(IrError::CyclicDependency(name));
                }
            }
        }

        self.top_level = sorted;
        self.state = CollectionState::Sorted;
        Ok(())
    }

    /// The reference implementation's base (§4.4: "the reference chose
    /// 100").
    pub const DEFAULT_TYPE_ID_BASE: u32 = 100;

    /// Assign monotonic type-IDs to every non-built-in top-level definition
    /// in current (sorted) order, starting at `base`.
    pub fn assign_type_ids(&mut self, base: u32) {
        let mut next = base;
        let ids: Vec<DefId> = self.top_level.clone();
        for id in ids {
            if self.is_builtin(id) {
                continue;
            }
            self.get_mut(id).common_mut().type_id = Some(next);
            next += 1;
        }
        self.state = CollectionState::Identified;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ConstDef;

    fn fresh() -> Collection {
        Collection::new(FxHashSet::default())
    }

    #[test]
    fn builtins_present() {
        let c = fresh();
        assert!(c.lookup("uint1").is_some());
        assert!(c.lookup("uint64").is_some());
        assert!(c.lookup("sint1").is_some());
        assert!(c.lookup("sint64").is_some());
        assert!(c.lookup("bit").is_some());
        assert!(c.lookup("byte").is_some());
        assert!(c.lookup("opaque").is_some());
        assert_eq!(c.top_level().len(), 64 + 64 + 3);
    }

    #[test]
    fn builtins_are_flagged_as_such() {
        let c = fresh();
        let uint8 = c.lookup("uint8").unwrap();
        assert!(c.is_builtin(uint8));
    }

    #[test]
    fn duplicate_top_level_name_rejected() {
        let mut c = fresh();
        let def = Definition::Const(ConstDef { common: DefCommon::new("K", DefId::ROOT), value: 1 });
        c.add_top_level(def.clone(), false).unwrap();
        let err = c.add_top_level(def, false).unwrap_err();
        assert_eq!(err, IrError::DuplicateName("K".into()));
    }

    #[test]
    fn auto_update_name_disambiguates() {
        let mut c = fresh();
        let def = Definition::Const(ConstDef { common: DefCommon::new("K", DefId::ROOT), value: 1 });
        c.add_top_level(def.clone(), false).unwrap();
        let id2 = c.add_top_level(def, true).unwrap();
        assert_eq!(c.name_of(id2), "K_2");
    }

    #[test]
    fn sort_detects_unknown_type() {
        use crate::definition::InstanceDef;
        use indexmap::IndexMap;
        let mut c = fresh();
        let inst = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("Foo", DefId::ROOT),
            type_name: "Bar".into(),
            args: IndexMap::new(),
        }));
        c.add_top_level(inst, false).unwrap();
        assert_eq!(c.sort().unwrap_err(), IrError::UnknownType("Bar".into()));
    }

    #[test]
    fn sort_orders_by_dependency() {
        use crate::definition::InstanceDef;
        use indexmap::IndexMap;
        let mut c = fresh();
        // B depends on A; insert B before A to verify reordering.
        let b = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("B", DefId::ROOT),
            type_name: "A".into(),
            args: IndexMap::new(),
        }));
        let a = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("A", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        }));
        c.add_top_level(b, false).unwrap();
        c.add_top_level(a, false).unwrap();
        c.sort().unwrap();
        let a_pos = c.top_level().iter().position(|&id| c.name_of(id) == "A").unwrap();
        let b_pos = c.top_level().iter().position(|&id| c.name_of(id) == "B").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn sort_detects_cycle() {
        use crate::definition::InstanceDef;
        use indexmap::IndexMap;
        let mut c = fresh();
        let a = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("A", DefId::ROOT),
            type_name: "B".into(),
            args: IndexMap::new(),
        }));
        let b = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("B", DefId::ROOT),
            type_name: "A".into(),
            args: IndexMap::new(),
        }));
        c.add_top_level(a, false).unwrap();
        c.add_top_level(b, false).unwrap();
        assert!(matches!(c.sort(), Err(IrError::CyclicDependency(_))));
    }

    #[test]
    fn type_ids_are_contiguous_from_base_and_skip_builtins() {
        use crate::definition::InstanceDef;
        use indexmap::IndexMap;
        let mut c = fresh();
        let a = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("A", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        }));
        let b = Definition::Instance(Box::new(InstanceDef {
            common: DefCommon::new("B", DefId::ROOT),
            type_name: "uint8".into(),
            args: IndexMap::new(),
        }));
        c.add_top_level(a, false).unwrap();
        c.add_top_level(b, false).unwrap();
        c.sort().unwrap();
        c.assign_type_ids(Collection::DEFAULT_TYPE_ID_BASE);
        let a_id = c.lookup("A").unwrap();
        let b_id = c.lookup("B").unwrap();
        assert_eq!(c.get(a_id).common().type_id, Some(100));
        assert_eq!(c.get(b_id).common().type_id, Some(101));
        let uint8 = c.lookup("uint8").unwrap();
        assert_eq!(c.get(uint8).common().type_id, None);
    }

    #[test]
    fn chained_name_walks_parent_links() {
        let mut c = fresh();
        let root_id = DefId::from(0usize); // placeholder, replaced below
        let _ = root_id;
        let struct_common = DefCommon::new("S", DefId::ROOT);
        let struct_id = c.alloc(Definition::Struct(crate::definition::StructDef {
            common: struct_common,
            members: Vec::new(),
        }));
        // re-parent struct under collection for this unit test's purposes
        let member_common = DefCommon::new("m", struct_id);
        let member_id = c.alloc(Definition::Const(ConstDef { common: member_common, value: 1 }));
        if let Definition::Struct(s) = c.get_mut(struct_id) {
            s.members.push(member_id);
        }
        assert_eq!(c.chained_name(member_id), "S_m");
    }
}
