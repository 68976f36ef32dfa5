//! Membranes: named, nestable containers of atoms.
//!
//! A membrane groups its atoms by functor. Group iteration uses a `BTreeMap`
//! keyed by `FunctorId`, so the order atoms are visited is fixed for a given
//! store content; within a group, atoms keep insertion order. The external
//! meaning of that order is unspecified, but it is stable within (and across)
//! serialization calls, which is what the dump determinism property needs.

use crate::atom::AtomId;
use crate::functor::{FunctorId, SymbolId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Membrane identifier (arena index).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembraneId(u32);

impl MembraneId {
    /// Wraps a raw arena index.
    #[inline]
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw arena index.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

/// A nestable container of atoms and child membranes.
///
/// The membrane owns its atoms and its children: destroying it through
/// [`crate::store::Store::remove_membrane`] destroys both. The parent link is
/// lookup-only and never owned.
#[derive(Debug, Clone, Default)]
pub struct Membrane {
    /// Optional membrane name (interned symbol).
    pub name: Option<SymbolId>,
    /// Atoms grouped by functor; insertion order within a group.
    atoms: BTreeMap<FunctorId, Vec<AtomId>>,
    /// Immediate children, in creation order.
    children: Vec<MembraneId>,
    /// Parent membrane, `None` for a root.
    pub parent: Option<MembraneId>,
    /// Attached rule-set identifiers, in attachment order.
    pub rulesets: Vec<u32>,
}

impl Membrane {
    /// Creates an empty membrane under `parent`.
    pub fn new(name: Option<SymbolId>, parent: Option<MembraneId>) -> Self {
        Self {
            name,
            parent,
            ..Self::default()
        }
    }

    /// Records an atom under its functor group.
    pub(crate) fn push_atom(&mut self, functor: FunctorId, atom: AtomId) {
        self.atoms.entry(functor).or_default().push(atom);
    }

    /// Removes an atom from its functor group, if present.
    pub(crate) fn forget_atom(&mut self, functor: FunctorId, atom: AtomId) {
        if let Some(group) = self.atoms.get_mut(&functor) {
            group.retain(|&a| a != atom);
            if group.is_empty() {
                self.atoms.remove(&functor);
            }
        }
    }

    /// Records a child membrane.
    pub(crate) fn push_child(&mut self, child: MembraneId) {
        self.children.push(child);
    }

    /// Drops a child membrane from the ordered list.
    pub(crate) fn forget_child(&mut self, child: MembraneId) {
        self.children.retain(|&c| c != child);
    }

    /// Iterates atoms in group order (by `FunctorId`), insertion order within
    /// a group.
    pub fn atoms(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.atoms.values().flat_map(|group| group.iter().copied())
    }

    /// Iterates `(functor, members)` groups in `FunctorId` order.
    pub fn atom_groups(&self) -> impl Iterator<Item = (FunctorId, &[AtomId])> {
        self.atoms.iter().map(|(&f, v)| (f, v.as_slice()))
    }

    /// Immediate children in creation order.
    pub fn children(&self) -> &[MembraneId] {
        &self.children
    }

    /// Number of atoms in this membrane (children excluded).
    pub fn atom_count(&self) -> usize {
        self.atoms.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_iterate_in_functor_order() {
        let mut mem = Membrane::new(None, None);
        let f2 = FunctorId::from_raw_for_test(7);
        let f1 = FunctorId::from_raw_for_test(5);
        mem.push_atom(f2, AtomId::new(0));
        mem.push_atom(f1, AtomId::new(1));
        mem.push_atom(f2, AtomId::new(2));

        let order: Vec<u32> = mem.atoms().map(|a| a.as_u32()).collect();
        // f1's group first (lower FunctorId), then f2's in insertion order.
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn forget_atom_drops_empty_groups() {
        let mut mem = Membrane::new(None, None);
        let f = FunctorId::from_raw_for_test(4);
        mem.push_atom(f, AtomId::new(3));
        assert_eq!(mem.atom_count(), 1);
        mem.forget_atom(f, AtomId::new(3));
        assert_eq!(mem.atom_count(), 0);
        assert_eq!(mem.atom_groups().count(), 0);
    }
}
