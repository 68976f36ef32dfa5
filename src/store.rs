//! The graph store: functor registry plus atom and membrane arenas.
//!
//! The store is the single owner of all graph memory. Atoms and membranes are
//! arena-allocated and addressed by typed indices, so edges are `(id, slot)`
//! pairs with no dangling-reference risk. `link` writes both endpoints of an
//! edge at once, keeping the mutual back-pointer invariant true by
//! construction; `check_links` re-validates it for diagnostics.
//!
//! The serializer only reads the store. Mutation during a dump is excluded by
//! the borrow it takes, so no locking is needed.

use crate::arena::Arena;
use crate::atom::{Atom, AtomId, AtomKind, MarkerDir, Slot};
use crate::functor::{FunctorId, FunctorTable, SymbolId, IN_MARKER_FUNCTOR, OUT_MARKER_FUNCTOR};
use crate::membrane::{Membrane, MembraneId};
use std::fmt;

/// Error type for store construction and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A slot index is outside the atom's arity.
    SlotOutOfRange {
        /// Offending atom.
        atom: AtomId,
        /// Requested slot index.
        slot: u8,
    },
    /// A link slot's peer does not point back at it.
    BrokenLink {
        /// Atom whose slot fails the mutuality check.
        atom: AtomId,
        /// Slot index that fails.
        slot: u8,
    },
    /// A link slot names an atom that is not live.
    DanglingLink {
        /// Atom holding the dangling slot.
        atom: AtomId,
        /// Slot index holding the dangling link.
        slot: u8,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::SlotOutOfRange { atom, slot } => {
                write!(f, "slot {} out of range for atom {}", slot, atom.as_u32())
            }
            StoreError::BrokenLink { atom, slot } => write!(
                f,
                "slot {} of atom {} is not mutually linked",
                slot,
                atom.as_u32()
            ),
            StoreError::DanglingLink { atom, slot } => write!(
                f,
                "slot {} of atom {} links to a dead atom",
                slot,
                atom.as_u32()
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// Owner of the functor registry and the atom/membrane arenas.
#[derive(Debug, Clone)]
pub struct Store {
    functors: FunctorTable,
    atoms: Arena<Atom>,
    membranes: Arena<Membrane>,
}

impl Default for Store {
    /// Same as [`Store::new`]: a field-wise default would skip the reserved
    /// functor registration.
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store with the reserved functors registered.
    pub fn new() -> Self {
        Self {
            functors: FunctorTable::new(),
            atoms: Arena::new(),
            membranes: Arena::new(),
        }
    }

    /// Read access to the functor registry.
    pub fn functors(&self) -> &FunctorTable {
        &self.functors
    }

    /// Registers (or finds) a functor.
    pub fn functor(&mut self, module: Option<&str>, name: &str, arity: u8) -> FunctorId {
        self.functors.functor(module, name, arity)
    }

    /// Interns a symbol (used for membrane names).
    pub fn intern(&mut self, name: &str) -> SymbolId {
        self.functors.intern(name)
    }

    /// Creates a membrane; `parent: None` makes it a root.
    pub fn add_membrane(&mut self, parent: Option<MembraneId>, name: Option<&str>) -> MembraneId {
        let name = name.map(|n| self.intern(n));
        let id = MembraneId::new(self.membranes.allocate(Membrane::new(name, parent)));
        if let Some(p) = parent {
            self.membrane_mut(p).push_child(id);
        }
        id
    }

    /// Creates an atom of `functor` inside `mem`, with all slots unwired.
    pub fn add_atom(&mut self, mem: MembraneId, functor: FunctorId) -> AtomId {
        let arity = self.functors.arity_of(functor);
        let id = AtomId::new(self.atoms.allocate(Atom::new(functor, arity)));
        self.membrane_mut(mem).push_atom(functor, id);
        id
    }

    /// Creates a boundary marker in `mem`, with its membrane slot wired.
    pub fn add_marker(&mut self, mem: MembraneId, dir: MarkerDir) -> AtomId {
        let functor = match dir {
            MarkerDir::In => IN_MARKER_FUNCTOR,
            MarkerDir::Out => OUT_MARKER_FUNCTOR,
        };
        let id = self.add_atom(mem, functor);
        self.atom_mut(id).slots[2] = Slot::Mem(mem);
        id
    }

    /// Wires the undirected edge `(a, i) -- (b, j)`, writing both endpoints.
    pub fn link(&mut self, a: AtomId, i: u8, b: AtomId, j: u8) -> Result<(), StoreError> {
        if i >= self.atom(a).arity() {
            return Err(StoreError::SlotOutOfRange { atom: a, slot: i });
        }
        if j >= self.atom(b).arity() {
            return Err(StoreError::SlotOutOfRange { atom: b, slot: j });
        }
        self.atom_mut(a).slots[i as usize] = Slot::Link {
            peer: b,
            peer_slot: j,
        };
        self.atom_mut(b).slots[j as usize] = Slot::Link {
            peer: a,
            peer_slot: i,
        };
        Ok(())
    }

    /// Stores an integer value in slot `i` of `a`.
    pub fn set_int(&mut self, a: AtomId, i: u8, value: i64) -> Result<(), StoreError> {
        self.set_data(a, i, Slot::Int(value))
    }

    /// Stores a float value in slot `i` of `a`.
    pub fn set_float(&mut self, a: AtomId, i: u8, value: f64) -> Result<(), StoreError> {
        self.set_data(a, i, Slot::Float(value))
    }

    /// Stores a raw-tagged data value in slot `i` of `a`.
    pub fn set_other(&mut self, a: AtomId, i: u8, tag: u8) -> Result<(), StoreError> {
        self.set_data(a, i, Slot::Other(tag))
    }

    fn set_data(&mut self, a: AtomId, i: u8, slot: Slot) -> Result<(), StoreError> {
        if i >= self.atom(a).arity() {
            return Err(StoreError::SlotOutOfRange { atom: a, slot: i });
        }
        self.atom_mut(a).slots[i as usize] = slot;
        Ok(())
    }

    /// Attaches a rule-set identifier to `mem`.
    pub fn add_ruleset(&mut self, mem: MembraneId, ruleset: u32) {
        self.membrane_mut(mem).rulesets.push(ruleset);
    }

    /// Returns the atom for a live id.
    ///
    /// # Panics
    /// Panics if the atom was removed; ids obtained from a membrane's groups
    /// are always live.
    pub fn atom(&self, id: AtomId) -> &Atom {
        self.atoms.get(id.as_u32()).expect("atom must be live")
    }

    fn atom_mut(&mut self, id: AtomId) -> &mut Atom {
        self.atoms.get_mut(id.as_u32()).expect("atom must be live")
    }

    /// Returns the membrane for a live id.
    ///
    /// # Panics
    /// Panics if the membrane was removed.
    pub fn membrane(&self, id: MembraneId) -> &Membrane {
        self.membranes
            .get(id.as_u32())
            .expect("membrane must be live")
    }

    fn membrane_mut(&mut self, id: MembraneId) -> &mut Membrane {
        self.membranes
            .get_mut(id.as_u32())
            .expect("membrane must be live")
    }

    /// Kind of a live atom (shorthand used by the printers).
    pub fn kind(&self, id: AtomId) -> AtomKind {
        self.atom(id).kind
    }

    /// Removes `atom` from `mem` and frees it. Peers keep their (now
    /// dangling) link slots; the caller rewires them.
    pub fn remove_atom(&mut self, mem: MembraneId, atom: AtomId) {
        let functor = self.atom(atom).functor;
        self.membrane_mut(mem).forget_atom(functor, atom);
        self.atoms.remove(atom.as_u32());
    }

    /// Destroys `mem`, its atoms, and its children, recursively, detaching
    /// it from its parent's child list.
    pub fn remove_membrane(&mut self, mem: MembraneId) {
        if let Some(parent) = self.membrane(mem).parent {
            if let Some(pm) = self.membranes.get_mut(parent.as_u32()) {
                pm.forget_child(mem);
            }
        }
        self.remove_membrane_rec(mem);
    }

    fn remove_membrane_rec(&mut self, mem: MembraneId) {
        let (atoms, children): (Vec<AtomId>, Vec<MembraneId>) = {
            let m = self.membrane(mem);
            (m.atoms().collect(), m.children().to_vec())
        };
        for child in children {
            self.remove_membrane_rec(child);
        }
        for atom in atoms {
            self.atoms.remove(atom.as_u32());
        }
        self.membranes.remove(mem.as_u32());
    }

    /// Validates the mutual back-pointer invariant for every atom in `mem`.
    pub fn check_links(&self, mem: MembraneId) -> Result<(), StoreError> {
        for atom in self.membrane(mem).atoms() {
            for (i, slot) in self.atom(atom).slots.iter().enumerate() {
                let slot_idx = i as u8;
                if let Slot::Link { peer, peer_slot } = *slot {
                    let peer_atom = match self.atoms.get(peer.as_u32()) {
                        Some(p) => p,
                        None => {
                            return Err(StoreError::DanglingLink {
                                atom,
                                slot: slot_idx,
                            })
                        }
                    };
                    let back = peer_atom.slots.get(peer_slot as usize);
                    match back {
                        Some(Slot::Link {
                            peer: back_peer,
                            peer_slot: back_slot,
                        }) if *back_peer == atom && *back_slot == slot_idx => {}
                        _ => {
                            return Err(StoreError::BrokenLink {
                                atom,
                                slot: slot_idx,
                            })
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_has_reserved_functors() {
        use crate::functor::CONS_FUNCTOR;

        let mut store = Store::default();
        assert_eq!(store.functor(None, ".", 3), CONS_FUNCTOR);
        let mem = store.add_membrane(None, None);
        let marker = store.add_marker(mem, MarkerDir::In);
        assert!(store.kind(marker).is_marker());
    }

    #[test]
    fn intern_backs_membrane_names() {
        let mut store = Store::new();
        let id = store.intern("top");
        let mem = store.add_membrane(None, Some("top"));
        assert_eq!(store.membrane(mem).name, Some(id));
    }

    #[test]
    fn link_writes_both_endpoints() {
        let mut store = Store::new();
        let mem = store.add_membrane(None, None);
        let f = store.functor(None, "f", 2);
        let g = store.functor(None, "g", 1);
        let a = store.add_atom(mem, f);
        let b = store.add_atom(mem, g);
        store.link(a, 1, b, 0).unwrap();

        assert_eq!(
            store.atom(a).slots[1],
            Slot::Link { peer: b, peer_slot: 0 }
        );
        assert_eq!(
            store.atom(b).slots[0],
            Slot::Link { peer: a, peer_slot: 1 }
        );
        assert!(store.check_links(mem).is_ok());
    }

    #[test]
    fn link_rejects_out_of_range_slot() {
        let mut store = Store::new();
        let mem = store.add_membrane(None, None);
        let f = store.functor(None, "f", 1);
        let a = store.add_atom(mem, f);
        let b = store.add_atom(mem, f);
        assert_eq!(
            store.link(a, 3, b, 0),
            Err(StoreError::SlotOutOfRange { atom: a, slot: 3 })
        );
    }

    #[test]
    fn check_links_reports_one_sided_edge() {
        let mut store = Store::new();
        let mem = store.add_membrane(None, None);
        let f = store.functor(None, "f", 1);
        let a = store.add_atom(mem, f);
        let b = store.add_atom(mem, f);
        store.link(a, 0, b, 0).unwrap();
        // Overwrite one side with data to break mutuality.
        store.set_int(b, 0, 9).unwrap();
        assert_eq!(
            store.check_links(mem),
            Err(StoreError::BrokenLink { atom: a, slot: 0 })
        );
    }

    #[test]
    fn marker_carries_membrane_slot() {
        let mut store = Store::new();
        let root = store.add_membrane(None, None);
        let child = store.add_membrane(Some(root), None);
        let marker = store.add_marker(child, MarkerDir::In);
        assert_eq!(store.atom(marker).slots[2], Slot::Mem(child));
        assert!(store.kind(marker).is_marker());
        assert_eq!(store.membrane(root).children(), &[child]);
    }

    #[test]
    fn remove_membrane_destroys_contents() {
        let mut store = Store::new();
        let root = store.add_membrane(None, None);
        let child = store.add_membrane(Some(root), Some("inner"));
        let f = store.functor(None, "f", 0);
        store.add_atom(child, f);
        store.remove_membrane(child);
        assert_eq!(store.membrane(root).children(), &[] as &[MembraneId]);
        assert_eq!(store.membrane(root).atom_count(), 0);
    }
}
