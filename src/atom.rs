//! Atoms, argument slots, and shape classification.
//!
//! An atom is a labeled node with a fixed number of argument slots given by
//! its functor's arity. Each slot holds an edge attribute: either a link
//! descriptor `(peer, peer_slot)` naming the opposite endpoint of an
//! undirected binary edge, or an embedded data value. Data values are
//! one-sided; only link slots participate in the mutual back-pointer
//! invariant.
//!
//! The shape of an atom (plain symbol, boundary marker, list cons, nil
//! sentinel) is decided once at construction from its functor and matched
//! exhaustively in the printers, so no runtime name sniffing is needed.

use crate::functor::{
    FunctorId, CONS_FUNCTOR, IN_MARKER_FUNCTOR, NIL_FUNCTOR, OUT_MARKER_FUNCTOR,
};
use crate::membrane::MembraneId;
use serde::{Deserialize, Serialize};

/// Atom identifier (arena index).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtomId(u32);

impl AtomId {
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

/// Direction of a boundary marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerDir {
    /// Marker inside a child membrane, paired with an `Out` in the parent.
    In,
    /// Marker in the parent membrane, paired with an `In` in a child.
    Out,
}

/// Atom shape, decided at construction from the functor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtomKind {
    /// Ordinary symbol atom.
    Symbol,
    /// Boundary marker of the given direction.
    Marker(MarkerDir),
    /// List cons cell (element, continuation, output).
    Cons,
    /// Nil sentinel terminating a list.
    Nil,
}

impl AtomKind {
    /// Classifies a functor into its atom shape.
    pub fn of(functor: FunctorId) -> Self {
        match functor {
            NIL_FUNCTOR => AtomKind::Nil,
            CONS_FUNCTOR => AtomKind::Cons,
            IN_MARKER_FUNCTOR => AtomKind::Marker(MarkerDir::In),
            OUT_MARKER_FUNCTOR => AtomKind::Marker(MarkerDir::Out),
            _ => AtomKind::Symbol,
        }
    }

    /// Returns `true` for either marker direction.
    #[inline]
    pub fn is_marker(&self) -> bool {
        matches!(self, AtomKind::Marker(_))
    }
}

/// Edge attribute held by one argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    /// Link to slot `peer_slot` of atom `peer`; the peer slot points back.
    Link {
        /// Opposite endpoint atom.
        peer: AtomId,
        /// Opposite endpoint slot index.
        peer_slot: u8,
    },
    /// Embedded integer value.
    Int(i64),
    /// Embedded floating-point value.
    Float(f64),
    /// Membrane back-reference (slot 2 of a boundary marker).
    Mem(MembraneId),
    /// Data value with an unrecognized attribute tag. Rendered with an
    /// explicit sentinel; also the initial state of an unwired slot (tag 0).
    Other(u8),
}

impl Slot {
    /// Returns `true` for data attributes (anything but a link).
    pub fn is_data(&self) -> bool {
        !matches!(self, Slot::Link { .. })
    }
}

/// A labeled node with a fixed argument slot sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// The atom's functor.
    pub functor: FunctorId,
    /// Shape, derived from `functor` at construction.
    pub kind: AtomKind,
    /// Argument slots, `slots.len() == arity`.
    pub slots: Vec<Slot>,
}

impl Atom {
    /// Creates an atom with all slots unwired (`Slot::Other(0)`).
    pub fn new(functor: FunctorId, arity: u8) -> Self {
        Self {
            functor,
            kind: AtomKind::of(functor),
            slots: vec![Slot::Other(0); arity as usize],
        }
    }

    /// Number of argument slots.
    pub fn arity(&self) -> u8 {
        self.slots.len() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functor::FunctorTable;

    #[test]
    fn kind_classification() {
        let mut table = FunctorTable::new();
        let f = table.functor(None, "f", 2);
        assert_eq!(AtomKind::of(f), AtomKind::Symbol);
        assert_eq!(AtomKind::of(NIL_FUNCTOR), AtomKind::Nil);
        assert_eq!(AtomKind::of(CONS_FUNCTOR), AtomKind::Cons);
        assert_eq!(AtomKind::of(IN_MARKER_FUNCTOR), AtomKind::Marker(MarkerDir::In));
        assert!(AtomKind::of(OUT_MARKER_FUNCTOR).is_marker());
    }

    #[test]
    fn new_atom_slots_are_unwired() {
        let atom = Atom::new(CONS_FUNCTOR, 3);
        assert_eq!(atom.arity(), 3);
        assert!(atom.slots.iter().all(|s| *s == Slot::Other(0)));
        assert!(atom.slots[0].is_data());
    }
}
