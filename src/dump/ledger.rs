//! Per-call visitation ledger and link namer.
//!
//! Both live exactly as long as one top-level dump call and are threaded by
//! mutable reference through the recursive descent. Entries are created
//! lazily on first visit and never removed before teardown; no two dumps
//! share them.

use crate::atom::AtomId;
use std::collections::{BTreeMap, HashMap};

/// Transient per-atom record.
#[derive(Debug, Default)]
pub struct AtomRec {
    /// The atom's principal occurrence has been printed (or consumed).
    pub visited: bool,
    /// Link numbers already assigned to argument positions.
    pub slot_bindings: BTreeMap<u8, u32>,
    /// Link id shared by the marker chain this atom belongs to
    /// (boundary markers only).
    pub boundary_link_id: Option<u32>,
}

/// Lazy map from atom identity to its transient record.
#[derive(Debug, Default)]
pub struct VisitLedger {
    recs: HashMap<AtomId, AtomRec>,
}

impl VisitLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `atom`, creating it on first access.
    pub fn record_for(&mut self, atom: AtomId) -> &mut AtomRec {
        self.recs.entry(atom).or_default()
    }

    /// Whether the atom's principal occurrence was already printed.
    pub fn visited(&self, atom: AtomId) -> bool {
        self.recs.get(&atom).map_or(false, |r| r.visited)
    }

    /// Marks the atom's principal occurrence printed.
    pub fn mark_visited(&mut self, atom: AtomId) {
        self.record_for(atom).visited = true;
    }

    /// Link number bound to `(atom, slot)` by an earlier visit, if any.
    pub fn binding(&self, atom: AtomId, slot: u8) -> Option<u32> {
        self.recs
            .get(&atom)
            .and_then(|r| r.slot_bindings.get(&slot).copied())
    }

    /// Binds a link number to `(atom, slot)`.
    pub fn bind(&mut self, atom: AtomId, slot: u8, link: u32) {
        self.record_for(atom).slot_bindings.insert(slot, link);
    }

    /// Chain id assigned to a boundary marker, if the propagator reached it.
    pub fn boundary_id(&self, atom: AtomId) -> Option<u32> {
        self.recs.get(&atom).and_then(|r| r.boundary_link_id)
    }

    /// Assigns a marker's chain id.
    pub fn set_boundary_id(&mut self, atom: AtomId, link: u32) {
        self.record_for(atom).boundary_link_id = Some(link);
    }
}

/// Monotone allocator for external link numbers, starting at 0 per call.
#[derive(Debug, Default)]
pub struct LinkNamer {
    next: u32,
}

impl LinkNamer {
    /// Creates a namer starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next link number.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}
