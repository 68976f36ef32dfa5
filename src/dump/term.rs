//! Default term-syntax driver: the recursive node printer, the list-sugar
//! printer, the boundary-link propagator, and the membrane printer.
//!
//! One `TermPrinter` serves one top-level dump call; it owns the visitation
//! ledger and link namer and threads them through the whole descent.
//!
//! # Printing rules
//! - Structure is printed inline only from an atom's principal occurrence:
//!   the position conventionally treated as its last argument slot. Every
//!   other occurrence becomes an `L<n>` back-reference.
//! - The recursion ceiling converts pathological nesting into a
//!   back-reference; cycles are caught by the visited flags well before it.
//! - Per-atom "nothing printed" outcomes are reported as `false` and only
//!   affect separator placement, never the surrounding traversal.

use crate::atom::{AtomId, AtomKind, Slot};
use crate::config::DumpConfig;
use crate::dump::ledger::{LinkNamer, VisitLedger};
use crate::dump::{write_atom_name, write_data_value, DumpError, MAX_DEPTH};
use crate::membrane::MembraneId;
use crate::store::Store;
use std::fmt::Write;

/// Traversal-priority classes for choosing membrane roots.
///
/// Printing from tail-linked atoms first lets linear chains read
/// left-to-right without spurious back-references. The classification is a
/// readability heuristic; determinism is what matters.
const CLASS_COUNT: usize = 5;
const CLASS_MARKER: usize = 0;
const CLASS_NULLARY: usize = 1;
const CLASS_UNARY_TAIL: usize = 2;
const CLASS_TAIL: usize = 3;
const CLASS_REST: usize = 4;

pub(crate) struct TermPrinter<'a, W> {
    store: &'a Store,
    cfg: &'a DumpConfig,
    out: &'a mut W,
    ledger: VisitLedger,
    namer: LinkNamer,
}

impl<'a, W: Write> TermPrinter<'a, W> {
    pub(crate) fn new(store: &'a Store, cfg: &'a DumpConfig, out: &'a mut W) -> Self {
        Self {
            store,
            cfg,
            out,
            ledger: VisitLedger::new(),
            namer: LinkNamer::new(),
        }
    }

    /// Prints the contents of `mem`: atoms in class order, then child
    /// membranes, then the rule-set list.
    pub(crate) fn dump_cell_contents(&mut self, mem: MembraneId) -> Result<(), DumpError> {
        let membrane = self.store.membrane(mem);

        let mut classes: [Vec<AtomId>; CLASS_COUNT] = Default::default();
        for atom in membrane.atoms() {
            classes[self.classify(atom)].push(atom);
        }

        if !self.cfg.show_markers {
            self.assign_marker_links(&classes[CLASS_MARKER])?;
        }

        for class in &classes {
            for &atom in class {
                if self.dump_toplevel(atom)? {
                    self.out.write_str(". ")?;
                }
            }
        }

        let children = membrane.children();
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            self.dump_membrane(child)?;
        }
        if !children.is_empty() {
            self.out.write_str(". ")?;
        }

        if self.cfg.show_rulesets {
            for (i, ruleset) in membrane.rulesets.iter().enumerate() {
                if i > 0 {
                    self.out.write_char(',')?;
                }
                write!(self.out, "@{}", ruleset)?;
            }
        }
        Ok(())
    }

    /// Prints `mem` with its name and braces.
    fn dump_membrane(&mut self, mem: MembraneId) -> Result<(), DumpError> {
        if let Some(name) = self.store.membrane(mem).name {
            self.out.write_str(self.store.functors().symbol_name(name))?;
        }
        self.out.write_char('{')?;
        self.dump_cell_contents(mem)?;
        self.out.write_char('}')?;
        Ok(())
    }

    /// Assigns a traversal-priority class to an atom.
    fn classify(&self, atom: AtomId) -> usize {
        let a = self.store.atom(atom);
        if a.kind.is_marker() {
            return CLASS_MARKER;
        }
        let arity = a.arity() as usize;
        if arity == 0 {
            CLASS_NULLARY
        } else if arity == 1 && a.kind != AtomKind::Nil && self.tail_linked(&a.slots[0]) {
            CLASS_UNARY_TAIL
        } else if arity > 1 && self.tail_linked(&a.slots[arity - 1]) {
            CLASS_TAIL
        } else {
            CLASS_REST
        }
    }

    /// A slot is tail-linked when it is data or connects to the peer's own
    /// last argument position.
    fn tail_linked(&self, slot: &Slot) -> bool {
        match *slot {
            Slot::Link { peer, peer_slot } => {
                peer_slot as usize + 1 == self.store.atom(peer).arity() as usize
            }
            _ => true,
        }
    }

    /// Attempts to print `atom` as a top-level occurrence. Returns `false`
    /// when the atom was already consumed (no separator wanted).
    fn dump_toplevel(&mut self, atom: AtomId) -> Result<bool, DumpError> {
        if !self.cfg.show_markers && self.store.kind(atom).is_marker() {
            self.dump_marker(atom, 0)
        } else {
            self.dump_symbol(atom, 0, 0)
        }
    }

    /// Prints one edge attribute: a data literal, or the structure reached
    /// through a link.
    fn dump_slot(&mut self, slot: Slot, depth: usize) -> Result<bool, DumpError> {
        match slot {
            Slot::Link { peer, peer_slot } => {
                let kind = self.store.kind(peer);
                if !self.cfg.show_markers && kind.is_marker() {
                    self.dump_marker(peer, depth)
                } else if kind == AtomKind::Cons && peer_slot == 2 {
                    self.dump_list(peer, depth)
                } else {
                    self.dump_symbol(peer, peer_slot, depth)
                }
            }
            data => {
                write_data_value(self.out, &data)?;
                Ok(true)
            }
        }
    }

    /// Prints a symbol atom: inline from its principal occurrence, as a
    /// back-reference everywhere else.
    fn dump_symbol(&mut self, atom: AtomId, link_pos: u8, depth: usize) -> Result<bool, DumpError> {
        let a = self.store.atom(atom);
        let mut arity = a.arity() as usize;
        if a.kind.is_marker() {
            // One slot is the boundary link itself.
            arity -= 1;
        }

        let visited = self.ledger.visited(atom);
        let not_principal = depth > 0 && (link_pos as usize) + 1 != arity;
        if not_principal || (depth > 0 && visited) || depth > MAX_DEPTH {
            self.write_link_ref(atom, link_pos)?;
            return Ok(true);
        }
        if visited {
            return Ok(false);
        }
        self.ledger.mark_visited(atom);

        write_atom_name(self.out, self.store, a.functor, a.kind)?;

        let limit = if depth > 0 { arity - 1 } else { arity };
        if limit > 0 {
            self.out.write_char('(')?;
            for i in 0..limit {
                if i > 0 {
                    self.out.write_char(',')?;
                }
                if let Some(link) = self.ledger.binding(atom, i as u8) {
                    write!(self.out, "L{}", link)?;
                } else {
                    self.dump_slot(a.slots[i], depth + 1)?;
                }
            }
            self.out.write_char(')')?;
        }
        Ok(true)
    }

    /// Prints a hidden boundary marker: its chain id as a back-reference, or
    /// (at top level, with a data pair) the data followed by the chain id.
    fn dump_marker(&mut self, atom: AtomId, depth: usize) -> Result<bool, DumpError> {
        self.ledger.mark_visited(atom);
        let id = self
            .ledger
            .boundary_id(atom)
            .ok_or(DumpError::UnassignedMarker { atom })?;
        if depth == 0 {
            let pair = self.store.atom(atom).slots[1];
            if pair.is_data() {
                write_data_value(self.out, &pair)?;
                write!(self.out, "(L{})", id)?;
                Ok(true)
            } else {
                // The paired marker or the structure itself prints instead.
                Ok(false)
            }
        } else {
            write!(self.out, "L{}", id)?;
            Ok(true)
        }
    }

    /// Renders a cons chain as `[e0,e1,...]` or `[e0,e1,...|tail]`, walking
    /// the spine iteratively so stack depth is independent of list length.
    fn dump_list(&mut self, head: AtomId, depth: usize) -> Result<bool, DumpError> {
        if self.ledger.visited(head) {
            self.write_link_ref(head, 2)?;
            return Ok(true);
        }

        self.out.write_char('[')?;
        let mut first = true;
        let mut cursor = Slot::Link {
            peer: head,
            peer_slot: 2,
        };
        loop {
            match cursor {
                Slot::Link { peer, peer_slot }
                    if self.store.kind(peer) == AtomKind::Cons && peer_slot == 2 =>
                {
                    if self.ledger.visited(peer) {
                        // Cyclic spine: close with a fresh back-reference.
                        let link = self.namer.next_id();
                        self.ledger.bind(peer, peer_slot, link);
                        write!(self.out, "|L{}", link)?;
                        break;
                    }
                    self.ledger.mark_visited(peer);

                    if !first {
                        self.out.write_char(',')?;
                    }
                    first = false;

                    if let Some(link) = self.ledger.binding(peer, 0) {
                        write!(self.out, "L{}", link)?;
                    } else {
                        let element = self.store.atom(peer).slots[0];
                        self.dump_slot(element, depth + 1)?;
                    }
                    cursor = self.store.atom(peer).slots[1];
                }
                Slot::Link { peer, .. } if self.store.kind(peer) == AtomKind::Nil => {
                    // Keep the ledger consistent for any later reference.
                    self.ledger.mark_visited(peer);
                    break;
                }
                tail => {
                    self.out.write_char('|')?;
                    self.dump_slot(tail, depth + 1)?;
                    break;
                }
            }
        }
        self.out.write_char(']')?;
        Ok(true)
    }

    /// Prints the link number for `(atom, slot)`, allocating and recording a
    /// fresh one if this endpoint has none yet.
    fn write_link_ref(&mut self, atom: AtomId, slot: u8) -> Result<(), DumpError> {
        let link = match self.ledger.binding(atom, slot) {
            Some(link) => link,
            None => {
                let link = self.namer.next_id();
                self.ledger.bind(atom, slot, link);
                link
            }
        };
        write!(self.out, "L{}", link)?;
        Ok(())
    }

    /// Assigns one shared link id per maximal connected marker chain.
    ///
    /// Runs once per membrane, before printing, when markers are hidden.
    fn assign_marker_links(&mut self, markers: &[AtomId]) -> Result<(), DumpError> {
        for &marker in markers {
            if self.ledger.boundary_id(marker).is_none() {
                let id = self.namer.next_id();
                self.ledger.set_boundary_id(marker, id);
                self.walk_marker_chain(marker, 0, id)?;
                self.walk_marker_chain(marker, 1, id)?;
            }
        }
        Ok(())
    }

    /// Floods `id` along one direction of a marker chain. Marker adjacency
    /// has degree at most two, so each direction is a simple walk; meeting an
    /// already-assigned marker means the chain loops back on itself, which is
    /// a structural-corruption condition rather than a printable graph.
    fn walk_marker_chain(&mut self, start: AtomId, slot: u8, id: u32) -> Result<(), DumpError> {
        let mut cur = start;
        let mut via = slot;
        loop {
            let (peer, peer_slot) = match self.store.atom(cur).slots[via as usize] {
                Slot::Link { peer, peer_slot } => (peer, peer_slot),
                _ => return Ok(()),
            };
            if !self.store.kind(peer).is_marker() || peer_slot > 1 {
                return Ok(());
            }
            if self.ledger.boundary_id(peer).is_some() {
                return Err(DumpError::MarkerCycle { atom: peer });
            }
            self.ledger.set_boundary_id(peer, id);
            via = 1 - peer_slot;
            cur = peer;
        }
    }
}
