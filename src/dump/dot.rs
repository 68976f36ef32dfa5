//! Graphviz DOT driver.
//!
//! Emits one `graph { ... }` block: a declaration per atom (circle) and per
//! data leaf (box), one edge statement per link, and one nested
//! `subgraph cluster<k>` per child membrane. Undirected edges are drawn once;
//! the reverse endpoint is remembered so its traversal skips the edge.

use crate::atom::{AtomId, Slot};
use crate::dump::{write_atom_name, write_data_value, DumpError};
use crate::membrane::MembraneId;
use crate::store::Store;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

pub(crate) fn dump<W: Write>(
    store: &Store,
    mem: MembraneId,
    out: &mut W,
) -> Result<(), DumpError> {
    out.write_str("graph {\n")?;
    out.write_str(
        "node [style=filled,fillcolor=\"#ffd49b50\",color=\"#000000\"];\n\
         edge [color=\"#000080\"];\n",
    )?;
    let mut printer = DotPrinter {
        store,
        drawn: HashMap::new(),
        cluster_id: 0,
    };
    printer.dump_cell(mem, out)?;
    out.write_str("}\n")?;
    Ok(())
}

struct DotPrinter<'a> {
    store: &'a Store,
    /// Slots whose edge was already drawn from the other endpoint.
    drawn: HashMap<AtomId, BTreeSet<u8>>,
    cluster_id: u32,
}

impl<'a> DotPrinter<'a> {
    fn dump_cell<W: Write>(&mut self, mem: MembraneId, out: &mut W) -> Result<(), DumpError> {
        let membrane = self.store.membrane(mem);

        // Node declarations: atoms as circles, data leaves as boxes.
        for atom in membrane.atoms() {
            let a = self.store.atom(atom);
            write!(out, "a{} [label = \"", atom.as_u32())?;
            write_atom_name(out, self.store, a.functor, a.kind)?;
            out.write_str("\", shape = circle];\n")?;
            for (i, slot) in a.slots.iter().enumerate() {
                match slot {
                    Slot::Int(_) | Slot::Float(_) | Slot::Other(_) => {
                        write!(out, "a{}_{} [label = \"", atom.as_u32(), i)?;
                        write_data_value(out, slot)?;
                        out.write_str("\", shape = box];\n")?;
                    }
                    Slot::Link { .. } | Slot::Mem(_) => {}
                }
            }
        }

        // Edge statements, one per undirected link.
        for atom in membrane.atoms() {
            let a = self.store.atom(atom);
            for (i, slot) in a.slots.iter().enumerate() {
                let slot_idx = i as u8;
                if self
                    .drawn
                    .get(&atom)
                    .map_or(false, |s| s.contains(&slot_idx))
                {
                    continue;
                }
                match *slot {
                    Slot::Link { peer, peer_slot } => {
                        self.drawn.entry(peer).or_default().insert(peer_slot);
                        writeln!(out, "a{} -- a{}", atom.as_u32(), peer.as_u32())?;
                    }
                    Slot::Int(_) | Slot::Float(_) | Slot::Other(_) => {
                        writeln!(out, "a{} -- a{}_{}", atom.as_u32(), atom.as_u32(), i)?;
                    }
                    Slot::Mem(_) => {}
                }
            }
        }

        // Child membranes become nested clusters.
        let children = membrane.children().to_vec();
        for child in children {
            writeln!(out, "subgraph cluster{} {{", self.cluster_id)?;
            self.cluster_id += 1;
            self.dump_cell(child, out)?;
            out.write_str("}\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_edges_and_clusters() {
        let mut store = Store::new();
        let root = store.add_membrane(None, None);
        let child = store.add_membrane(Some(root), None);
        let f = store.functor(None, "f", 2);
        let g = store.functor(None, "g", 1);
        let a = store.add_atom(root, f);
        let b = store.add_atom(root, g);
        store.link(a, 1, b, 0).unwrap();
        store.set_int(a, 0, 5).unwrap();
        let c = store.functor(None, "c", 0);
        store.add_atom(child, c);

        let mut s = String::new();
        dump(&store, root, &mut s).unwrap();

        assert!(s.starts_with("graph {\n"));
        assert!(s.ends_with("}\n"));
        assert!(s.contains("a0 [label = \"f\", shape = circle];"));
        assert!(s.contains("a0_0 [label = \"5\", shape = box];"));
        assert!(s.contains("a0 -- a0_0"));
        assert!(s.contains("a0 -- a1"));
        // The reverse direction of the same link is not drawn.
        assert!(!s.contains("a1 -- a0"));
        assert!(s.contains("subgraph cluster0 {"));
        assert!(s.contains("a2 [label = \"c\", shape = circle];"));
    }

    #[test]
    fn self_edge_drawn_once() {
        let mut store = Store::new();
        let root = store.add_membrane(None, None);
        let f = store.functor(None, "loop", 2);
        let a = store.add_atom(root, f);
        store.link(a, 0, a, 1).unwrap();

        let mut s = String::new();
        dump(&store, root, &mut s).unwrap();
        assert_eq!(s.matches("a0 -- a0\n").count(), 1);
    }
}
