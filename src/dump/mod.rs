//! Canonical-form serialization of the membrane/atom graph.
//!
//! Three output grammars share one underlying traversal: the default term
//! syntax, a Graphviz DOT description, and a raw introspection dump. A dump
//! is a pure read of the store; the only mutable state is the per-call
//! visitation ledger and link namer.
//!
//! Entry points: [`dump_mem`] renders a membrane including its own braces,
//! [`dump_cell`] renders only its contents. Both take a caller-supplied
//! [`DumpConfig`] and write to any [`std::fmt::Write`] sink.

pub mod debug;
pub mod ledger;
mod dot;
mod term;

use crate::atom::{AtomId, AtomKind, Slot};
use crate::config::{DumpConfig, OutputFormat};
use crate::functor::{is_plain_identifier, FunctorId};
use crate::membrane::MembraneId;
use crate::store::Store;
use std::fmt::{self, Write};

/// Recursion-depth ceiling for the node printer.
///
/// A safety valve converting pathological nesting into a back-reference, not
/// a cycle detector (the visited flags do that).
pub(crate) const MAX_DEPTH: usize = 1000;

/// Error type for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpError {
    /// The boundary-marker adjacency graph contains a cycle not mediated by
    /// non-marker structure. The input is structurally corrupt.
    MarkerCycle {
        /// Marker at which the cycle was detected.
        atom: AtomId,
    },
    /// A hidden boundary marker was reached without a propagated chain id.
    UnassignedMarker {
        /// The unassigned marker.
        atom: AtomId,
    },
    /// The output sink failed.
    Fmt(fmt::Error),
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpError::MarkerCycle { atom } => write!(
                f,
                "boundary-marker chain through atom {} is cyclic (corrupt graph)",
                atom.as_u32()
            ),
            DumpError::UnassignedMarker { atom } => write!(
                f,
                "boundary marker {} reached without an assigned link id",
                atom.as_u32()
            ),
            DumpError::Fmt(_) => write!(f, "output sink error"),
        }
    }
}

impl std::error::Error for DumpError {}

impl From<fmt::Error> for DumpError {
    fn from(e: fmt::Error) -> Self {
        DumpError::Fmt(e)
    }
}

/// Serializes `mem` with its enclosing braces (default format), or the whole
/// graph description for the DOT and debug grammars.
pub fn dump_mem<W: Write>(
    store: &Store,
    mem: MembraneId,
    cfg: &DumpConfig,
    out: &mut W,
) -> Result<(), DumpError> {
    match cfg.format {
        OutputFormat::Default => {
            out.write_char('{')?;
            term::TermPrinter::new(store, cfg, out).dump_cell_contents(mem)?;
            out.write_str("}\n")?;
            Ok(())
        }
        OutputFormat::Dot => dot::dump(store, mem, out),
        OutputFormat::Debug => debug::dump(store, cfg, mem, out),
    }
}

/// Serializes the contents of `mem` without braces (default format); DOT and
/// debug render identically through either entry point.
pub fn dump_cell<W: Write>(
    store: &Store,
    mem: MembraneId,
    cfg: &DumpConfig,
    out: &mut W,
) -> Result<(), DumpError> {
    match cfg.format {
        OutputFormat::Default => {
            term::TermPrinter::new(store, cfg, out).dump_cell_contents(mem)?;
            out.write_char('\n')?;
            Ok(())
        }
        OutputFormat::Dot => dot::dump(store, mem, out),
        OutputFormat::Debug => debug::dump(store, cfg, mem, out),
    }
}

/// Writes a functor's printed name: optional `module.` prefix, quoted unless
/// it reads as a plain identifier. Nil and boundary markers are exempt from
/// quoting.
pub(crate) fn write_atom_name<W: Write>(
    out: &mut W,
    store: &Store,
    functor: FunctorId,
    kind: AtomKind,
) -> fmt::Result {
    if let Some(module) = store.functors().module_of(functor) {
        write!(out, "{}.", module)?;
    }
    let name = store.functors().name_of(functor);
    let direct = matches!(kind, AtomKind::Nil | AtomKind::Marker(_)) || is_plain_identifier(name);
    if direct {
        out.write_str(name)
    } else {
        write!(out, "'{}'", name)
    }
}

/// Writes a data slot's literal form. Unrecognized tags render as an explicit
/// sentinel and are logged as a broken invariant, never dropped.
pub(crate) fn write_data_value<W: Write>(out: &mut W, slot: &Slot) -> fmt::Result {
    match slot {
        Slot::Int(v) => write!(out, "{}", v),
        Slot::Float(v) => write!(out, "{}", v),
        Slot::Other(tag) => {
            log::warn!("dumping unknown edge-attribute tag {}", tag);
            write!(out, "*[{}]", tag)
        }
        Slot::Mem(id) => {
            log::warn!("membrane attribute reached as printable data");
            write!(out, "*[mem {}]", id.as_u32())
        }
        Slot::Link { .. } => {
            debug_assert!(false, "link slots are not data");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::MarkerDir;

    #[test]
    fn atom_name_quoting() {
        let mut store = Store::new();
        let plain = store.functor(None, "abc", 0);
        let odd = store.functor(None, "Abc", 0);
        let qualified = store.functor(Some("m"), "f", 0);

        let mut s = String::new();
        write_atom_name(&mut s, &store, plain, AtomKind::Symbol).unwrap();
        assert_eq!(s, "abc");

        s.clear();
        write_atom_name(&mut s, &store, odd, AtomKind::Symbol).unwrap();
        assert_eq!(s, "'Abc'");

        s.clear();
        write_atom_name(&mut s, &store, qualified, AtomKind::Symbol).unwrap();
        assert_eq!(s, "m.f");
    }

    #[test]
    fn marker_and_nil_names_never_quote() {
        let mut store = Store::new();
        let mem = store.add_membrane(None, None);
        let marker = store.add_marker(mem, MarkerDir::In);
        let functor = store.atom(marker).functor;

        let mut s = String::new();
        write_atom_name(&mut s, &store, functor, AtomKind::Marker(MarkerDir::In)).unwrap();
        assert_eq!(s, "$in");
    }

    #[test]
    fn data_literals() {
        let mut s = String::new();
        write_data_value(&mut s, &Slot::Int(-3)).unwrap();
        assert_eq!(s, "-3");

        s.clear();
        write_data_value(&mut s, &Slot::Float(1.5)).unwrap();
        assert_eq!(s, "1.5");

        s.clear();
        write_data_value(&mut s, &Slot::Other(9)).unwrap();
        assert_eq!(s, "*[9]");
    }
}
