//! Raw introspection dump.
//!
//! One line per atom: functor id, name, arity, arena identity, and a
//! descriptor per slot. Recurses into child membranes unconditionally and
//! ignores the visitation ledger entirely; this grammar exists to diagnose
//! graphs too corrupt for the term printer.

use crate::atom::Slot;
use crate::config::DumpConfig;
use crate::dump::DumpError;
use crate::membrane::MembraneId;
use crate::store::Store;
use std::fmt::Write;

pub(crate) fn dump<W: Write>(
    store: &Store,
    cfg: &DumpConfig,
    mem: MembraneId,
    out: &mut W,
) -> Result<(), DumpError> {
    dump_membrane(store, cfg, mem, out)
}

fn dump_membrane<W: Write>(
    store: &Store,
    cfg: &DumpConfig,
    mem: MembraneId,
    out: &mut W,
) -> Result<(), DumpError> {
    let membrane = store.membrane(mem);

    out.write_str("{\n")?;
    let name = membrane
        .name
        .map(|n| store.functors().symbol_name(n))
        .unwrap_or("");
    writeln!(out, "Mem[{}], Addr[{}]", name, mem.as_u32())?;

    for atom in membrane.atoms() {
        let a = store.atom(atom);
        write!(
            out,
            "Func[{}], Name[{}], A[{}], Addr[{}], ",
            a.functor.as_u32(),
            store.functors().name_of(a.functor),
            a.arity(),
            atom.as_u32()
        )?;
        for (i, slot) in a.slots.iter().enumerate() {
            write!(out, "{}: ", i)?;
            match *slot {
                Slot::Link { peer, peer_slot } => {
                    write!(out, "link[{}, {}], ", peer_slot, peer.as_u32())?
                }
                Slot::Int(v) => write!(out, "int[{}], ", v)?,
                Slot::Float(v) => write!(out, "double[{}], ", v)?,
                Slot::Mem(id) => write!(out, "mem[{}], ", id.as_u32())?,
                Slot::Other(tag) => write!(out, "unknown data type[{}], ", tag)?,
            }
        }
        out.write_char('\n')?;
    }

    if cfg.show_rulesets {
        out.write_str("ruleset[")?;
        for ruleset in &membrane.rulesets {
            write!(out, "{} ", ruleset)?;
        }
        out.write_str("]\n")?;
    }

    for &child in membrane.children() {
        dump_membrane(store, cfg, child, out)?;
    }

    out.write_str("}\n")?;
    Ok(())
}
