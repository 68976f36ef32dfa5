//! Brane: a nested membrane/atom graph store with a canonical-form
//! serializer.
//!
//! The store holds labeled nodes ("atoms") joined by undirected binary edges
//! inside nestable containers ("membranes"). Edges that cross a membrane
//! boundary are realized as paired boundary-marker atoms. The serializer
//! converts a snapshot of this cyclic, pointer-shaped structure into
//! deterministic external representations:
//!
//! - a textual term syntax (`{a(1,2). }`),
//! - a Graphviz-compatible DOT description,
//! - a raw introspection dump for diagnosing corrupt graphs.
//!
//! # Determinism
//!
//! Serializing the same snapshot twice yields byte-identical output in every
//! format. Membranes group atoms in `BTreeMap` order, arenas iterate in index
//! order, and every external link number comes from a monotone per-call
//! allocator, so nothing depends on hash iteration or addresses.
//!
//! # Example
//!
//! ```
//! use brane::prelude::*;
//!
//! let mut store = Store::new();
//! let mem = store.add_membrane(None, None);
//! let f = store.functor(None, "a", 2);
//! let atom = store.add_atom(mem, f);
//! store.set_int(atom, 0, 1)?;
//! store.set_int(atom, 1, 2)?;
//!
//! let mut out = String::new();
//! dump_mem(&store, mem, &DumpConfig::default(), &mut out)?;
//! assert_eq!(out, "{a(1,2). }\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arena;
pub mod atom;
pub mod config;
pub mod dump;
pub mod functor;
pub mod membrane;
pub mod store;

pub use atom::{Atom, AtomId, AtomKind, MarkerDir, Slot};
pub use config::{DumpConfig, OutputFormat};
pub use dump::{dump_cell, dump_mem, DumpError};
pub use functor::{Functor, FunctorId, FunctorTable, SymbolId};
pub use membrane::{Membrane, MembraneId};
pub use store::{Store, StoreError};

/// Common imports for building and serializing graphs.
pub mod prelude {
    pub use crate::atom::{Atom, AtomId, AtomKind, MarkerDir, Slot};
    pub use crate::config::{DumpConfig, OutputFormat};
    pub use crate::dump::{dump_cell, dump_mem, DumpError};
    pub use crate::functor::{Functor, FunctorId, FunctorTable, SymbolId};
    pub use crate::membrane::{Membrane, MembraneId};
    pub use crate::store::{Store, StoreError};
}
