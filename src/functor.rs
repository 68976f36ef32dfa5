//! Symbol interning and the functor registry.
//!
//! A functor is the label of an atom: an interned name, an optional module
//! qualifier, and a fixed arity. Atoms store a `FunctorId`; the registry maps
//! it back to names and arity for printing.
//!
//! The registry reserves ids for the structural functors the serializer
//! treats specially: the nil sentinel, the list cons cell, and the two
//! boundary-marker directions. Reserved ids are stable constants so shape
//! classification never needs string comparison.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Interned symbol identifier.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Returns the raw `u32` index.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

/// Functor identifier (index into the registry).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctorId(u32);

impl FunctorId {
    /// Returns the raw `u32` index.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Builds an id from a raw index without a registry (tests only).
    #[cfg(test)]
    pub(crate) const fn from_raw_for_test(raw: u32) -> Self {
        Self(raw)
    }
}

/// Nil sentinel functor `'[]'/1`.
pub const NIL_FUNCTOR: FunctorId = FunctorId(0);
/// List cons functor `'.'/3` (element, continuation, output).
pub const CONS_FUNCTOR: FunctorId = FunctorId(1);
/// Inbound boundary marker `'$in'/3` (local, pair, membrane).
pub const IN_MARKER_FUNCTOR: FunctorId = FunctorId(2);
/// Outbound boundary marker `'$out'/3` (local, pair, membrane).
pub const OUT_MARKER_FUNCTOR: FunctorId = FunctorId(3);

/// A functor definition: name, optional module, fixed arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Functor {
    /// Interned atom name.
    pub name: SymbolId,
    /// Module qualifier, `None` for the anonymous module.
    pub module: Option<SymbolId>,
    /// Number of argument slots.
    pub arity: u8,
}

/// Interning registry for symbols and functors.
///
/// Lookups by id are infallible for ids the registry handed out; iteration
/// order of registration is the order of ids, which keeps anything derived
/// from `FunctorId` ordering deterministic.
#[derive(Debug, Clone, Default)]
pub struct FunctorTable {
    symbols: Vec<String>,
    symbol_index: HashMap<String, SymbolId>,
    functors: Vec<Functor>,
    functor_index: HashMap<(Option<SymbolId>, SymbolId, u8), FunctorId>,
}

impl FunctorTable {
    /// Creates a registry with the reserved structural functors installed.
    pub fn new() -> Self {
        let mut table = Self::default();
        let nil = table.functor(None, "[]", 1);
        let cons = table.functor(None, ".", 3);
        let inm = table.functor(None, "$in", 3);
        let outm = table.functor(None, "$out", 3);
        debug_assert_eq!(nil, NIL_FUNCTOR);
        debug_assert_eq!(cons, CONS_FUNCTOR);
        debug_assert_eq!(inm, IN_MARKER_FUNCTOR);
        debug_assert_eq!(outm, OUT_MARKER_FUNCTOR);
        table
    }

    /// Interns `name`, returning its stable `SymbolId`.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.symbol_index.get(name) {
            return id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(name.to_owned());
        self.symbol_index.insert(name.to_owned(), id);
        id
    }

    /// Returns the string for an interned symbol.
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        &self.symbols[id.0 as usize]
    }

    /// Registers (or finds) the functor `module.name/arity`.
    pub fn functor(&mut self, module: Option<&str>, name: &str, arity: u8) -> FunctorId {
        let module = module.map(|m| self.intern(m));
        let name = self.intern(name);
        if let Some(&id) = self.functor_index.get(&(module, name, arity)) {
            return id;
        }
        let id = FunctorId(self.functors.len() as u32);
        self.functors.push(Functor {
            name,
            module,
            arity,
        });
        self.functor_index.insert((module, name, arity), id);
        id
    }

    /// Returns the definition of a registered functor.
    pub fn get(&self, id: FunctorId) -> &Functor {
        &self.functors[id.0 as usize]
    }

    /// Returns the functor's name string.
    pub fn name_of(&self, id: FunctorId) -> &str {
        self.symbol_name(self.get(id).name)
    }

    /// Returns the functor's module name string, if qualified.
    pub fn module_of(&self, id: FunctorId) -> Option<&str> {
        self.get(id).module.map(|m| self.symbol_name(m))
    }

    /// Returns the functor's arity.
    pub fn arity_of(&self, id: FunctorId) -> u8 {
        self.get(id).arity
    }
}

/// Returns `true` if `name` prints without quotes: a lowercase letter
/// followed by letters, digits, or underscores.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_functors_installed() {
        let table = FunctorTable::new();
        assert_eq!(table.name_of(NIL_FUNCTOR), "[]");
        assert_eq!(table.arity_of(NIL_FUNCTOR), 1);
        assert_eq!(table.name_of(CONS_FUNCTOR), ".");
        assert_eq!(table.arity_of(CONS_FUNCTOR), 3);
        assert_eq!(table.name_of(IN_MARKER_FUNCTOR), "$in");
        assert_eq!(table.name_of(OUT_MARKER_FUNCTOR), "$out");
    }

    #[test]
    fn interning_is_stable() {
        let mut table = FunctorTable::new();
        let a = table.intern("foo");
        let b = table.intern("foo");
        assert_eq!(a, b);
        assert_eq!(table.symbol_name(a), "foo");

        let f1 = table.functor(None, "foo", 2);
        let f2 = table.functor(None, "foo", 2);
        let f3 = table.functor(None, "foo", 3);
        assert_eq!(f1, f2);
        assert_ne!(f1, f3);
    }

    #[test]
    fn module_qualified_functors_are_distinct() {
        let mut table = FunctorTable::new();
        let plain = table.functor(None, "f", 1);
        let qualified = table.functor(Some("m"), "f", 1);
        assert_ne!(plain, qualified);
        assert_eq!(table.module_of(qualified), Some("m"));
        assert_eq!(table.module_of(plain), None);
    }

    #[test]
    fn plain_identifier_rules() {
        assert!(is_plain_identifier("abc"));
        assert!(is_plain_identifier("a_1"));
        assert!(!is_plain_identifier("Abc"));
        assert!(!is_plain_identifier("1a"));
        assert!(!is_plain_identifier(""));
        assert!(!is_plain_identifier("a-b"));
        assert!(!is_plain_identifier("."));
    }
}
