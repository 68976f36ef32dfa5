//! Slotted arena storage for atoms and membranes.
//!
//! `Arena<T>` is contiguous storage addressed by dense `u32` indices with
//! free-list reuse. The store wraps the raw indices in typed ids
//! (`AtomId`, `MembraneId`), so edges become `(index, slot)` pairs instead of
//! raw pointers and the mutual back-pointer invariant stays checkable.
//!
//! # Determinism
//! - Iteration order over slots is by index (0..capacity).
//! - Free-list reuse is LIFO: the most recently freed slot is handed out
//!   first, so identical allocation/deallocation sequences produce identical
//!   index assignments across runs.

/// Slot in the arena.
#[derive(Debug, Clone)]
struct Slot<T> {
    data: Option<T>,
    next_free: Option<u32>,
}

/// Contiguous storage with free-list reuse.
#[derive(Debug, Clone, Default)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    /// Number of live entries (slots with `data.is_some()`).
    live: usize,
}

impl<T> Arena<T> {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Allocates a slot for `data` and returns its raw index.
    ///
    /// Reuses the head of the free list when one exists, otherwise appends.
    pub fn allocate(&mut self, data: T) -> u32 {
        self.live += 1;
        if let Some(idx) = self.free_head {
            let slot = &mut self.slots[idx as usize];
            debug_assert!(slot.data.is_none(), "free slot must be empty");
            self.free_head = slot.next_free;
            slot.data = Some(data);
            slot.next_free = None;
            idx
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                data: Some(data),
                next_free: None,
            });
            idx
        }
    }

    /// Removes the entry at `idx`, returning its data.
    ///
    /// The slot joins the free list. Returns `None` if the slot is already
    /// free or out of range.
    pub fn remove(&mut self, idx: u32) -> Option<T> {
        let slot = self.slots.get_mut(idx as usize)?;
        let data = slot.data.take()?;
        slot.next_free = self.free_head;
        self.free_head = Some(idx);
        self.live -= 1;
        Some(data)
    }

    /// Returns a reference to the entry at `idx`, if live.
    pub fn get(&self, idx: u32) -> Option<&T> {
        self.slots.get(idx as usize).and_then(|s| s.data.as_ref())
    }

    /// Returns a mutable reference to the entry at `idx`, if live.
    pub fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
        self.slots
            .get_mut(idx as usize)
            .and_then(|s| s.data.as_mut())
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no entries are live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterates over live entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.data.as_ref().map(|d| (i as u32, d)))
    }
}
