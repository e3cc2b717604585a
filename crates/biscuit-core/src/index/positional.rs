//! Positional character bitmaps.
//!
//! For every byte value, a sorted vector of `(position, bitmap)` entries
//! records which slots carry that byte at that position. Two instances
//! cover both directions: the forward index keys on offsets from the start
//! (`0, 1, …`), the reverse index on negative offsets from the end
//! (`…, -2, -1`). Sorted vectors beat hash maps here: per-character entry
//! lists are small and mostly contiguous, and the windowed matcher walks
//! neighbouring positions, so binary search plus cache locality wins.

use roaring::RoaringBitmap;

use super::{Slot, CHAR_RANGE};

/// Sorted `(position, bitmap)` entries for a single byte value.
#[derive(Debug, Clone, Default)]
struct PositionMap {
    entries: Vec<PositionEntry>,
}

#[derive(Debug, Clone)]
struct PositionEntry {
    pos: i32,
    slots: RoaringBitmap,
}

impl PositionMap {
    fn find(&self, pos: i32) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&pos, |entry| entry.pos)
    }

    fn get(&self, pos: i32) -> Option<&RoaringBitmap> {
        self.find(pos).ok().map(|i| &self.entries[i].slots)
    }

    fn add(&mut self, pos: i32, slot: Slot) {
        match self.find(pos) {
            Ok(i) => {
                self.entries[i].slots.insert(slot);
            }
            Err(i) => {
                let mut slots = RoaringBitmap::new();
                slots.insert(slot);
                self.entries.insert(i, PositionEntry { pos, slots });
            }
        }
    }

    fn remove(&mut self, pos: i32, slot: Slot) {
        if let Ok(i) = self.find(pos) {
            self.entries[i].slots.remove(slot);
        }
    }

    fn subtract(&mut self, dead: &RoaringBitmap) {
        for entry in &mut self.entries {
            entry.slots -= dead;
        }
        self.entries.retain(|entry| !entry.slots.is_empty());
    }
}

/// Per-character positional index, one [`PositionMap`] per byte value.
#[derive(Debug, Clone)]
pub(crate) struct PositionalIndex {
    per_char: Vec<PositionMap>,
}

impl PositionalIndex {
    pub(crate) fn new() -> Self {
        Self {
            per_char: vec![PositionMap::default(); CHAR_RANGE],
        }
    }

    /// Bitmap of slots carrying `byte` at `pos`, if any slot does.
    pub(crate) fn get(&self, byte: u8, pos: i32) -> Option<&RoaringBitmap> {
        self.per_char[usize::from(byte)].get(pos)
    }

    pub(crate) fn add(&mut self, byte: u8, pos: i32, slot: Slot) {
        self.per_char[usize::from(byte)].add(pos, slot);
    }

    pub(crate) fn remove(&mut self, byte: u8, pos: i32, slot: Slot) {
        self.per_char[usize::from(byte)].remove(pos, slot);
    }

    /// Removes every slot in `dead` from every entry, pruning entries that
    /// become empty.
    pub(crate) fn subtract(&mut self, dead: &RoaringBitmap) {
        for map in &mut self.per_char {
            map.subtract(dead);
        }
    }
}

/// Per-character any-position presence bitmaps.
///
/// `get(b)` holds every slot whose record contains byte `b` anywhere. The
/// engine uses these as a cheap necessary-condition gate before positional
/// work: a pattern byte that appears in no record, or a byte combination
/// with an empty intersection, kills the query without touching the
/// positional index.
#[derive(Debug, Clone)]
pub(crate) struct CharPresence {
    per_char: Vec<RoaringBitmap>,
}

impl CharPresence {
    pub(crate) fn new() -> Self {
        Self {
            per_char: vec![RoaringBitmap::new(); CHAR_RANGE],
        }
    }

    pub(crate) fn get(&self, byte: u8) -> &RoaringBitmap {
        &self.per_char[usize::from(byte)]
    }

    pub(crate) fn add(&mut self, byte: u8, slot: Slot) {
        self.per_char[usize::from(byte)].insert(slot);
    }

    pub(crate) fn remove(&mut self, byte: u8, slot: Slot) {
        self.per_char[usize::from(byte)].remove(slot);
    }

    pub(crate) fn subtract(&mut self, dead: &RoaringBitmap) {
        for slots in &mut self.per_char {
            *slots -= dead;
        }
    }
}
