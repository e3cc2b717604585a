//! Length-keyed bitmaps.
//!
//! Two dense arrays keyed by record length: `exact[len]` holds the slots of
//! records with exactly that length, `at_least[k]` those with length `>= k`.
//! The `at_least` side is materialized rather than derived on demand — a
//! record of length `len` appears in `at_least[0..=len]`, which costs
//! O(`max_len` <= 256) bitmap insertions per record and makes the hottest
//! engine lookups (initial candidates, all-wildcard segments) a single
//! indexed access.

use roaring::RoaringBitmap;

use super::Slot;

#[derive(Debug, Clone, Default)]
pub(crate) struct LengthIndex {
    exact: Vec<RoaringBitmap>,
    at_least: Vec<RoaringBitmap>,
}

impl LengthIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes both arrays for lengths `0..=max_len`.
    pub(crate) fn with_max_len(max_len: usize) -> Self {
        let mut index = Self::new();
        index.grow(max_len);
        index
    }

    fn grow(&mut self, len: usize) {
        while self.exact.len() <= len {
            self.exact.push(RoaringBitmap::new());
            self.at_least.push(RoaringBitmap::new());
        }
    }

    /// Records a slot of the given length, growing the arrays as needed.
    pub(crate) fn add(&mut self, len: usize, slot: Slot) {
        self.grow(len);
        self.exact[len].insert(slot);
        for bucket in &mut self.at_least[..=len] {
            bucket.insert(slot);
        }
    }

    pub(crate) fn remove(&mut self, len: usize, slot: Slot) {
        if let Some(bucket) = self.exact.get_mut(len) {
            bucket.remove(slot);
        }
        let upper = self.at_least.len().min(len + 1);
        for bucket in &mut self.at_least[..upper] {
            bucket.remove(slot);
        }
    }

    /// Slots whose record length is exactly `len`.
    pub(crate) fn exact(&self, len: usize) -> Option<&RoaringBitmap> {
        self.exact.get(len)
    }

    /// Slots whose record length is at least `len`.
    pub(crate) fn at_least(&self, len: usize) -> Option<&RoaringBitmap> {
        self.at_least.get(len)
    }

    /// Owned copy of `at_least(len)`, empty when out of range.
    pub(crate) fn at_least_clone(&self, len: usize) -> RoaringBitmap {
        self.at_least(len).cloned().unwrap_or_default()
    }

    pub(crate) fn subtract(&mut self, dead: &RoaringBitmap) {
        for bucket in &mut self.exact {
            *bucket -= dead;
        }
        for bucket in &mut self.at_least {
            *bucket -= dead;
        }
    }
}
