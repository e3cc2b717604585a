//! Slot lifecycle: the record table, tombstones, and the free-slot stack.
//!
//! A slot is `Live` (data cached, present in every index bitmap),
//! `Tombstoned` (marked deleted, imprint still in the bitmaps until
//! compaction), or free for reuse. Deletion is lazy: marking a slot pushes
//! it onto the free stack immediately, and a pop that yields a slot whose
//! old imprint is still indexed hands the cached bytes back to the caller
//! so it can scrub the bitmaps before writing the new record
//! (reincarnation).

use roaring::RoaringBitmap;

use crate::error::{Error, Result};
use crate::tid::Tid;

use super::Slot;

/// CRUD traffic counters, surfaced through index statistics.
///
/// `updates` counts host-protocol updates (delete + insert pairs the host
/// accounts as one logical operation); the core itself has no in-place
/// update.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub(crate) inserts: u64,
    pub(crate) updates: u64,
    pub(crate) deletes: u64,
}

/// Result of allocating a slot.
pub(crate) struct SlotAllocation {
    pub(crate) slot: Slot,
    /// Cached bytes of the previous occupant, present when the slot was
    /// reused before compaction scrubbed its imprint. The caller must
    /// remove that imprint from every bitmap before indexing new data.
    pub(crate) previous: Option<Box<[u8]>>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SlotTable {
    tids: Vec<Tid>,
    strings: Vec<Option<Box<[u8]>>>,
    tombstones: RoaringBitmap,
    free: Vec<Slot>,
    counters: Counters,
}

impl SlotTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            tids: Vec::with_capacity(capacity),
            strings: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// High-water mark `N`: slot numbers handed out so far.
    pub(crate) fn slot_count(&self) -> u32 {
        // Allocation caps the table at u32::MAX entries.
        u32::try_from(self.tids.len()).unwrap_or(u32::MAX)
    }

    /// Pops a reusable slot, or extends the table.
    ///
    /// Popping clears the slot's tombstone bit and surrenders its cached
    /// bytes for imprint scrubbing.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExhausted`] when the table already addresses the
    /// full `u32` slot range. Previously inserted records are unaffected.
    pub(crate) fn allocate(&mut self) -> Result<SlotAllocation> {
        if let Some(slot) = self.free.pop() {
            self.tombstones.remove(slot);
            let previous = self.strings[slot as usize].take();
            return Ok(SlotAllocation { slot, previous });
        }
        if self.tids.len() >= u32::MAX as usize {
            return Err(Error::CapacityExhausted {
                max: u64::from(u32::MAX),
            });
        }
        let slot = self.tids.len() as u32;
        self.tids.push(Tid::default());
        self.strings.push(None);
        Ok(SlotAllocation {
            slot,
            previous: None,
        })
    }

    /// Stores the record data for a freshly allocated slot.
    pub(crate) fn store(&mut self, slot: Slot, tid: Tid, bytes: &[u8]) {
        self.tids[slot as usize] = tid;
        self.strings[slot as usize] = Some(bytes.into());
    }

    /// Marks a slot deleted: tombstone it and queue it for reuse.
    ///
    /// Returns `false` (and does nothing) if the slot is already
    /// tombstoned.
    pub(crate) fn mark_deleted(&mut self, slot: Slot) -> bool {
        if !self.tombstones.insert(slot) {
            return false;
        }
        self.free.push(slot);
        self.counters.deletes += 1;
        true
    }

    /// True when the slot currently holds queryable data.
    pub(crate) fn is_live(&self, slot: Slot) -> bool {
        self.strings[slot as usize].is_some() && !self.tombstones.contains(slot)
    }

    pub(crate) fn tid(&self, slot: Slot) -> Tid {
        self.tids[slot as usize]
    }

    pub(crate) fn tombstones(&self) -> &RoaringBitmap {
        &self.tombstones
    }

    pub(crate) fn tombstone_count(&self) -> u64 {
        self.tombstones.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn live_count(&self) -> u64 {
        // Every tombstoned slot still caches its bytes (they are released
        // on compaction or reincarnation), so the subtraction is exact.
        let cached = self.strings.iter().filter(|s| s.is_some()).count() as u64;
        cached - self.tombstones.len()
    }

    /// Slots that still cache record bytes, tombstoned or not.
    pub(crate) fn iter_cached(&self) -> impl Iterator<Item = (Slot, &[u8])> + '_ {
        self.strings
            .iter()
            .enumerate()
            .filter_map(|(slot, bytes)| bytes.as_deref().map(|b| (slot as u32, b)))
    }

    /// Takes the tombstone set for compaction, releasing the cached bytes
    /// of every tombstoned slot. The free stack is left untouched: marked
    /// slots were queued for reuse when they were deleted.
    pub(crate) fn purge_tombstones(&mut self) -> RoaringBitmap {
        let dead = std::mem::take(&mut self.tombstones);
        for slot in &dead {
            self.strings[slot as usize] = None;
        }
        dead
    }

    pub(crate) fn counters(&self) -> Counters {
        self.counters
    }

    pub(crate) fn record_insert(&mut self) {
        self.counters.inserts += 1;
    }

    /// Accounts one host-level update (issued to the core as
    /// delete + insert).
    #[allow(dead_code)]
    pub(crate) fn record_update(&mut self) {
        self.counters.updates += 1;
    }
}
