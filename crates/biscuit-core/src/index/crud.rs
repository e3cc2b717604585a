//! Bulk build and incremental maintenance.

use crate::error::Result;
use crate::tid::Tid;

use super::length::LengthIndex;
use super::{BiscuitIndex, MAX_RECORD_LEN};

/// Outcome of a bulk-delete pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteStats {
    /// Number of records newly marked deleted.
    pub tuples_removed: u64,
}

impl BiscuitIndex {
    /// Builds the index from scratch over a stream of `(TID, value)`
    /// records, as delivered by a host heap scan.
    ///
    /// Any existing contents are discarded first, so the host restart
    /// protocol (full rebuild from a fresh scan) works on a used value.
    /// Slot numbers are reassigned from zero; nothing may rely on their
    /// stability across rebuilds. Null values are skipped and consume no
    /// slot.
    ///
    /// Two passes: the first populates the positional and presence bitmaps
    /// and caches the (truncated) record bytes, the second sizes the length
    /// bitmaps exactly from the observed maximum and fills them from the
    /// cache.
    ///
    /// Returns the number of records indexed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`](crate::Error::CapacityExhausted)
    /// if the record stream overflows the `u32` slot range; records indexed
    /// before the failure remain consistent.
    pub fn build(
        &mut self,
        records: impl IntoIterator<Item = (Tid, Option<Vec<u8>>)>,
    ) -> Result<u64> {
        self.reset();

        let mut count = 0u64;
        let mut status = Ok(());
        for (tid, value) in records {
            let Some(bytes) = value else { continue };
            let bytes = &bytes[..bytes.len().min(MAX_RECORD_LEN)];
            let slot = match self.slots.allocate() {
                Ok(alloc) => alloc.slot,
                Err(err) => {
                    status = Err(err);
                    break;
                }
            };
            self.slots.store(slot, tid, bytes);
            self.index_record(slot, bytes);
            self.max_len = self.max_len.max(bytes.len());
            count += 1;
        }

        // Second pass over the cached bytes, with the length arrays sized
        // exactly once. Runs even on early exit so the records already in
        // place stay queryable.
        self.rebuild_lengths();
        status?;

        tracing::info!(records = count, max_len = self.max_len, "index build complete");
        Ok(count)
    }

    fn rebuild_lengths(&mut self) {
        let mut lengths = LengthIndex::with_max_len(self.max_len);
        for (slot, bytes) in self.slots.iter_cached() {
            lengths.add(bytes.len(), slot);
        }
        self.lengths = lengths;
    }

    /// Inserts one record.
    ///
    /// A null value is a no-op that reports success. Values longer than
    /// [`MAX_RECORD_LEN`] are truncated. Reuses a free slot when one is
    /// available; if the reused slot still carries a previous record's
    /// imprint (deleted but not yet compacted), that imprint is scrubbed
    /// from every bitmap first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`](crate::Error::CapacityExhausted)
    /// when no slot can be allocated.
    pub fn insert(&mut self, value: Option<&[u8]>, tid: Tid) -> Result<bool> {
        let Some(bytes) = value else {
            return Ok(true);
        };
        let bytes = &bytes[..bytes.len().min(MAX_RECORD_LEN)];

        let alloc = self.slots.allocate()?;
        let slot = alloc.slot;
        if let Some(previous) = alloc.previous {
            self.remove_imprint(slot, &previous);
        }

        self.slots.store(slot, tid, bytes);
        self.index_record(slot, bytes);
        self.lengths.add(bytes.len(), slot);
        self.max_len = self.max_len.max(bytes.len());
        self.slots.record_insert();
        Ok(true)
    }

    /// Applies a host-supplied deletion predicate to every live record.
    ///
    /// Matching slots are tombstoned and queued for reuse; their bitmap
    /// imprint stays in place until compaction, which runs automatically
    /// once the configured tombstone threshold is reached.
    pub fn bulk_delete(&mut self, mut should_delete: impl FnMut(Tid) -> bool) -> DeleteStats {
        let mut removed = 0u64;
        for slot in 0..self.slots.slot_count() {
            if !self.slots.is_live(slot) {
                continue;
            }
            if should_delete(self.slots.tid(slot)) && self.slots.mark_deleted(slot) {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "bulk delete tombstoned records");
        }
        self.maybe_compact();
        DeleteStats {
            tuples_removed: removed,
        }
    }

    fn maybe_compact(&mut self) {
        let tombstones = self.slots.tombstone_count();
        if tombstones >= self.config.tombstone_cleanup_threshold as u64 {
            tracing::info!(
                tombstones,
                threshold = self.config.tombstone_cleanup_threshold,
                "tombstone threshold reached"
            );
            self.compact();
        }
    }

    /// Removes every tombstoned slot from every bitmap and releases the
    /// cached bytes of those slots.
    ///
    /// Slot numbers are not renumbered and the free stack is untouched, so
    /// pending reuse stays valid. Running compaction with no tombstones is
    /// a no-op, which makes the operation idempotent.
    pub fn compact(&mut self) {
        if self.slots.tombstone_count() == 0 {
            return;
        }
        let dead = self.slots.purge_tombstones();
        self.forward.subtract(&dead);
        self.reverse.subtract(&dead);
        self.chars.subtract(&dead);
        self.lengths.subtract(&dead);
        tracing::info!(reclaimed = dead.len(), "compaction complete");
    }
}
