//! Diagnostic statistics.

use serde::Serialize;

use super::BiscuitIndex;

/// Point-in-time snapshot of index health and CRUD traffic.
///
/// The [`Display`](std::fmt::Display) rendering is a free-form human
/// summary, not a stable wire format; programmatic consumers should read
/// the fields (or serialize the struct) instead.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IndexStats {
    /// Records currently visible to queries.
    pub live_records: u64,
    /// Slot high-water mark, including tombstoned and free slots.
    pub total_slots: u32,
    /// Slots queued for reuse.
    pub free_slots: usize,
    /// Slots marked deleted but not yet compacted away.
    pub tombstones: u64,
    /// Largest record length observed.
    pub max_len: usize,
    /// Inserts acknowledged since creation.
    pub inserts: u64,
    /// Host-level updates acknowledged since creation.
    pub updates: u64,
    /// Deletes acknowledged since creation.
    pub deletes: u64,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Biscuit Index Statistics")?;
        writeln!(f, "========================")?;
        writeln!(f, "Live records:  {}", self.live_records)?;
        writeln!(f, "Total slots:   {}", self.total_slots)?;
        writeln!(f, "Free slots:    {}", self.free_slots)?;
        writeln!(f, "Tombstones:    {}", self.tombstones)?;
        writeln!(f, "Max length:    {}", self.max_len)?;
        writeln!(f, "------------------------")?;
        writeln!(f, "Inserts:       {}", self.inserts)?;
        writeln!(f, "Updates:       {}", self.updates)?;
        write!(f, "Deletes:       {}", self.deletes)
    }
}

impl BiscuitIndex {
    /// Collects current statistics.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let counters = self.slots.counters();
        IndexStats {
            live_records: self.slots.live_count(),
            total_slots: self.slots.slot_count(),
            free_slots: self.slots.free_count(),
            tombstones: self.slots.tombstone_count(),
            max_len: self.max_len,
            inserts: counters.inserts,
            updates: counters.updates,
            deletes: counters.deletes,
        }
    }
}
