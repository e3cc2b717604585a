//! The Biscuit index core.
//!
//! One mutable value, [`BiscuitIndex`], owns every structure: the forward
//! and reverse positional bitmaps, the per-character presence cache, the
//! length bitmaps, and the slot table (TIDs, cached record bytes,
//! tombstones, free stack, counters). The ownership graph is a pure tree;
//! per-query intermediates live and die inside the query call.
//!
//! Concurrency follows the host contract: mutations (`build`, `insert`,
//! `bulk_delete`, `compact`) take `&mut self`, queries take `&self`, so the
//! single-writer/multi-reader discipline is enforced by the borrow checker
//! rather than by locks. Readers that start after a mutation completes see
//! its effects; an in-flight reader holds the borrow until it finishes.
//!
//! Module layout:
//!
//! - `positional` / `length` / `slots` - component structures
//! - `crud` - bulk build, insert (with slot reincarnation), bulk delete,
//!   threshold compaction
//! - `executor` - the pattern engine (fast paths + windowed matcher)
//! - `statistics` - diagnostic snapshot

mod crud;
mod executor;
mod length;
mod positional;
mod slots;
mod statistics;

pub use crud::DeleteStats;
pub use statistics::IndexStats;

#[cfg(test)]
mod tests;


use crate::config::IndexConfig;
use crate::error::{Error, Result};

use self::length::LengthIndex;
use self::positional::{CharPresence, PositionalIndex};
use self::slots::SlotTable;

/// Internal record identifier, decoupled from the host TID.
pub type Slot = u32;

/// Number of distinct byte values a record position can hold.
pub(crate) const CHAR_RANGE: usize = 256;

/// Records longer than this are truncated on ingest; pattern positions at
/// or beyond this bound can never match.
pub const MAX_RECORD_LEN: usize = 256;

/// Position-indexed bitmap engine for `LIKE`-style wildcard matching.
///
/// # Example
///
/// ```
/// use biscuit_core::{BiscuitIndex, Tid};
///
/// let mut index = BiscuitIndex::new();
/// index.build([
///     (Tid::new(1, 1), Some(b"admin".to_vec())),
///     (Tid::new(2, 1), Some(b"administrator".to_vec())),
///     (Tid::new(3, 1), Some(b"john".to_vec())),
/// ])?;
///
/// let hits = index.search(b"admin%");
/// assert_eq!(hits, vec![Tid::new(1, 1), Tid::new(2, 1)]);
/// # Ok::<(), biscuit_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BiscuitIndex {
    forward: PositionalIndex,
    reverse: PositionalIndex,
    chars: CharPresence,
    lengths: LengthIndex,
    slots: SlotTable,
    /// Largest (truncated) record length ever observed; monotone.
    max_len: usize,
    config: IndexConfig,
}

impl Default for BiscuitIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl BiscuitIndex {
    /// Creates an empty index with default configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = IndexConfig::default();
        Self {
            forward: PositionalIndex::new(),
            reverse: PositionalIndex::new(),
            chars: CharPresence::new(),
            lengths: LengthIndex::new(),
            slots: SlotTable::with_capacity(config.initial_slot_capacity),
            max_len: 0,
            config,
        }
    }

    /// Creates an empty index with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration fails validation.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            slots: SlotTable::with_capacity(config.initial_slot_capacity),
            config,
            ..Self::new()
        })
    }

    /// Creates an index for a host relation with `column_count` key
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedColumnCount`] unless exactly one column
    /// is indexed, or [`Error::Config`] for invalid configuration.
    pub fn for_columns(column_count: usize, config: IndexConfig) -> Result<Self> {
        if column_count != 1 {
            return Err(Error::UnsupportedColumnCount(column_count));
        }
        Self::with_config(config)
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Largest record length observed so far.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of live (queryable) records.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.slots.live_count()
    }

    /// True when no live record exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all records and bitmaps, keeping the configuration.
    fn reset(&mut self) {
        self.forward = PositionalIndex::new();
        self.reverse = PositionalIndex::new();
        self.chars = CharPresence::new();
        self.lengths = LengthIndex::new();
        self.slots = SlotTable::with_capacity(self.config.initial_slot_capacity);
        self.max_len = 0;
    }

    /// Adds a record's positional and presence imprint.
    ///
    /// `bytes` must already be truncated to [`MAX_RECORD_LEN`].
    fn index_record(&mut self, slot: Slot, bytes: &[u8]) {
        let len = bytes.len() as i32;
        for (pos, &byte) in bytes.iter().enumerate() {
            let pos = pos as i32;
            self.forward.add(byte, pos, slot);
            self.reverse.add(byte, pos - len, slot);
            self.chars.add(byte, slot);
        }
    }

    /// Removes a reused slot's previous imprint from every bitmap,
    /// restoring the index invariants before new data is written.
    fn remove_imprint(&mut self, slot: Slot, bytes: &[u8]) {
        let len = bytes.len() as i32;
        for (pos, &byte) in bytes.iter().enumerate() {
            let pos = pos as i32;
            self.forward.remove(byte, pos, slot);
            self.reverse.remove(byte, pos - len, slot);
            self.chars.remove(byte, slot);
        }
        self.lengths.remove(bytes.len(), slot);
    }
}
