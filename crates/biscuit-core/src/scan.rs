//! Scan handles over query results.

use crate::index::BiscuitIndex;
use crate::tid::Tid;

/// An executed pattern scan: a sorted TID buffer with a cursor.
///
/// The buffer is owned by the handle and released when it is dropped
/// (the `end_scan` of the host contract). Each scan is independent;
/// concurrent scans over the same index never interact.
#[derive(Debug, Clone)]
pub struct PatternScan {
    tids: Vec<Tid>,
    cursor: usize,
}

impl PatternScan {
    pub(crate) fn new(tids: Vec<Tid>) -> Self {
        Self { tids, cursor: 0 }
    }

    /// Returns the next matching TID, advancing the cursor.
    ///
    /// TIDs are yielded in ascending `(block, offset)` order.
    pub fn next_tid(&mut self) -> Option<Tid> {
        let tid = self.tids.get(self.cursor).copied();
        if tid.is_some() {
            self.cursor += 1;
        }
        tid
    }

    /// The full sorted result batch, regardless of cursor position.
    ///
    /// Hosts feeding a bitmap scan ingest this in one call.
    #[must_use]
    pub fn all_tids(&self) -> &[Tid] {
        &self.tids
    }

    /// Total number of matches in the scan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tids.len()
    }

    /// True when the scan matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tids.is_empty()
    }
}

impl BiscuitIndex {
    /// Executes `pattern` and returns a scan handle over the sorted
    /// matches.
    #[must_use]
    pub fn begin_scan(&self, pattern: &[u8]) -> PatternScan {
        PatternScan::new(self.search(pattern))
    }
}
