//! Host tuple identifiers.
//!
//! The index never interprets a [`Tid`] beyond ordering it: results are
//! emitted sorted by `(block, offset)` so the host can drive sequential
//! heap I/O and feed batches straight into a sorted-TID bitmap scan.

use serde::{Deserialize, Serialize};

/// Opaque tuple locator supplied by the host.
///
/// The derived `Ord` compares `(block, offset)` lexicographically, which is
/// exactly the emission order guaranteed by scans.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Tid {
    /// Heap block number.
    pub block: u32,
    /// Item offset within the block.
    pub offset: u16,
}

impl Tid {
    /// Creates a tuple identifier from a block number and item offset.
    #[must_use]
    pub const fn new(block: u32, offset: u16) -> Self {
        Self { block, offset }
    }
}

impl std::fmt::Display for Tid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.block, self.offset)
    }
}
