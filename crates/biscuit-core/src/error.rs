//! Error types for the Biscuit index core.
//!
//! One unified error type covers every fallible operation. Error codes
//! follow the pattern `BISCUIT-XXX` for easy debugging; most degraded
//! conditions (unknown characters, positions past every record, empty
//! candidate sets) are not errors at all and simply produce empty results.

use thiserror::Error;

/// Result type alias for Biscuit index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Biscuit index operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The index was created over the wrong number of key columns (BISCUIT-001).
    #[error("[BISCUIT-001] Biscuit index supports exactly one key column, got {0}")]
    UnsupportedColumnCount(usize),

    /// The slot table cannot grow any further (BISCUIT-002).
    ///
    /// Slot numbers are `u32`; an index holding that many records cannot
    /// accept more. Records inserted before the failure remain consistent
    /// and queryable.
    #[error("[BISCUIT-002] Slot capacity exhausted: the index cannot address more than {max} records")]
    CapacityExhausted {
        /// Maximum number of addressable slots.
        max: u64,
    },

    /// Invalid configuration (BISCUIT-003).
    #[error("[BISCUIT-003] Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl Error {
    /// Returns the stable error code (e.g., "BISCUIT-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedColumnCount(_) => "BISCUIT-001",
            Self::CapacityExhausted { .. } => "BISCUIT-002",
            Self::Config(_) => "BISCUIT-003",
        }
    }

    /// Returns true if the operation can be retried after the caller fixes
    /// its input.
    ///
    /// Capacity exhaustion is terminal for the affected index.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CapacityExhausted { .. })
    }
}
