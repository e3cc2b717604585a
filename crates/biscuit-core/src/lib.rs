//! # Biscuit Core
//!
//! Position-indexed bitmap engine accelerating SQL `LIKE`-style wildcard
//! matching (`_` = one byte, `%` = any run) over short text records.
//!
//! Biscuit is the in-memory core of a secondary index: the host database
//! supplies `(TID, string)` tuples and patterns, the core answers with
//! sorted TID batches. For every byte value and position it keeps a
//! compressed bitmap of the record slots carrying that byte there — both
//! from the start (forward) and from the end (reverse) — plus exact-length
//! and at-least-length bitmaps. A query composes those bitmaps instead of
//! scanning strings; `_` wildcards cost nothing at all, which is where
//! patterns like `_a_b_c%` get their headline speedup.
//!
//! ## Architecture
//!
//! - [`index`] - the engine: positional/length/presence bitmaps, slot
//!   lifecycle (lazy tombstones, free-slot reuse, threshold compaction),
//!   pattern execution
//! - [`pattern`] - pattern parsing and the scalar reference matcher
//! - [`scan`] - sorted-TID scan handles
//! - [`tid`] - host tuple identifiers
//! - [`config`] - tunables (file / `BISCUIT_*` env / defaults)
//! - [`error`] - unified error type with stable `BISCUIT-xxx` codes
//!
//! ## Quick Start
//!
//! ```
//! use biscuit_core::{BiscuitIndex, Tid};
//!
//! let mut index = BiscuitIndex::new();
//! index.build(vec![
//!     (Tid::new(1, 1), Some(b"admin".to_vec())),
//!     (Tid::new(2, 1), Some(b"user_admin".to_vec())),
//! ])?;
//!
//! let mut scan = index.begin_scan(b"%admin");
//! assert_eq!(scan.next_tid(), Some(Tid::new(1, 1)));
//! assert_eq!(scan.next_tid(), Some(Tid::new(2, 1)));
//! # Ok::<(), biscuit_core::Error>(())
//! ```
//!
//! ## Host contract
//!
//! The host serializes mutations and keeps them apart from reads; the API
//! mirrors that: mutating operations take `&mut self`, queries `&self`.
//! Records are opaque byte strings truncated to 256 bytes on ingest;
//! patterns carry no escape mechanism at this level.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod index;
pub mod pattern;
pub mod scan;
pub mod tid;

pub use config::IndexConfig;
pub use error::{Error, Result};
pub use index::{BiscuitIndex, DeleteStats, IndexStats, MAX_RECORD_LEN};
pub use pattern::{like_match, Pattern, Segment};
pub use scan::PatternScan;
pub use tid::Tid;
