//! Wildcard pattern parsing and scalar matching.
//!
//! A pattern is a byte string with two metacharacters: `%` matches any run
//! of bytes (including the empty run) and `_` matches exactly one byte.
//! There is no escape mechanism at this level; hosts that support escapes
//! run their escape processor before handing the pattern to the core.
//!
//! The parsed representation ([`Pattern`]) — literal segments split on `%`
//! plus the two anchoring flags — is the canonical form the bitmap engine
//! dispatches on. [`like_match`] is the scalar reference matcher used for
//! host-side rechecks and differential testing.

mod matching;
mod parser;

pub use matching::like_match;
pub use parser::{Pattern, Segment, WILDCARD_ANY, WILDCARD_ONE};
