//! Pattern parsing into the segment form consumed by the bitmap engine.

/// Metacharacter matching any run of bytes, including the empty run.
pub const WILDCARD_ANY: u8 = b'%';

/// Metacharacter matching exactly one byte of any value.
pub const WILDCARD_ONE: u8 = b'_';

/// A maximal run of non-`%` pattern bytes.
///
/// Segments may contain `_` wildcards; those contribute position arithmetic
/// but no bitmap lookups during matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    bytes: Vec<u8>,
}

impl Segment {
    fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Number of record positions the segment occupies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length segment. Never true for parsed segments:
    /// empty runs between consecutive `%` are dropped during parsing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw segment bytes, wildcards included.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True if every byte is a `_` wildcard.
    #[must_use]
    pub fn is_all_wildcards(&self) -> bool {
        self.bytes.iter().all(|&b| b == WILDCARD_ONE)
    }

    /// Offsets and values of the non-wildcard bytes.
    pub(crate) fn concrete_bytes(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.bytes
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b != WILDCARD_ONE)
            .map(|(offset, &b)| (offset, b))
    }

    pub(crate) fn starts_with_wildcard(&self) -> bool {
        self.bytes.first() == Some(&WILDCARD_ONE)
    }

    pub(crate) fn ends_with_wildcard(&self) -> bool {
        self.bytes.last() == Some(&WILDCARD_ONE)
    }
}

/// Parsed wildcard pattern: ordered segments plus anchoring flags.
///
/// This is the canonical intermediate form of the engine: fast-path
/// dispatch is a match over the structure (segment count and flags) rather
/// than repeated string inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
    starts_any: bool,
    ends_any: bool,
    has_percent: bool,
    min_len: usize,
}

impl Pattern {
    /// Parses a raw pattern byte string.
    ///
    /// Splits on `%`, drops empty runs between consecutive `%`, and records
    /// whether the pattern begins or ends with `%`.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Self {
        let starts_any = raw.first() == Some(&WILDCARD_ANY);
        let ends_any = raw.last() == Some(&WILDCARD_ANY);
        let has_percent = raw.contains(&WILDCARD_ANY);
        let segments: Vec<Segment> = raw
            .split(|&b| b == WILDCARD_ANY)
            .filter(|run| !run.is_empty())
            .map(Segment::new)
            .collect();
        let min_len = segments.iter().map(Segment::len).sum();
        Self {
            segments,
            starts_any,
            ends_any,
            has_percent,
            min_len,
        }
    }

    /// The literal segments in pattern order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if the pattern began with `%`.
    #[must_use]
    pub fn starts_any(&self) -> bool {
        self.starts_any
    }

    /// True if the pattern ended with `%`.
    #[must_use]
    pub fn ends_any(&self) -> bool {
        self.ends_any
    }

    /// True if the pattern contained at least one `%`.
    #[must_use]
    pub fn has_percent(&self) -> bool {
        self.has_percent
    }

    /// Minimum record length any match must have (sum of segment lengths).
    #[must_use]
    pub fn min_len(&self) -> usize {
        self.min_len
    }
}
