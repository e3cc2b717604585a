//! The pattern engine: bitmap composition for wildcard queries.
//!
//! `_` wildcards contribute no bitmap work at all — they are consumed by
//! position arithmetic, so a pattern like `_a_b_c%` costs three
//! intersections, not seven. `%` boundaries drive either a single-segment
//! fast path (exact / prefix / suffix / contains) or the recursive windowed
//! matcher, with the length bitmaps bounding every window and the
//! per-character presence cache killing impossible queries before any
//! positional lookups.
//!
//! All entry points take `&self`; intermediate bitmaps are owned by the
//! query and dropped before it returns.

#![allow(clippy::cast_possible_truncation)] // positions are bounded by MAX_RECORD_LEN
#![allow(clippy::cast_possible_wrap)]

use roaring::RoaringBitmap;

use crate::pattern::{Pattern, Segment};
use crate::tid::Tid;

use super::{BiscuitIndex, MAX_RECORD_LEN};

impl BiscuitIndex {
    /// Returns the TIDs of every live record matching `pattern`, sorted
    /// ascending by `(block, offset)`.
    #[must_use]
    pub fn search(&self, pattern: &[u8]) -> Vec<Tid> {
        let parsed = Pattern::parse(pattern);
        let mut slots = self.execute(&parsed);
        if self.slots.tombstone_count() > 0 {
            slots -= self.slots.tombstones();
        }
        self.collect_sorted_tids(&slots)
    }

    /// Runs the parsed pattern against the bitmaps.
    ///
    /// The result may still contain tombstoned slots; callers subtract
    /// them (skipped entirely when no tombstones exist).
    pub(crate) fn execute(&self, pattern: &Pattern) -> RoaringBitmap {
        // No segments: `%...%` matches every record, the empty pattern
        // matches only empty strings.
        if pattern.segments().is_empty() {
            return if pattern.has_percent() {
                self.lengths.at_least_clone(0)
            } else {
                self.lengths.exact(0).cloned().unwrap_or_default()
            };
        }

        if let [segment] = pattern.segments() {
            return match (pattern.starts_any(), pattern.ends_any()) {
                (false, false) => self.match_exact(segment),
                (false, true) => self.match_prefix(segment),
                (true, false) => self.match_suffix(segment),
                (true, true) => self.match_contains(segment),
            };
        }

        self.match_multi(pattern)
    }

    /// `abc` — segment anchored at both ends.
    fn match_exact(&self, segment: &Segment) -> RoaringBitmap {
        let mut result = self.match_segment_at(segment, 0);
        match self.lengths.exact(segment.len()) {
            Some(lengths) => {
                result &= lengths;
                result
            }
            None => RoaringBitmap::new(),
        }
    }

    /// `abc%` — segment anchored at the start.
    fn match_prefix(&self, segment: &Segment) -> RoaringBitmap {
        let mut result = self.match_segment_at(segment, 0);
        match self.lengths.at_least(segment.len()) {
            Some(lengths) => {
                result &= lengths;
                result
            }
            None => RoaringBitmap::new(),
        }
    }

    /// `%abc` — segment anchored at the end.
    fn match_suffix(&self, segment: &Segment) -> RoaringBitmap {
        let mut result = self.match_segment_end(segment);
        match self.lengths.at_least(segment.len()) {
            Some(lengths) => {
                result &= lengths;
                result
            }
            None => RoaringBitmap::new(),
        }
    }

    /// `%abc%` — segment floating anywhere: union over every start
    /// position where it can still fit.
    fn match_contains(&self, segment: &Segment) -> RoaringBitmap {
        if let Some(gate) = self.presence_gate(std::slice::from_ref(segment)) {
            if gate.is_empty() {
                return gate;
            }
        }
        // An all-wildcard segment floats freely, so the earliest placement
        // already covers every record the later ones would.
        if segment.is_all_wildcards() {
            return self.lengths.at_least_clone(segment.len());
        }
        let Some(max_start) = self.max_len.checked_sub(segment.len()) else {
            return RoaringBitmap::new();
        };
        let mut result = RoaringBitmap::new();
        for start in 0..=max_start {
            result |= self.match_segment_at(segment, start);
        }
        result
    }

    /// Multi-segment patterns: recursive windowed matching.
    fn match_multi(&self, pattern: &Pattern) -> RoaringBitmap {
        let segments = pattern.segments();
        let mut candidates = self.lengths.at_least_clone(pattern.min_len());
        if let Some(gate) = self.presence_gate(segments) {
            candidates &= &gate;
        }
        let mut result = RoaringBitmap::new();
        if candidates.is_empty() {
            return result;
        }

        if pattern.starts_any() {
            self.match_windowed(segments, pattern.ends_any(), 0, 0, candidates, &mut result);
        } else {
            // No leading `%`: the first segment is pinned to position 0.
            let mut anchored = self.match_segment_at(&segments[0], 0);
            anchored &= &candidates;
            if !anchored.is_empty() {
                self.match_windowed(
                    segments,
                    pattern.ends_any(),
                    1,
                    segments[0].len(),
                    anchored,
                    &mut result,
                );
            }
        }
        result
    }

    /// Tries segment `index` at every admissible start position, narrowing
    /// `candidates` down each path and unioning the leaves into `result`.
    ///
    /// `min_start` is the first position the segment may occupy (one past
    /// the previous segment's window); the upper bound leaves room for the
    /// segments still to come. Empty intersections prune the branch.
    fn match_windowed(
        &self,
        segments: &[Segment],
        ends_any: bool,
        index: usize,
        min_start: usize,
        candidates: RoaringBitmap,
        result: &mut RoaringBitmap,
    ) {
        if index == segments.len() {
            *result |= candidates;
            return;
        }
        let segment = &segments[index];

        // A trailing segment with no `%` after it is end-anchored: the
        // reverse index answers it in one step instead of a position scan.
        // The record must be long enough that the suffix starts at or after
        // `min_start`, otherwise it would overlap the previous segment.
        if index == segments.len() - 1 && !ends_any {
            let Some(lengths) = self.lengths.at_least(min_start + segment.len()) else {
                return;
            };
            let mut tail = self.match_segment_end(segment);
            tail &= &candidates;
            tail &= lengths;
            *result |= tail;
            return;
        }

        let remaining: usize = segments[index + 1..].iter().map(Segment::len).sum();
        let Some(mut max_start) = self.max_len.checked_sub(segment.len() + remaining) else {
            return;
        };
        // A `%`-bounded all-wildcard segment floats freely: the earliest
        // placement keeps the largest candidate set and the loosest window
        // for the segments behind it, so later placements cannot add
        // matches. One probe suffices, which also keeps `_%_%_`-style
        // patterns linear instead of combinatorial.
        if segment.is_all_wildcards() {
            max_start = min_start;
        }
        for start in min_start..=max_start {
            let mut hits = self.match_segment_at(segment, start);
            hits &= &candidates;
            if !hits.is_empty() {
                self.match_windowed(
                    segments,
                    ends_any,
                    index + 1,
                    start + segment.len(),
                    hits,
                    result,
                );
            }
        }
    }

    /// Slots whose record carries `segment` starting at position `start`.
    ///
    /// Only concrete bytes cost an intersection; `_` positions are free.
    /// Trailing wildcards still require the record to reach the end of the
    /// segment window, which the length bitmaps answer directly.
    fn match_segment_at(&self, segment: &Segment, start: usize) -> RoaringBitmap {
        let end = start + segment.len();
        if end > MAX_RECORD_LEN {
            return RoaringBitmap::new();
        }
        if segment.is_all_wildcards() {
            return self.lengths.at_least_clone(end);
        }

        let mut acc: Option<RoaringBitmap> = None;
        for (offset, byte) in segment.concrete_bytes() {
            let Some(slots) = self.forward.get(byte, (start + offset) as i32) else {
                return RoaringBitmap::new();
            };
            acc = Some(match acc {
                None => slots.clone(),
                Some(mut current) => {
                    current &= slots;
                    if current.is_empty() {
                        return current;
                    }
                    current
                }
            });
        }
        let mut result = acc.unwrap_or_default();

        if segment.ends_with_wildcard() {
            match self.lengths.at_least(end) {
                Some(lengths) => result &= lengths,
                None => return RoaringBitmap::new(),
            }
        }
        result
    }

    /// Slots whose record ends with `segment`, via the reverse index.
    fn match_segment_end(&self, segment: &Segment) -> RoaringBitmap {
        let len = segment.len();
        if len > MAX_RECORD_LEN {
            return RoaringBitmap::new();
        }
        if segment.is_all_wildcards() {
            return self.lengths.at_least_clone(len);
        }

        let mut acc: Option<RoaringBitmap> = None;
        for (offset, byte) in segment.concrete_bytes() {
            let neg_offset = offset as i32 - len as i32;
            let Some(slots) = self.reverse.get(byte, neg_offset) else {
                return RoaringBitmap::new();
            };
            acc = Some(match acc {
                None => slots.clone(),
                Some(mut current) => {
                    current &= slots;
                    if current.is_empty() {
                        return current;
                    }
                    current
                }
            });
        }
        let mut result = acc.unwrap_or_default();

        // Leading wildcards reach further left than any concrete byte;
        // make sure the record is long enough for the whole segment.
        if segment.starts_with_wildcard() {
            match self.lengths.at_least(len) {
                Some(lengths) => result &= lengths,
                None => return RoaringBitmap::new(),
            }
        }
        result
    }

    /// Intersection of the presence bitmaps of every distinct concrete
    /// byte across `segments` — a necessary condition on any match.
    ///
    /// `None` when the segments contain no concrete byte (no constraint).
    /// An empty bitmap means no record can match; callers bail out early.
    fn presence_gate(&self, segments: &[Segment]) -> Option<RoaringBitmap> {
        let mut seen = [false; super::CHAR_RANGE];
        let mut gate: Option<RoaringBitmap> = None;
        for segment in segments {
            for (_, byte) in segment.concrete_bytes() {
                if std::mem::replace(&mut seen[usize::from(byte)], true) {
                    continue;
                }
                let presence = self.chars.get(byte);
                match gate.as_mut() {
                    None => gate = Some(presence.clone()),
                    Some(current) => *current &= presence,
                }
                if gate.as_ref().is_some_and(RoaringBitmap::is_empty) {
                    return gate;
                }
            }
        }
        gate
    }

    /// Maps result slots to TIDs in ascending TID order.
    ///
    /// Slot numbers at or beyond the slot-table bound are skipped: the
    /// table is the authority on which slots exist, so drift between a
    /// bitmap and the table can never produce a false positive.
    pub(crate) fn collect_sorted_tids(&self, slots: &RoaringBitmap) -> Vec<Tid> {
        let bound = self.slots.slot_count();
        let mut tids: Vec<Tid> = slots
            .iter()
            .filter(|&slot| slot < bound)
            .map(|slot| self.slots.tid(slot))
            .collect();
        tids.sort_unstable();
        tids
    }
}
