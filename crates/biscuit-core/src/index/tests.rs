//! End-to-end tests for the index engine: the concrete host scenarios,
//! the engine/scalar-matcher differential suite, and the slot-lifecycle
//! properties (ordering, compaction idempotence, reuse correctness,
//! truncation).

use std::collections::BTreeSet;

use roaring::RoaringBitmap;

use super::*;
use crate::config::IndexConfig;
use crate::pattern::like_match;
use crate::tid::Tid;

fn tid(id: u32) -> Tid {
    Tid::new(id, 1)
}

fn build_index(records: &[(u32, &str)]) -> BiscuitIndex {
    let mut index = BiscuitIndex::new();
    index
        .build(
            records
                .iter()
                .map(|&(id, s)| (tid(id), Some(s.as_bytes().to_vec()))),
        )
        .unwrap();
    index
}

fn ins(index: &mut BiscuitIndex, id: u32, s: &str) {
    index.insert(Some(s.as_bytes()), tid(id)).unwrap();
}

fn ids(index: &BiscuitIndex, pattern: &str) -> BTreeSet<u32> {
    index
        .search(pattern.as_bytes())
        .iter()
        .map(|t| t.block)
        .collect()
}

fn set(ids: &[u32]) -> BTreeSet<u32> {
    ids.iter().copied().collect()
}

// ========== Host Scenarios ==========

#[test]
fn test_scenario_admin_anchoring() {
    let index = build_index(&[
        (1, "admin"),
        (2, "administrator"),
        (3, "user_admin"),
        (4, "john"),
    ]);
    assert_eq!(ids(&index, "admin%"), set(&[1, 2]));
    assert_eq!(ids(&index, "%admin"), set(&[1, 3]));
    assert_eq!(ids(&index, "%admin%"), set(&[1, 2, 3]));
    assert_eq!(ids(&index, "admin"), set(&[1]));
}

#[test]
fn test_scenario_single_wildcard_positions() {
    let index = build_index(&[(1, "user_123"), (2, "user_456"), (3, "user_789")]);
    assert_eq!(ids(&index, "user_1%3"), set(&[1]));
    // `_` matches the literal underscore as well as any other byte.
    assert_eq!(ids(&index, "user____"), set(&[1, 2, 3]));
}

#[test]
fn test_scenario_empty_string() {
    let index = build_index(&[(1, "")]);
    assert_eq!(ids(&index, ""), set(&[1]));
    assert_eq!(ids(&index, "%"), set(&[1]));
    assert_eq!(ids(&index, "_"), set(&[]));
}

#[test]
fn test_scenario_delete_reuse_and_compaction() {
    for threshold in [1000, 2] {
        let config = IndexConfig {
            tombstone_cleanup_threshold: threshold,
            ..IndexConfig::default()
        };
        let mut index = BiscuitIndex::with_config(config).unwrap();
        for i in 1..=10 {
            ins(&mut index, i, &format!("record{i:02}"));
        }
        let stats = index.bulk_delete(|t| t.block == 3 || t.block == 7);
        assert_eq!(stats.tuples_removed, 2);
        ins(&mut index, 11, "record11");

        let expected = set(&[1, 2, 4, 5, 6, 8, 9, 10, 11]);
        assert_eq!(ids(&index, "%"), expected);

        // Explicit compaction must not change the visible set, nor must
        // running it twice (idempotence).
        index.compact();
        assert_eq!(ids(&index, "%"), expected);
        index.compact();
        assert_eq!(ids(&index, "%"), expected);
    }
}

#[test]
fn test_scenario_ordered_occurrences() {
    let index = build_index(&[
        (1, "abc"),
        (2, "acb"),
        (3, "xaybzc"),
        (4, "cba"),
        (5, "aabbcc"),
        (6, "ab"),
        (7, "bac"),
    ]);
    assert_eq!(ids(&index, "%a%b%c%"), set(&[1, 3, 5]));
}

#[test]
fn test_scenario_case_sensitive() {
    let index = build_index(&[(1, "Admin")]);
    assert_eq!(ids(&index, "admin"), set(&[]));
    assert_eq!(ids(&index, "Admin"), set(&[1]));
}

// ========== Dispatch Edge Cases ==========

#[test]
fn test_empty_pattern_on_empty_index() {
    let index = BiscuitIndex::new();
    assert!(index.search(b"").is_empty());
    assert!(index.search(b"%").is_empty());
    assert!(index.search(b"abc").is_empty());
}

#[test]
fn test_exact_match_requires_exact_length() {
    // A pattern shorter than every record must not degrade into a prefix
    // match when its length bucket does not exist.
    let index = build_index(&[(1, "abc")]);
    assert_eq!(ids(&index, "ab"), set(&[]));
    assert_eq!(ids(&index, "abc"), set(&[1]));
    assert_eq!(ids(&index, "abcd"), set(&[]));
}

#[test]
fn test_multi_segment_first_segment_is_anchored() {
    let index = build_index(&[(1, "abzcd"), (2, "xabzcd"), (3, "abcd")]);
    assert_eq!(ids(&index, "ab%cd"), set(&[1, 3]));
    assert_eq!(ids(&index, "%ab%cd"), set(&[1, 2, 3]));
}

#[test]
fn test_trailing_wildcard_needs_full_window() {
    let index = build_index(&[(1, "ab"), (2, "xa")]);
    // `a` followed by at least one byte: "xa" ends at the `a`.
    assert_eq!(ids(&index, "%a_%"), set(&[1]));
}

#[test]
fn test_final_segment_cannot_overlap_previous_one() {
    let index = build_index(&[(1, "xab"), (2, "abb"), (3, "abab")]);
    // The trailing `b` must sit strictly after the `ab` occurrence; in
    // "xab" the only `b` is part of the `ab` itself.
    assert_eq!(ids(&index, "%ab%b"), set(&[2, 3]));
    assert_eq!(ids(&index, "%ab%ab"), set(&[3]));
}

#[test]
fn test_leading_wildcard_suffix_needs_full_window() {
    let index = build_index(&[(1, "ab"), (2, "aab")]);
    // Three-byte suffix `_ab` cannot fit in a two-byte record.
    assert_eq!(ids(&index, "%_ab"), set(&[2]));
}

#[test]
fn test_all_wildcard_patterns_constrain_length_only() {
    let index = build_index(&[(1, ""), (2, "a"), (3, "ab"), (4, "abc")]);
    assert_eq!(ids(&index, "___"), set(&[4]));
    assert_eq!(ids(&index, "__%"), set(&[3, 4]));
    assert_eq!(ids(&index, "%__"), set(&[3, 4]));
    assert_eq!(ids(&index, "%__%"), set(&[3, 4]));
    assert_eq!(ids(&index, "%%"), set(&[1, 2, 3, 4]));
}

#[test]
fn test_unknown_character_matches_nothing() {
    let index = build_index(&[(1, "abc")]);
    assert_eq!(ids(&index, "%z%"), set(&[]));
    assert_eq!(ids(&index, "z%"), set(&[]));
    assert_eq!(ids(&index, "%a%z%"), set(&[]));
}

#[test]
fn test_patterns_are_opaque_bytes() {
    let index = build_index(&[(1, "caf\u{e9}"), (2, "cafe")]);
    assert_eq!(ids(&index, "caf\u{e9}"), set(&[1]));
    assert_eq!(ids(&index, "caf_"), set(&[2]));
    // The two-byte UTF-8 encoding of é needs two `_` wildcards.
    assert_eq!(ids(&index, "caf__"), set(&[1]));
}

// ========== Incremental Maintenance ==========

#[test]
fn test_null_insert_is_noop() {
    let mut index = BiscuitIndex::new();
    assert!(index.insert(None, tid(1)).unwrap());
    assert_eq!(index.stats().total_slots, 0);
    assert_eq!(index.stats().inserts, 0);
}

#[test]
fn test_bulk_delete_visits_every_live_slot() {
    let mut index = build_index(&[(1, "a"), (2, "b"), (3, "c")]);
    index.bulk_delete(|t| t.block == 2);

    let mut seen = Vec::new();
    index.bulk_delete(|t| {
        seen.push(t.block);
        false
    });
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 3]);
}

#[test]
fn test_slot_reuse_sees_only_new_record() {
    let mut index = BiscuitIndex::new();
    ins(&mut index, 1, "hello");
    index.bulk_delete(|_| true);
    ins(&mut index, 2, "world");

    assert_eq!(index.stats().total_slots, 1);
    assert_eq!(ids(&index, "hello"), set(&[]));
    assert_eq!(ids(&index, "%ell%"), set(&[]));
    assert_eq!(ids(&index, "world"), set(&[2]));
    assert_eq!(ids(&index, "%"), set(&[2]));
}

#[test]
fn test_slot_reuse_after_compaction() {
    let mut index = BiscuitIndex::new();
    ins(&mut index, 1, "hello");
    index.bulk_delete(|_| true);
    index.compact();
    ins(&mut index, 2, "mellow");

    assert_eq!(index.stats().total_slots, 1);
    assert_eq!(ids(&index, "hello"), set(&[]));
    assert_eq!(ids(&index, "%ell%"), set(&[2]));
}

#[test]
fn test_insert_then_delete_leaves_no_trace() {
    let mut reference = build_index(&[(1, "alpha"), (2, "beta")]);
    let mut index = build_index(&[(1, "alpha"), (2, "beta")]);
    ins(&mut index, 3, "gamma");
    index.bulk_delete(|t| t.block == 3);

    for pattern in ["%", "gamma", "%a%", "%mm%", "_amma", ""] {
        assert_eq!(ids(&index, pattern), ids(&reference, pattern), "{pattern}");
    }

    // The tombstone disappears with compaction, still no trace.
    index.compact();
    reference.compact();
    assert_eq!(ids(&index, "%"), ids(&reference, "%"));
}

#[test]
fn test_live_count_tracks_inserts_minus_deletes() {
    let mut index = BiscuitIndex::new();
    for i in 1..=10 {
        ins(&mut index, i, &format!("row{i}"));
    }
    index.bulk_delete(|t| t.block <= 4);
    assert_eq!(index.stats().live_records, 6);

    // Reuse does not change the arithmetic.
    for i in 11..=13 {
        ins(&mut index, i, &format!("row{i}"));
    }
    assert_eq!(index.stats().live_records, 9);
    assert_eq!(index.stats().inserts, 13);
    assert_eq!(index.stats().deletes, 4);
}

#[test]
fn test_max_len_grows_with_inserts() {
    let mut index = build_index(&[(1, "ab")]);
    assert_eq!(index.max_len(), 2);
    ins(&mut index, 2, "abcdef");
    assert_eq!(index.max_len(), 6);
    assert_eq!(ids(&index, "%f"), set(&[2]));
    assert_eq!(ids(&index, "______"), set(&[2]));
}

#[test]
fn test_rebuild_resets_previous_contents() {
    let mut index = build_index(&[(1, "old")]);
    let count = index
        .build(vec![(tid(2), Some(b"new".to_vec())), (tid(3), None)])
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(ids(&index, "%"), set(&[2]));
    assert_eq!(ids(&index, "old"), set(&[]));
}

// ========== Truncation ==========

#[test]
fn test_long_records_truncate_to_256_bytes() {
    let long = "a".repeat(300);
    let exact = "a".repeat(256);
    let index = build_index(&[(1, &long), (2, &exact)]);

    assert_eq!(index.max_len(), 256);
    // Both records are byte-identical after truncation.
    assert_eq!(ids(&index, &exact), set(&[1, 2]));
    assert_eq!(ids(&index, &"a".repeat(257)), set(&[]));
    assert_eq!(ids(&index, &format!("{}%", "a".repeat(10))), set(&[1, 2]));
    assert_eq!(ids(&index, &format!("{exact}%")), set(&[1, 2]));
}

// ========== Result Ordering ==========

#[test]
fn test_results_sorted_by_block_then_offset() {
    let mut index = BiscuitIndex::new();
    for (block, offset) in [(5u32, 2u16), (1, 7), (5, 1), (2, 3), (1, 1)] {
        index
            .insert(Some(b"zzz".as_slice()), Tid::new(block, offset))
            .unwrap();
    }
    let expected = vec![
        Tid::new(1, 1),
        Tid::new(1, 7),
        Tid::new(2, 3),
        Tid::new(5, 1),
        Tid::new(5, 2),
    ];
    assert_eq!(index.search(b"zzz"), expected);
    assert_eq!(index.search(b"%"), expected);
}

// ========== Defensive Bounds ==========

#[test]
fn test_out_of_range_slots_are_skipped() {
    let index = build_index(&[(1, "abc")]);
    let mut slots = RoaringBitmap::new();
    slots.insert(0);
    slots.insert(999);
    let tids = index.collect_sorted_tids(&slots);
    assert_eq!(tids, vec![tid(1)]);
}

// ========== Construction Errors ==========

#[test]
fn test_multi_column_construction_rejected() {
    let err = BiscuitIndex::for_columns(2, IndexConfig::default()).unwrap_err();
    assert_eq!(err.code(), "BISCUIT-001");
    assert!(BiscuitIndex::for_columns(1, IndexConfig::default()).is_ok());
}

#[test]
fn test_invalid_config_rejected() {
    let config = IndexConfig {
        tombstone_cleanup_threshold: 0,
        ..IndexConfig::default()
    };
    let err = BiscuitIndex::with_config(config).unwrap_err();
    assert_eq!(err.code(), "BISCUIT-003");
}

// ========== Stats Text ==========

#[test]
fn test_stats_text_summary() {
    let mut index = build_index(&[(1, "alpha"), (2, "beta")]);
    index.bulk_delete(|t| t.block == 1);
    let text = index.stats().to_string();
    assert!(text.contains("Live records:  1"));
    assert!(text.contains("Tombstones:    1"));
    assert!(text.contains("Max length:    5"));
}

// ========== Differential Suite (engine vs. scalar matcher) ==========

/// Deterministic xorshift generator; keeps the suite reproducible without
/// pulling a dependency in.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

fn random_record(rng: &mut XorShift) -> String {
    const ALPHABET: &[u8] = b"abc_";
    let len = rng.below(9);
    (0..len)
        .map(|_| ALPHABET[rng.below(ALPHABET.len())] as char)
        .collect()
}

fn random_pattern(rng: &mut XorShift) -> String {
    const ALPHABET: &[u8] = b"abcz%_";
    let len = rng.below(7);
    (0..len)
        .map(|_| ALPHABET[rng.below(ALPHABET.len())] as char)
        .collect()
}

fn oracle(records: &[(u32, String)], pattern: &str) -> BTreeSet<u32> {
    records
        .iter()
        .filter(|(_, s)| like_match(s.as_bytes(), pattern.as_bytes()))
        .map(|&(id, _)| id)
        .collect()
}

fn assert_agrees(index: &BiscuitIndex, records: &[(u32, String)], pattern: &str) {
    assert_eq!(
        ids(index, pattern),
        oracle(records, pattern),
        "pattern {pattern:?} over {} records",
        records.len()
    );
}

/// Fixed patterns covering every dispatch category.
const DISPATCH_PATTERNS: &[&str] = &[
    "",
    "%",
    "%%",
    "ab",
    "a_c",
    "___",
    "ab%",
    "a_%",
    "%bc",
    "%_c",
    "%ab%",
    "%_b_%",
    "a%c",
    "ab%c",
    "a%b%c",
    "%a%b%",
    "_%_",
    "a__b%c_",
];

#[test]
fn test_engine_agrees_with_scalar_matcher() {
    let mut rng = XorShift(0x5eed_1234_5678_9abc);
    let records: Vec<(u32, String)> = (0..300)
        .map(|i| (i + 1, random_record(&mut rng)))
        .collect();

    let mut index = BiscuitIndex::new();
    index
        .build(
            records
                .iter()
                .map(|(id, s)| (tid(*id), Some(s.as_bytes().to_vec()))),
        )
        .unwrap();

    for pattern in DISPATCH_PATTERNS {
        assert_agrees(&index, &records, pattern);
    }
    for _ in 0..500 {
        let pattern = random_pattern(&mut rng);
        assert_agrees(&index, &records, &pattern);
    }
}

#[test]
fn test_engine_agrees_after_deletes_and_reuse() {
    let mut rng = XorShift(0xfeed_face_cafe_beef);
    let mut records: Vec<(u32, String)> = (0..200)
        .map(|i| (i + 1, random_record(&mut rng)))
        .collect();

    let mut index = BiscuitIndex::new();
    index
        .build(
            records
                .iter()
                .map(|(id, s)| (tid(*id), Some(s.as_bytes().to_vec()))),
        )
        .unwrap();

    // Drop roughly a third of the records.
    let doomed: BTreeSet<u32> = records
        .iter()
        .filter(|_| rng.below(3) == 0)
        .map(|&(id, _)| id)
        .collect();
    index.bulk_delete(|t| doomed.contains(&t.block));
    records.retain(|(id, _)| !doomed.contains(id));

    for pattern in DISPATCH_PATTERNS {
        assert_agrees(&index, &records, pattern);
    }

    // Refill through the free list so tombstoned slots get reincarnated.
    for i in 0..50 {
        let id = 1000 + i;
        let s = random_record(&mut rng);
        ins(&mut index, id, &s);
        records.push((id, s));
    }

    for pattern in DISPATCH_PATTERNS {
        assert_agrees(&index, &records, pattern);
    }
    for _ in 0..300 {
        let pattern = random_pattern(&mut rng);
        assert_agrees(&index, &records, &pattern);
    }

    // And once more with everything compacted.
    index.compact();
    for pattern in DISPATCH_PATTERNS {
        assert_agrees(&index, &records, pattern);
    }
}
