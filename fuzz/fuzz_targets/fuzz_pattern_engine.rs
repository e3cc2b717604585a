//! Fuzz target for the pattern engine.
//!
//! Differential test: every bitmap-engine answer must agree with the
//! scalar `like_match` reference over the same records. The input byte
//! stream is decoded into a small record set plus one pattern; records and
//! patterns are arbitrary bytes, so this also exercises non-ASCII values
//! and `%`/`_` embedded in record data.
//!
//! Record and pattern sizes are capped so adversarial wildcard layouts
//! keep each execution fast; the caps are generous enough to cover every
//! dispatch path of the engine.

#![no_main]

use libfuzzer_sys::fuzz_target;

use biscuit_core::{like_match, BiscuitIndex, Tid};

const MAX_RECORDS: usize = 8;
const MAX_RECORD_BYTES: usize = 64;
const MAX_PATTERN_BYTES: usize = 12;

fuzz_target!(|data: &[u8]| {
    let Some((&count, mut rest)) = data.split_first() else {
        return;
    };
    let count = usize::from(count) % (MAX_RECORDS + 1);

    // Length-prefixed records, then the remainder is the pattern.
    let mut records: Vec<Vec<u8>> = Vec::with_capacity(count);
    for _ in 0..count {
        let Some((&len, tail)) = rest.split_first() else {
            return;
        };
        let len = usize::from(len) % (MAX_RECORD_BYTES + 1);
        if tail.len() < len {
            return;
        }
        let (record, tail) = tail.split_at(len);
        records.push(record.to_vec());
        rest = tail;
    }
    let pattern = &rest[..rest.len().min(MAX_PATTERN_BYTES)];

    let mut index = BiscuitIndex::new();
    index
        .build(
            records
                .iter()
                .enumerate()
                .map(|(i, r)| (Tid::new(i as u32, 1), Some(r.clone()))),
        )
        .expect("build never exhausts capacity here");

    let engine: Vec<u32> = index.search(pattern).iter().map(|t| t.block).collect();
    let oracle: Vec<u32> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| like_match(r, pattern))
        .map(|(i, _)| i as u32)
        .collect();

    assert_eq!(engine, oracle, "pattern {pattern:?} over {records:?}");
});
