//! Scalar wildcard matching over byte slices.

use super::{WILDCARD_ANY, WILDCARD_ONE};

/// Matches `text` against a wildcard `pattern` byte-by-byte.
///
/// `%` matches any run of bytes (including the empty run), `_` matches
/// exactly one byte. Bytes are compared as opaque 8-bit values; there is no
/// case folding and no escape processing.
///
/// This is the reference semantics of the index: for any record set and
/// pattern, the bitmap engine returns exactly the records for which
/// `like_match(record, pattern)` holds (after record truncation on ingest).
/// Hosts can also use it to recheck candidates fetched from elsewhere.
///
/// Two-pointer scan with backtracking to the most recent `%`: worst case
/// O(text × pattern), no allocation.
#[must_use]
pub fn like_match(text: &[u8], pattern: &[u8]) -> bool {
    let mut t = 0;
    let mut p = 0;
    // Most recent `%` position and the text position it is pinned to.
    let mut anchor: Option<usize> = None;
    let mut anchor_text = 0;

    while t < text.len() {
        match pattern.get(p) {
            Some(&WILDCARD_ANY) => {
                anchor = Some(p);
                anchor_text = t;
                p += 1;
            }
            Some(&b) if b == WILDCARD_ONE || b == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match anchor {
                // Let the last `%` swallow one more byte and retry.
                Some(a) => {
                    anchor_text += 1;
                    t = anchor_text;
                    p = a + 1;
                }
                None => return false,
            },
        }
    }

    // Only trailing `%` may remain unconsumed.
    while pattern.get(p) == Some(&WILDCARD_ANY) {
        p += 1;
    }
    p == pattern.len()
}
