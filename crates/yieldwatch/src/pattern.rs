//! Contiguous pattern search over reading series.

use crate::types::Reading;

/// Offset of the first contiguous occurrence of `pattern` in `series`.
///
/// Naive O(n·m) scan. An empty pattern matches at offset 0; a pattern longer
/// than the series never matches.
pub fn find_pattern(series: &[Reading], pattern: &[Reading]) -> Option<usize> {
    if pattern.is_empty() {
        return Some(0);
    }
    if pattern.len() > series.len() {
        return None;
    }

    'offsets: for start in 0..=series.len() - pattern.len() {
        for (j, expected) in pattern.iter().enumerate() {
            if series[start + j].quantity != expected.quantity {
                continue 'offsets;
            }
        }
        return Some(start);
    }

    None
}

/// Whether `pattern` occurs as a contiguous block of `series`.
pub fn contains_pattern(series: &[Reading], pattern: &[Reading]) -> bool {
    find_pattern(series, pattern).is_some()
}
