//! Stable top-down merge sort for reading series.
//!
//! The sort is not adaptive: already ordered input still goes through every
//! split and merge, so the cost is O(n log n) time with an O(n) buffer per
//! merge. Ties take the left-half element first, which keeps equal keys in
//! their original relative order.

use crate::types::Reading;

/// Sort readings ascending by quantity, in place.
pub fn merge_sort(series: &mut [Reading]) {
    merge_sort_by_key(series, |r| r.quantity);
}

/// Sort any cloneable items ascending by `key`, in place and stably.
///
/// When two keys do not compare (NaN), the merge takes the right-hand item.
pub fn merge_sort_by_key<T, K, F>(items: &mut [T], key: F)
where
    T: Clone,
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    if items.len() < 2 {
        return;
    }
    let end = items.len() - 1;
    sort_range(items, 0, end, &key);
}

fn sort_range<T, K, F>(items: &mut [T], start: usize, end: usize, key: &F)
where
    T: Clone,
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    if start >= end {
        return;
    }

    // floor((start + end) / 2) without the overflow
    let mid = start + (end - start) / 2;
    sort_range(items, start, mid, key);
    sort_range(items, mid + 1, end, key);
    merge(items, start, mid, end, key);
}

/// Merge the sorted ranges `[start, mid]` and `[mid + 1, end]`.
fn merge<T, K, F>(items: &mut [T], start: usize, mid: usize, end: usize, key: &F)
where
    T: Clone,
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut buffer = Vec::with_capacity(end - start + 1);
    let mut left = start;
    let mut right = mid + 1;

    while left <= mid && right <= end {
        if key(&items[left]) <= key(&items[right]) {
            buffer.push(items[left].clone());
            left += 1;
        } else {
            buffer.push(items[right].clone());
            right += 1;
        }
    }

    // One of these is empty.
    buffer.extend_from_slice(&items[left..=mid]);
    buffer.extend_from_slice(&items[right..=end]);

    for (offset, item) in buffer.into_iter().enumerate() {
        items[start + offset] = item;
    }
}
