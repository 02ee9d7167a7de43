//! Deterministic presentation order
//!
//! Set algebra in this crate runs over hash sets, whose iteration order is
//! arbitrary. Anything shown to a user or compared in a test goes through
//! [`into_sorted`] first.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Collect `items` into ascending order by draining a min-heap.
pub fn into_sorted<T: Ord>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut heap: BinaryHeap<Reverse<T>> = items.into_iter().map(Reverse).collect();
    let mut sorted = Vec::with_capacity(heap.len());
    while let Some(Reverse(item)) = heap.pop() {
        sorted.push(item);
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_ascending() {
        assert_eq!(into_sorted(vec![3, 1, 2]), vec![1, 2, 3]);
    }

    #[test]
    fn keeps_duplicates() {
        assert_eq!(into_sorted(["b", "a", "b"]), vec!["a", "b", "b"]);
    }

    #[test]
    fn empty_input() {
        assert!(into_sorted(Vec::<u8>::new()).is_empty());
    }
}
