//! Bounded result set for top-K mining
//!
//! Candidates are ordered by support, then pattern (lexicographic, a prefix
//! sorts first), then match list. The heap keeps the K largest and evicts
//! the smallest.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::types::{Matches, Pattern};

/// A candidate result with the matches it was admitted with
#[derive(Debug, Clone)]
pub struct Ranked {
    pub support: f64,
    pub pattern: Pattern,
    pub matches: Matches,
}

impl Ranked {
    pub fn new(support: f64, pattern: Pattern, matches: Matches) -> Self {
        Self {
            support,
            pattern,
            matches,
        }
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.support
            .total_cmp(&other.support)
            .then_with(|| self.pattern.cmp(&other.pattern))
            .then_with(|| self.matches.cmp(&other.matches))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// Output order: support descending, then pattern ascending
pub fn result_order(a: &Ranked, b: &Ranked) -> Ordering {
    b.support
        .total_cmp(&a.support)
        .then_with(|| a.pattern.cmp(&b.pattern))
        .then_with(|| a.matches.cmp(&b.matches))
}

/// Sort results for output
pub fn sort_results(mut results: Vec<Ranked>) -> Vec<Ranked> {
    results.sort_by(result_order);
    results
}

/// Min-heap holding at most `capacity` entries
#[derive(Debug, Clone)]
pub struct TopKHeap {
    capacity: usize,
    entries: BinaryHeap<Reverse<Ranked>>,
}

impl TopKHeap {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: BinaryHeap::with_capacity(capacity.saturating_add(1).min(4096)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// The entry evicted next
    pub fn worst(&self) -> Option<&Ranked> {
        self.entries.peek().map(|entry| &entry.0)
    }

    /// True when a candidate with `support` cannot enter a full heap
    pub fn cannot_beat(&self, support: f64) -> bool {
        self.is_full() && self.worst().map_or(true, |worst| support <= worst.support)
    }

    /// Insert `candidate`, returning whatever got evicted
    pub fn offer(&mut self, candidate: Ranked) -> Option<Ranked> {
        if self.capacity == 0 {
            return Some(candidate);
        }
        self.entries.push(Reverse(candidate));
        if self.entries.len() > self.capacity {
            self.entries.pop().map(|entry| entry.0)
        } else {
            None
        }
    }

    pub fn into_sorted(self) -> Vec<Ranked> {
        sort_results(self.entries.into_iter().map(|entry| entry.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::types::Match;

    fn ranked(support: f64, pattern: &[u32], matches: &[(usize, usize)]) -> Ranked {
        Ranked::new(
            support,
            pattern.to_vec(),
            matches.iter().map(|&(seq, pos)| Match::at(seq, pos)).collect(),
        )
    }

    #[test]
    fn test_ordering() {
        assert!(ranked(0.0, &[0], &[]) < ranked(0.0, &[1], &[]));
        assert!(ranked(0.0, &[0, 2], &[]) > ranked(0.0, &[0, 1], &[]));
        assert!(ranked(0.0, &[0], &[]) < ranked(0.0, &[0, 0], &[]));
        assert!(ranked(1.0, &[0, 3], &[(0, 1)]) > ranked(1.0, &[0, 2, 2], &[(0, 0)]));
        assert!(ranked(2.0, &[0], &[(0, 0), (2, 4)]) > ranked(1.0, &[1, 1, 1, 2, 2], &[(3, 4)]));
        assert!(ranked(3.0, &[1], &[(0, 0)]) < ranked(3.0, &[1], &[(0, 1)]));
        assert_eq!(ranked(3.0, &[1], &[(0, 1)]), ranked(3.0, &[1], &[(0, 1)]));
    }

    #[test]
    fn test_sorts_results() {
        let results = vec![
            ranked(1.0, &[0, 1, 2, 3, 4], &[(0, 4)]),
            ranked(1.0, &[1, 1, 1, 2, 2], &[(3, 4)]),
            ranked(1.0, &[1, 1, 1, 3, 4], &[(1, 4)]),
            ranked(2.0, &[0], &[(0, 0), (2, 4)]),
            ranked(1.0, &[2, 1, 2, 2, 0], &[(2, 4)]),
            ranked(3.0, &[1, 2], &[(0, 2), (2, 2), (3, 3)]),
            ranked(2.0, &[1, 1, 1], &[(1, 2), (3, 2)]),
            ranked(4.0, &[1], &[(0, 1), (1, 0), (2, 1), (3, 0)]),
            ranked(2.0, &[1, 2, 2], &[(2, 3), (3, 4)]),
            ranked(2.0, &[1, 3, 4], &[(0, 4), (1, 4)]),
        ];

        let sorted: Vec<(f64, Vec<u32>)> = sort_results(results)
            .into_iter()
            .map(|r| (r.support, r.pattern))
            .collect();

        assert_eq!(
            sorted,
            vec![
                (4.0, vec![1]),
                (3.0, vec![1, 2]),
                (2.0, vec![0]),
                (2.0, vec![1, 1, 1]),
                (2.0, vec![1, 2, 2]),
                (2.0, vec![1, 3, 4]),
                (1.0, vec![0, 1, 2, 3, 4]),
                (1.0, vec![1, 1, 1, 2, 2]),
                (1.0, vec![1, 1, 1, 3, 4]),
                (1.0, vec![2, 1, 2, 2, 0]),
            ]
        );
    }

    #[test]
    fn test_bounded_eviction() {
        let mut heap = TopKHeap::new(2);
        assert!(!heap.cannot_beat(0.0));
        assert!(heap.offer(ranked(1.0, &[5], &[])).is_none());
        assert!(heap.offer(ranked(3.0, &[6], &[])).is_none());
        assert!(heap.is_full());
        assert_eq!(heap.worst().map(|w| w.support), Some(1.0));

        // Ties with the worst entry are not competitive
        assert!(heap.cannot_beat(1.0));
        assert!(!heap.cannot_beat(2.0));

        let evicted = heap.offer(ranked(2.0, &[7], &[])).unwrap();
        assert_eq!(evicted.pattern, vec![5]);
        assert_eq!(heap.len(), 2);

        let sorted: Vec<Vec<u32>> = heap.into_sorted().into_iter().map(|r| r.pattern).collect();
        assert_eq!(sorted, vec![vec![6], vec![7]]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut heap = TopKHeap::new(0);
        assert!(heap.is_full());
        assert!(heap.cannot_beat(f64::MAX));
        assert!(heap.offer(ranked(1.0, &[1], &[])).is_some());
        assert!(heap.is_empty());
    }
}
