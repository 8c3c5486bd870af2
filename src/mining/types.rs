//! Sequence database and pattern types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque item label assigned by the normalizer
pub type Item = u32;

/// A pattern grows by appending one item at a time
pub type Pattern = Vec<Item>;

/// Ordered list of item sequences
pub type Database = Vec<Vec<Item>>;

/// Where a pattern's last item was matched in one sequence.
///
/// `pos` is `None` for the empty pattern, which matches every sequence
/// before its first item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Match {
    pub seq: usize,
    pub pos: Option<usize>,
}

impl Match {
    pub fn root(seq: usize) -> Self {
        Self { seq, pos: None }
    }

    pub fn at(seq: usize, pos: usize) -> Self {
        Self { seq, pos: Some(pos) }
    }

    /// First position after the matched item
    pub fn suffix_start(&self) -> usize {
        self.pos.map_or(0, |pos| pos + 1)
    }
}

/// At most one match per sequence
pub type Matches = Vec<Match>;

/// Extension item -> matches of the extended pattern
pub type Occurrences = BTreeMap<Item, Matches>;

/// A mined pattern with its support
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinedPattern {
    pub support: f64,
    pub pattern: Pattern,
}

impl MinedPattern {
    pub fn new(support: f64, pattern: Pattern) -> Self {
        Self { support, pattern }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_order() {
        // Root matches sort before concrete positions in the same sequence
        assert!(Match::root(0) < Match::at(0, 0));
        assert!(Match::at(0, 9) < Match::at(1, 0));
        assert_eq!(Match::root(3).suffix_start(), 0);
        assert_eq!(Match::at(3, 4).suffix_start(), 5);
    }
}
