//! Closedness checks for sequential patterns
//!
//! A pattern is closed when no forward or backward extension keeps its
//! support. Admission runs both scans; search-time pruning runs only the
//! backward scan on the candidate, which is cheaper and never discards a
//! branch that could still produce a new closed pattern.

use std::collections::HashSet;

use super::types::{Item, Match};

/// Full closedness test applied before a pattern enters the result set
pub fn is_closed(db: &[Vec<Item>], pattern: &[Item], matches: &[Match]) -> bool {
    let mut anchors: Vec<Option<Item>> = Vec::with_capacity(pattern.len() + 2);
    anchors.push(None);
    anchors.extend(pattern.iter().copied().map(Some));
    anchors.push(None);

    let cursors = matches.iter().map(|m| (m.seq, db[m.seq].len())).collect();

    !reverse_scan(db, &anchors, cursors) && !forward_scan(db, matches)
}

/// True when the candidate has a backward extension with identical support,
/// so its branch is reachable through another prefix.
pub fn can_closed_prune(db: &[Vec<Item>], pattern: &[Item], matches: &[Match]) -> bool {
    let mut anchors: Vec<Option<Item>> = Vec::with_capacity(pattern.len() + 1);
    anchors.push(None);
    anchors.extend(pattern.iter().copied().map(Some));

    let cursors = matches
        .iter()
        .map(|m| (m.seq, m.pos.unwrap_or(0)))
        .collect();

    reverse_scan(db, &anchors, cursors)
}

/// Whether some item follows every match
fn forward_scan(db: &[Vec<Item>], matches: &[Match]) -> bool {
    let mut common: Option<HashSet<Item>> = None;

    for m in matches {
        let sequence = &db[m.seq];
        let start = m.suffix_start().min(sequence.len());
        let local: HashSet<Item> = sequence[start..].iter().copied().collect();
        intersect(&mut common, local);
    }

    common.map_or(false, |items| !items.is_empty())
}

/// Walk the anchors from the second-to-last back to the first. For each
/// anchor, every cursor rewinds to the anchor's nearest earlier occurrence;
/// the items skipped on the way are intersected across all cursors. A
/// non-empty intersection means an item could be inserted there for every
/// match.
fn reverse_scan(db: &[Vec<Item>], anchors: &[Option<Item>], mut cursors: Vec<(usize, usize)>) -> bool {
    let Some((_, rest)) = anchors.split_last() else {
        return false;
    };

    rest.iter().rev().any(|&anchor| {
        let mut common: Option<HashSet<Item>> = None;

        for cursor in cursors.iter_mut() {
            let (seq, end) = *cursor;
            let sequence = &db[seq];
            let mut local = HashSet::new();

            for pos in (0..end.min(sequence.len())).rev() {
                let item = sequence[pos];
                if Some(item) == anchor {
                    cursor.1 = pos;
                    break;
                }
                local.insert(item);
            }

            // Every cursor must rewind, even once the intersection is empty
            intersect(&mut common, local);
        }

        common.map_or(false, |items| !items.is_empty())
    })
}

fn intersect(common: &mut Option<HashSet<Item>>, local: HashSet<Item>) {
    match common {
        None => *common = Some(local),
        Some(items) => items.retain(|item| local.contains(item)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Vec<Vec<Item>> {
        vec![
            vec![0, 1, 2, 3, 4],
            vec![1, 1, 1, 3, 4],
            vec![2, 1, 2, 2, 0],
            vec![1, 1, 1, 2, 2],
        ]
    }

    fn at(seq: usize, pos: usize) -> Match {
        Match::at(seq, pos)
    }

    #[test]
    fn test_single_item_with_full_support_is_closed() {
        let db = db();
        let matches = [at(0, 1), at(1, 0), at(2, 1), at(3, 0)];
        assert!(is_closed(&db, &[1], &matches));
    }

    #[test]
    fn test_forward_extension_breaks_closedness() {
        let db = db();
        // [1, 3] always continues with 4
        let matches = [at(0, 3), at(1, 3)];
        assert!(!is_closed(&db, &[1, 3], &matches));
        assert!(is_closed(&db, &[1, 3, 4], &[at(0, 4), at(1, 4)]));
    }

    #[test]
    fn test_backward_extension_breaks_closedness() {
        let db = vec![vec![5, 6], vec![5, 6]];
        // [6] is always preceded by 5
        assert!(!is_closed(&db, &[6], &[at(0, 1), at(1, 1)]));
        assert!(is_closed(&db, &[5, 6], &[at(0, 1), at(1, 1)]));
    }

    #[test]
    fn test_prune_detects_common_prefix_item() {
        let db = vec![vec![5, 6], vec![5, 6]];
        assert!(can_closed_prune(&db, &[6], &[at(0, 1), at(1, 1)]));
        assert!(!can_closed_prune(&db, &[5], &[at(0, 0), at(1, 0)]));
    }

    #[test]
    fn test_prune_is_weaker_than_closedness() {
        let db = db();
        // Not prunable, yet not closed because 4 always follows
        let matches = [at(0, 3), at(1, 3)];
        assert!(!can_closed_prune(&db, &[1, 3], &matches));
        assert!(!is_closed(&db, &[1, 3], &matches));
    }

    #[test]
    fn test_empty_matches() {
        let db = db();
        assert!(is_closed(&db, &[7], &[]));
        assert!(!can_closed_prune(&db, &[7], &[]));
    }
}
