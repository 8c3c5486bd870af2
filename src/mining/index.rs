//! Occurrence index for one-item pattern extensions

use super::types::{Item, Match, Occurrences};

/// Index every item found after the given matches.
///
/// Each sequence contributes at most one match per item: the first
/// occurrence after the matched position.
pub fn inverted_index(db: &[Vec<Item>], matches: &[Match]) -> Occurrences {
    let mut index = Occurrences::new();

    for m in matches {
        let sequence = &db[m.seq];
        let start = m.suffix_start().min(sequence.len());
        for (offset, &item) in sequence[start..].iter().enumerate() {
            let entries = index.entry(item).or_default();
            if entries.last().map_or(false, |last| last.seq == m.seq) {
                continue;
            }
            entries.push(Match::at(m.seq, start + offset));
        }
    }

    index
}

/// Order extension candidates by descending `key` of the extended pattern,
/// then by their match lists, then by item.
pub fn sort_occurrences<F>(occurrences: Occurrences, pattern: &[Item], key: F) -> Vec<(Item, Vec<Match>)>
where
    F: Fn(&[Item], &[Match]) -> f64,
{
    let mut extended = Vec::with_capacity(pattern.len() + 1);
    extended.extend_from_slice(pattern);
    extended.push(0);

    let mut scored: Vec<(f64, Item, Vec<Match>)> = occurrences
        .into_iter()
        .map(|(item, matches)| {
            if let Some(last) = extended.last_mut() {
                *last = item;
            }
            (key(&extended, &matches), item, matches)
        })
        .collect();

    // Stable sort over ascending items keeps item order as the last tie-break
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.2.cmp(&b.2)));

    scored
        .into_iter()
        .map(|(_, item, matches)| (item, matches))
        .collect()
}
