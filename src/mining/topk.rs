//! Top-K (closed) sequential pattern mining
//!
//! Depth-first prefix growth over a sequence database with branch-and-bound
//! pruning. Each search node is a pattern plus its matches; children are
//! one-item extensions taken from the occurrence index, visited most
//! promising first. Once the result heap is full, a child whose bound
//! cannot beat the worst admitted support ends the scan at that node.
//!
//! The search keeps its own frame stack, so pattern length is limited only
//! by `max_length`, not by the call stack.

use super::closed::{can_closed_prune, is_closed};
use super::heap::{Ranked, TopKHeap};
use super::index::{inverted_index, sort_occurrences};
use super::types::{Item, Match, Matches, MinedPattern, Pattern};
use crate::error::{MinerError, MinerResult};

/// Support metric or admissible upper bound of a pattern
pub type ScoreFn<'a> = dyn Fn(&[Item], &[Match]) -> f64 + 'a;

/// Extra acceptance predicate for result candidates
pub type FilterFn<'a> = dyn Fn(&[Item], &[Match]) -> bool + 'a;

/// Number of sequences containing the pattern
pub fn sequence_support(_pattern: &[Item], matches: &[Match]) -> f64 {
    matches.len() as f64
}

pub struct TopKOptions<'a> {
    /// Only admit closed patterns and prune branches that cannot yield one
    pub closed: bool,
    pub min_length: usize,
    pub max_length: usize,
    /// Defaults to [`sequence_support`]
    pub key: Option<Box<ScoreFn<'a>>>,
    /// Must bound `key` of every extension from above; defaults to `key`
    pub bound: Option<Box<ScoreFn<'a>>>,
    pub filter: Option<Box<FilterFn<'a>>>,
}

impl<'a> Default for TopKOptions<'a> {
    fn default() -> Self {
        Self {
            closed: true,
            min_length: 1,
            max_length: 1000,
            key: None,
            bound: None,
            filter: None,
        }
    }
}

impl<'a> TopKOptions<'a> {
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn with_lengths(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    pub fn with_key<F>(mut self, key: F) -> Self
    where
        F: Fn(&[Item], &[Match]) -> f64 + 'a,
    {
        self.key = Some(Box::new(key));
        self
    }

    pub fn with_bound<F>(mut self, bound: F) -> Self
    where
        F: Fn(&[Item], &[Match]) -> f64 + 'a,
    {
        self.bound = Some(Box::new(bound));
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&[Item], &[Match]) -> bool + 'a,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    fn validate(&self) -> MinerResult<()> {
        if self.min_length > self.max_length {
            return Err(MinerError::InvalidArgument(format!(
                "minimum pattern length {} exceeds maximum {}",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TopKOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopKOptions")
            .field("closed", &self.closed)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("key", &self.key.is_some())
            .field("bound", &self.bound.is_some())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// One search node with its remaining extension candidates
struct Frame {
    pattern: Pattern,
    candidates: Vec<(Item, Matches)>,
    next: usize,
}

impl Frame {
    fn next_candidate(&mut self) -> Option<(Item, Matches)> {
        let (item, matches) = self.candidates.get_mut(self.next)?;
        self.next += 1;
        Some((*item, std::mem::take(matches)))
    }
}

struct Search<'d, 'o, 'a> {
    db: &'d [Vec<Item>],
    options: &'o TopKOptions<'a>,
    results: TopKHeap,
    nodes: usize,
}

impl Search<'_, '_, '_> {
    fn key(&self, pattern: &[Item], matches: &[Match]) -> f64 {
        match &self.options.key {
            Some(key) => key(pattern, matches),
            None => sequence_support(pattern, matches),
        }
    }

    fn bound(&self, pattern: &[Item], matches: &[Match]) -> f64 {
        match &self.options.bound {
            Some(bound) => bound(pattern, matches),
            None => self.key(pattern, matches),
        }
    }

    /// Offer a pattern to the result set
    fn verify(&mut self, pattern: &[Item], matches: &[Match]) {
        let support = self.key(pattern, matches);
        if self.results.cannot_beat(support) {
            return;
        }

        let accepted = self
            .options
            .filter
            .as_ref()
            .map_or(true, |filter| filter(pattern, matches));
        if !accepted {
            return;
        }
        if self.options.closed && !is_closed(self.db, pattern, matches) {
            return;
        }

        self.results
            .offer(Ranked::new(support, pattern.to_vec(), matches.to_vec()));
    }

    /// Visit a node: admit it if long enough, then collect its children
    fn enter(&mut self, pattern: Pattern, matches: Matches) -> Option<Frame> {
        self.nodes += 1;

        if pattern.len() >= self.options.min_length {
            self.verify(&pattern, &matches);
            if pattern.len() == self.options.max_length {
                return None;
            }
        }

        let occurrences = inverted_index(self.db, &matches);
        let candidates = sort_occurrences(occurrences, &pattern, |p, m| self.key(p, m));

        Some(Frame {
            pattern,
            candidates,
            next: 0,
        })
    }

    fn run(&mut self) {
        let roots: Matches = (0..self.db.len()).map(Match::root).collect();
        let mut stack: Vec<Frame> = self.enter(Vec::new(), roots).into_iter().collect();

        while let Some(frame) = stack.last_mut() {
            let Some((item, matches)) = frame.next_candidate() else {
                stack.pop();
                continue;
            };

            let mut pattern = Vec::with_capacity(frame.pattern.len() + 1);
            pattern.extend_from_slice(&frame.pattern);
            pattern.push(item);

            // Candidates are sorted, so none of the remaining ones can do better
            if self.results.cannot_beat(self.bound(&pattern, &matches)) {
                stack.pop();
                continue;
            }

            if self.options.closed && can_closed_prune(self.db, &pattern, &matches) {
                continue;
            }

            if let Some(child) = self.enter(pattern, matches) {
                stack.push(child);
            }
        }
    }
}

/// Mine the `k` patterns with the highest support.
///
/// Results are sorted by support descending, then pattern ascending.
/// `k == 0` and an empty database yield no patterns.
pub fn top_k(db: &[Vec<Item>], k: usize, options: &TopKOptions<'_>) -> MinerResult<Vec<MinedPattern>> {
    options.validate()?;

    if k == 0 || db.is_empty() {
        return Ok(Vec::new());
    }

    let mut search = Search {
        db,
        options,
        results: TopKHeap::new(k),
        nodes: 0,
    };
    search.run();

    tracing::debug!(
        "Mined {} patterns from {} sequences ({} search nodes)",
        search.results.len(),
        db.len(),
        search.nodes
    );

    Ok(search
        .results
        .into_sorted()
        .into_iter()
        .map(|ranked| MinedPattern::new(ranked.support, ranked.pattern))
        .collect())
}
