//! Cross-model pattern frequency
//!
//! Aggregates the per-model mining results: how often a pattern was mined in
//! total (summed support) and in how many models it appeared.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{MinedPattern, Pattern};

/// Which frequency ranks patterns first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternOrder {
    #[default]
    AbsoluteFrequency,
    ModelFrequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyOptions {
    pub min_absolute_frequency: f64,
    pub min_model_frequency: usize,
    pub max_patterns: usize,
    pub pattern_order: PatternOrder,
}

impl Default for FrequencyOptions {
    fn default() -> Self {
        Self {
            min_absolute_frequency: 1.0,
            min_model_frequency: 1,
            max_patterns: 10,
            pattern_order: PatternOrder::AbsoluteFrequency,
        }
    }
}

/// A pattern with its aggregated frequencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFrequency {
    pub pattern: Pattern,
    /// Sum of the pattern's support over all models
    pub absolute_frequency: f64,
    /// Number of models the pattern was mined from
    pub model_frequency: usize,
}

/// Aggregate patterns mined from several models.
///
/// Entries below either threshold are dropped, the first `max_patterns`
/// survivors (in first-seen order) are kept and then ranked.
pub fn calculate_frequencies<M, P>(patterns_by_model: M, options: &FrequencyOptions) -> Vec<PatternFrequency>
where
    M: IntoIterator<Item = P>,
    P: AsRef<[MinedPattern]>,
{
    let mut positions: HashMap<Pattern, usize> = HashMap::new();
    let mut entries: Vec<PatternFrequency> = Vec::new();

    for model_patterns in patterns_by_model {
        for mined in model_patterns.as_ref() {
            let position = *positions.entry(mined.pattern.clone()).or_insert_with(|| {
                entries.push(PatternFrequency {
                    pattern: mined.pattern.clone(),
                    absolute_frequency: 0.0,
                    model_frequency: 0,
                });
                entries.len() - 1
            });
            let entry = &mut entries[position];
            entry.absolute_frequency += mined.support;
            entry.model_frequency += 1;
        }
    }

    let mut result: Vec<PatternFrequency> = entries
        .into_iter()
        .filter(|entry| {
            entry.absolute_frequency >= options.min_absolute_frequency
                && entry.model_frequency >= options.min_model_frequency
        })
        .take(options.max_patterns)
        .collect();

    result.sort_by(|a, b| compare_frequencies(a, b, options.pattern_order));
    result
}

/// Higher primary frequency, then higher secondary frequency, then longer pattern
fn compare_frequencies(a: &PatternFrequency, b: &PatternFrequency, order: PatternOrder) -> Ordering {
    let absolute = b.absolute_frequency.total_cmp(&a.absolute_frequency);
    let model = b.model_frequency.cmp(&a.model_frequency);
    let length = b.pattern.len().cmp(&a.pattern.len());

    match order {
        PatternOrder::AbsoluteFrequency => absolute.then(model).then(length),
        PatternOrder::ModelFrequency => model.then(absolute).then(length),
    }
}
