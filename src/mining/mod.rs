//! Sequential pattern mining over label sequences
//!
//! This module provides the top-K miner and its building blocks:
//! - Occurrence index: one-item extensions of a pattern in a single pass
//! - Closedness: forward/backward extension checks and search pruning
//! - Bounded heap: the K best `(support, pattern)` candidates
//! - Frequency: aggregation of mined patterns across models

pub mod closed;
pub mod frequency;
pub mod heap;
pub mod index;
pub mod topk;
pub mod types;

pub use frequency::{calculate_frequencies, FrequencyOptions, PatternFrequency, PatternOrder};
pub use topk::{top_k, TopKOptions};
pub use types::{Database, Item, Match, Matches, MinedPattern, Pattern};
