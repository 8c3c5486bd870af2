//! Pattern Miner
//!
//! Finds recurring structure in large graphs by splitting them into
//! size-bounded, densely connected partitions and mining the most frequent
//! closed sequential patterns from label sequences derived from those
//! partitions.
//!
//! ## Features
//!
//! - **Kernighan-Lin**: balanced bipartitioning minimizing the cut cost
//! - **Recursive Partitioning**: groups of at most N vertices
//! - **Top-K Mining**: branch-and-bound search for the K best patterns
//! - **Closed Patterns**: only patterns without a same-support extension
//! - **Frequency Aggregation**: pattern counts across many models
//!
//! ## Example
//!
//! ```
//! use pattern_miner::{top_k, TopKOptions};
//!
//! let db = vec![vec![1, 2, 3], vec![1, 3], vec![2, 1, 3]];
//! let patterns = top_k(&db, 2, &TopKOptions::default()).unwrap();
//! assert_eq!(patterns[0].pattern, vec![1, 3]);
//! assert_eq!(patterns[0].support, 3.0);
//! ```

pub mod algorithms;
pub mod bench;
pub mod core;
pub mod error;
pub mod graph;
pub mod mining;

// Re-exports
pub use algorithms::{cut_cost, Bipartition, CostCache, CostFunction, KernighanLin, RecursivePartitioner, UnitCost};
pub use bench::{AdvancedBenchmarkRunner, BenchmarkSuite};
pub use core::config::{CostType, MinerConfig};
pub use core::pipeline::MiningPipeline;
pub use error::{MinerError, MinerResult};
pub use graph::{Digraph, GraphFile};
pub use mining::{
    calculate_frequencies, top_k, Database, FrequencyOptions, Item, Match, MinedPattern, Pattern,
    PatternFrequency, PatternOrder, TopKOptions,
};
