//! Graph partitioning algorithms
//!
//! This module provides the partitioning half of the pipeline:
//! - Cost cache: memoized edge costs over unordered vertex pairs
//! - Kernighan-Lin: balanced bipartitioning with a minimal cut
//! - Recursive partitioning: size-bounded groups via repeated bipartitioning

pub mod cost_cache;
pub mod kernighan_lin;
pub mod partition;

pub use cost_cache::CostCache;
pub use kernighan_lin::{cut_cost, Bipartition, CostFunction, KernighanLin, UnitCost};
pub use partition::RecursivePartitioner;
