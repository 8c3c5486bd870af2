//! Benchmark suite for the partitioning and mining algorithms
//!
//! Times on seeded random inputs:
//! - Kernighan-Lin bipartitioning
//! - Recursive size-bounded partitioning
//! - Closed and unrestricted top-K mining
//! - Cross-model frequency aggregation

pub mod advanced;

pub use advanced::{AdvancedBenchmarkRunner, AlgorithmBenchmark, BenchmarkSuite};
