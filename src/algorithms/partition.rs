//! Recursive partitioning into size-bounded vertex groups
//!
//! Bipartitions the input once, then keeps splitting every side that is
//! still larger than the size bound. Work is kept on an explicit stack, so
//! skewed inputs (stars, long chains) cannot exhaust the call stack.
//! Partitions are emitted depth-first, A side before B side.

use std::hash::Hash;

use super::kernighan_lin::{CostFunction, KernighanLin, UnitCost};
use crate::error::{MinerError, MinerResult};

enum Work<V> {
    Split(Vec<V>),
    Emit(Vec<V>),
}

/// Kernighan-Lin applied until every partition fits `max_partition_size`
#[derive(Debug, Clone)]
pub struct RecursivePartitioner<C = UnitCost> {
    kernighan_lin: KernighanLin<C>,
    max_partition_size: usize,
}

impl RecursivePartitioner<UnitCost> {
    pub fn new(max_partition_size: usize) -> MinerResult<Self> {
        Self::with_kernighan_lin(KernighanLin::new(), max_partition_size)
    }
}

impl<C> RecursivePartitioner<C> {
    pub fn with_kernighan_lin(
        kernighan_lin: KernighanLin<C>,
        max_partition_size: usize,
    ) -> MinerResult<Self> {
        if max_partition_size == 0 {
            return Err(MinerError::InvalidArgument(
                "the partition size limit must be greater than 0".into(),
            ));
        }
        Ok(Self {
            kernighan_lin,
            max_partition_size,
        })
    }

    pub fn max_partition_size(&self) -> usize {
        self.max_partition_size
    }

    /// Split `vertices` into groups of at most `max_partition_size`.
    ///
    /// A bound of 1 yields one singleton per vertex without running
    /// Kernighan-Lin. Otherwise the input is always bipartitioned at least
    /// once, even when it already fits.
    pub fn partition<V, N, I>(&self, vertices: &[V], connections: N) -> MinerResult<Vec<Vec<V>>>
    where
        V: Clone + Eq + Hash,
        N: Fn(&V) -> I,
        I: IntoIterator<Item = V>,
        C: CostFunction<V>,
    {
        if self.max_partition_size == 1 {
            return Ok(vertices.iter().map(|v| vec![v.clone()]).collect());
        }

        let mut partitions = Vec::new();
        let mut stack = vec![Work::Split(vertices.to_vec())];
        let mut splits = 0usize;

        while let Some(work) = stack.pop() {
            match work {
                Work::Emit(partition) => partitions.push(partition),
                Work::Split(group) => {
                    splits += 1;
                    let [a, b] = self
                        .kernighan_lin
                        .bipartition(&group, &connections)?
                        .into_sides();
                    // Pushed in reverse so the A side is handled first
                    for side in [b, a] {
                        if side.is_empty() {
                            continue;
                        }
                        if side.len() <= self.max_partition_size {
                            stack.push(Work::Emit(side));
                        } else {
                            stack.push(Work::Split(side));
                        }
                    }
                }
            }
        }

        tracing::debug!(
            "Partitioned {} vertices into {} groups ({} bipartitions)",
            vertices.len(),
            partitions.len(),
            splits
        );

        Ok(partitions)
    }
}
