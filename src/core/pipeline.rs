//! Config-driven mining pipeline
//!
//! Partition a graph into size-bounded groups, mine the top-K patterns of
//! each partition's sequence database and aggregate them across partitions.
//! Turning partitions into label sequences happens outside this crate.

use std::hash::Hash;
use std::time::Instant;

use tracing::debug;

use super::config::{CostType, MinerConfig};
use crate::algorithms::{RecursivePartitioner, UnitCost};
use crate::error::MinerResult;
use crate::graph::Digraph;
use crate::mining::{calculate_frequencies, top_k, Database, MinedPattern, PatternFrequency};

/// Runs the pipeline stages with one validated configuration
#[derive(Debug, Clone)]
pub struct MiningPipeline {
    config: MinerConfig,
}

impl MiningPipeline {
    pub fn new(config: MinerConfig) -> MinerResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Split `graph` into partitions of at most `max_partition_size` vertices
    pub fn partition_graph<V>(&self, graph: &Digraph<V>) -> MinerResult<Vec<Vec<V>>>
    where
        V: Clone + Eq + Hash,
    {
        let settings = &self.config.partitioning;
        let max_size = settings.partition_size()?;
        let kernighan_lin = settings.kernighan_lin();
        let start = Instant::now();

        let partitions = match settings.cost_type {
            CostType::EdgeCount => {
                let kernighan_lin = kernighan_lin.with_cost(|a: &V, b: &V| graph.edge_count(a, b));
                RecursivePartitioner::with_kernighan_lin(kernighan_lin, max_size)?
                    .partition(graph.vertices(), |v| graph.connections(v))?
            }
            CostType::Constant => {
                RecursivePartitioner::with_kernighan_lin(kernighan_lin.with_cost(UnitCost), max_size)?
                    .partition(graph.vertices(), |v| graph.connections(v))?
            }
        };

        debug!(
            "Partitioned {} vertices into {} groups in {:?}",
            graph.vertices().len(),
            partitions.len(),
            start.elapsed()
        );
        Ok(partitions)
    }

    /// Top-K patterns of every database, in input order
    pub fn mine_partitions(&self, databases: &[Database]) -> MinerResult<Vec<Vec<MinedPattern>>> {
        let settings = &self.config.mining;
        let options = settings.top_k_options();

        databases
            .iter()
            .map(|db| top_k(db, settings.max_patterns_per_partition, &options))
            .collect()
    }

    /// Cross-partition frequencies of already mined patterns
    pub fn aggregate_frequencies(&self, mined: &[Vec<MinedPattern>]) -> Vec<PatternFrequency> {
        calculate_frequencies(mined, &self.config.frequency.options())
    }

    /// Mine every database, then aggregate
    pub fn run(&self, databases: &[Database]) -> MinerResult<Vec<PatternFrequency>> {
        let mined = self.mine_partitions(databases)?;
        let frequencies = self.aggregate_frequencies(&mined);
        debug!(
            "Mined {} databases, {} patterns after aggregation",
            databases.len(),
            frequencies.len()
        );
        Ok(frequencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MinerError;

    fn two_clusters() -> Digraph<char> {
        Digraph::from_edges(
            "abcdefgh".chars(),
            [
                ('a', 'b'),
                ('a', 'c'),
                ('b', 'a'),
                ('b', 'c'),
                ('b', 'f'),
                ('c', 'a'),
                ('c', 'b'),
                ('c', 'f'),
                ('f', 'a'),
                ('f', 'b'),
                ('f', 'c'),
                ('d', 'e'),
                ('d', 'g'),
                ('d', 'h'),
                ('e', 'g'),
                ('g', 'd'),
                ('g', 'e'),
                ('g', 'h'),
            ],
        )
    }

    fn db() -> Database {
        vec![
            vec![0, 1, 2, 3, 4],
            vec![1, 1, 1, 3, 4],
            vec![2, 1, 2, 2, 0],
            vec![1, 1, 1, 2, 2],
        ]
    }

    fn pipeline(edit: impl FnOnce(&mut MinerConfig)) -> MiningPipeline {
        let mut config = MinerConfig::default();
        edit(&mut config);
        MiningPipeline::new(config).unwrap()
    }

    #[test]
    fn test_partition_graph_with_edge_count() {
        let pipeline = pipeline(|c| c.partitioning.max_partition_size = 5);
        let partitions = pipeline.partition_graph(&two_clusters()).unwrap();
        assert_eq!(
            partitions,
            vec![vec!['h', 'd', 'e', 'g'], vec!['b', 'c', 'f', 'a']]
        );
    }

    #[test]
    fn test_partition_graph_with_constant_cost() {
        let pipeline = pipeline(|c| {
            c.partitioning.max_partition_size = 3;
            c.partitioning.cost_type = CostType::Constant;
        });
        let partitions = pipeline.partition_graph(&two_clusters()).unwrap();

        let mut covered: Vec<char> = partitions.iter().flatten().copied().collect();
        covered.sort_unstable();
        assert_eq!(covered, "abcdefgh".chars().collect::<Vec<_>>());
        assert!(partitions.iter().all(|p| !p.is_empty() && p.len() <= 3));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = MinerConfig::default();
        config.partitioning.max_partition_size = 0;
        assert!(matches!(
            MiningPipeline::new(config),
            Err(MinerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mine_and_aggregate() {
        let pipeline = pipeline(|c| c.mining.max_patterns_per_partition = 7);
        let mined = pipeline.mine_partitions(&[db(), db()]).unwrap();
        assert_eq!(mined.len(), 2);
        assert_eq!(mined[0].len(), 7);
        assert_eq!(mined[0][0], MinedPattern::new(4.0, vec![1]));

        let frequencies = pipeline.run(&[db(), db()]).unwrap();
        assert_eq!(frequencies.len(), 7);
        assert_eq!(frequencies[0].pattern, vec![1]);
        assert_eq!(frequencies[0].absolute_frequency, 8.0);
        assert_eq!(frequencies[0].model_frequency, 2);
    }

    #[test]
    fn test_empty_databases() {
        let pipeline = pipeline(|_| {});
        assert!(pipeline.run(&[]).unwrap().is_empty());
        assert!(pipeline.run(&[vec![]]).unwrap().is_empty());
    }
}
