//! Advanced benchmark suite for the partitioning and mining algorithms
//!
//! Measures Kernighan-Lin bipartitioning, recursive partitioning and top-K
//! mining (closed and unrestricted) on seeded random inputs, so every run
//! sees the same graphs and databases.

use std::mem::size_of;
use std::time::Instant;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithms::{KernighanLin, RecursivePartitioner};
use crate::error::MinerResult;
use crate::graph::Digraph;
use crate::mining::{calculate_frequencies, top_k, Database, FrequencyOptions, Item, TopKOptions};

const SEED: u64 = 0x5eed;
const GRAPH_VERTICES: u32 = 64;
const GRAPH_EDGES: usize = 256;
const DB_SEQUENCES: usize = 40;
const DB_SEQUENCE_LEN: usize = 12;
const DB_ALPHABET: Item = 8;

/// Benchmark results for a single algorithm
#[derive(Debug, Clone)]
pub struct AlgorithmBenchmark {
    pub name: String,
    pub iterations: usize,
    pub total_ms: u64,
    pub avg_us: f64,
    pub min_us: u64,
    pub max_us: u64,
    pub ops_per_sec: f64,
    pub memory_bytes: usize,
    /// Timed runs that returned an error; they are left out of the timings
    pub failures: usize,
}

/// Full benchmark suite results
#[derive(Debug, Clone)]
pub struct BenchmarkSuite {
    pub started_at: DateTime<Local>,
    pub bipartition: AlgorithmBenchmark,
    pub recursive_partition: AlgorithmBenchmark,
    pub closed_top_k: AlgorithmBenchmark,
    pub open_top_k: AlgorithmBenchmark,
    pub frequencies: AlgorithmBenchmark,
    pub closed_speedup: f64,
}

#[derive(Debug, Clone, Default)]
struct Timing {
    times: Vec<u64>,
    total_ms: u64,
    failures: usize,
}

/// Advanced benchmark runner
pub struct AdvancedBenchmarkRunner {
    iterations: usize,
    warmup: usize,
    graph: Digraph<u32>,
    database: Database,
}

impl AdvancedBenchmarkRunner {
    pub fn new(iterations: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);
        Self {
            iterations,
            warmup: 5,
            graph: random_graph(&mut rng, GRAPH_VERTICES, GRAPH_EDGES),
            database: random_database(&mut rng, DB_SEQUENCES, DB_SEQUENCE_LEN, DB_ALPHABET),
        }
    }

    /// Run all benchmarks
    pub fn run_all(&self) -> BenchmarkSuite {
        let started_at = Local::now();
        println!("Running pattern miner benchmark suite\n");
        println!("Iterations: {}", self.iterations);
        println!(
            "Graph: {} vertices, {} edges | Database: {} sequences of {}",
            self.graph.vertices().len(),
            self.graph.edge_total(),
            self.database.len(),
            DB_SEQUENCE_LEN
        );
        println!("{}", "=".repeat(60));

        let bipartition = self.bench_bipartition();
        let recursive_partition = self.bench_recursive_partition();
        let closed_top_k = self.bench_top_k(true);
        let open_top_k = self.bench_top_k(false);
        let frequencies = self.bench_frequencies();

        let closed_speedup = if closed_top_k.avg_us > 0.0 {
            open_top_k.avg_us / closed_top_k.avg_us
        } else {
            0.0
        };

        BenchmarkSuite {
            started_at,
            bipartition,
            recursive_partition,
            closed_top_k,
            open_top_k,
            frequencies,
            closed_speedup,
        }
    }

    /// Benchmark a single Kernighan-Lin bipartition
    fn bench_bipartition(&self) -> AlgorithmBenchmark {
        println!("\nKernighan-Lin Bipartition");

        let graph = &self.graph;
        let kernighan_lin = KernighanLin::new().with_cost(|a: &u32, b: &u32| graph.edge_count(a, b));
        let run = || kernighan_lin.bipartition(graph.vertices(), |v| graph.connections(v));

        for _ in 0..self.warmup {
            let _ = run();
        }

        let timing = self.time(run);

        let memory = graph.vertices().len().pow(2) / 2 * size_of::<(usize, usize, f64)>();
        self.create_result("KL Bipartition", timing, memory)
    }

    /// Benchmark recursive partitioning down to groups of 8
    fn bench_recursive_partition(&self) -> AlgorithmBenchmark {
        println!("Recursive Partition");

        let graph = &self.graph;
        let kernighan_lin = KernighanLin::new().with_cost(|a: &u32, b: &u32| graph.edge_count(a, b));
        let partitioner = match RecursivePartitioner::with_kernighan_lin(kernighan_lin, 8) {
            Ok(partitioner) => partitioner,
            Err(e) => {
                eprintln!("   skipped: {}", e);
                return self.create_result("Recursive Partition", Timing::default(), 0);
            }
        };
        let run = || partitioner.partition(graph.vertices(), |v| graph.connections(v));

        for _ in 0..self.warmup {
            let _ = run();
        }

        let timing = self.time(run);

        let memory = graph.vertices().len() * size_of::<u32>() * 2;
        self.create_result("Recursive Partition", timing, memory)
    }

    /// Benchmark top-K mining with K = 20
    fn bench_top_k(&self, closed: bool) -> AlgorithmBenchmark {
        let name = if closed { "Closed Top-K" } else { "Open Top-K" };
        println!("{}", name);

        let options = TopKOptions::default().closed(closed).with_lengths(1, 1000);

        for _ in 0..self.warmup {
            let _ = top_k(&self.database, 20, &options);
        }

        let timing = self.time(|| top_k(&self.database, 20, &options));

        let memory = self.database.iter().map(|s| s.len() * size_of::<Item>()).sum();
        self.create_result(name, timing, memory)
    }

    /// Benchmark frequency aggregation over per-sequence mining results
    fn bench_frequencies(&self) -> AlgorithmBenchmark {
        println!("Frequency Aggregation");

        let options = TopKOptions::default().with_lengths(1, 1000);
        let models: Vec<_> = self
            .database
            .chunks(4)
            .filter_map(|chunk| top_k(chunk, 10, &options).ok())
            .collect();
        let frequency_options = FrequencyOptions::default();

        for _ in 0..self.warmup {
            let _ = calculate_frequencies(&models, &frequency_options);
        }

        let timing = self.time(|| Ok(calculate_frequencies(&models, &frequency_options)));

        let memory = models
            .iter()
            .flatten()
            .map(|p| size_of::<f64>() + p.pattern.len() * size_of::<Item>())
            .sum();
        self.create_result("Frequencies", timing, memory)
    }

    /// Time `iterations` runs. Failed runs are counted, not timed, and the
    /// first error is reported.
    fn time<T, F: FnMut() -> MinerResult<T>>(&self, mut run: F) -> Timing {
        let mut timing = Timing {
            times: Vec::with_capacity(self.iterations),
            ..Timing::default()
        };
        let start = Instant::now();

        for _ in 0..self.iterations {
            let iter_start = Instant::now();
            match run() {
                Ok(_) => timing.times.push(iter_start.elapsed().as_micros() as u64),
                Err(e) => {
                    if timing.failures == 0 {
                        eprintln!("   run failed: {}", e);
                    }
                    timing.failures += 1;
                }
            }
        }

        timing.total_ms = start.elapsed().as_millis() as u64;
        timing
    }

    fn create_result(&self, name: &str, timing: Timing, memory_bytes: usize) -> AlgorithmBenchmark {
        let Timing {
            times,
            total_ms,
            failures,
        } = timing;
        let min = times.iter().min().copied().unwrap_or(0);
        let max = times.iter().max().copied().unwrap_or(0);
        let avg = if !times.is_empty() {
            times.iter().sum::<u64>() as f64 / times.len() as f64
        } else {
            0.0
        };
        let ops = if total_ms > 0 {
            times.len() as f64 / (total_ms as f64 / 1000.0)
        } else {
            0.0
        };

        let result = AlgorithmBenchmark {
            name: name.to_string(),
            iterations: times.len(),
            total_ms,
            avg_us: avg,
            min_us: min,
            max_us: max,
            ops_per_sec: ops,
            memory_bytes,
            failures,
        };

        println!(
            "   avg: {:.2}µs | min: {}µs | max: {}µs | {:.0} ops/sec | {}",
            result.avg_us,
            result.min_us,
            result.max_us,
            result.ops_per_sec,
            format_bytes(result.memory_bytes)
        );
        if result.failures > 0 {
            println!("   {} of {} runs failed", result.failures, self.iterations);
        }

        result
    }
}

impl BenchmarkSuite {
    /// Print formatted results
    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("BENCHMARK SUMMARY ({})", self.started_at.format("%Y-%m-%d %H:%M:%S"));
        println!("{}", "=".repeat(60));

        println!("\n┌─────────────────────┬───────────┬───────────┬────────────┐");
        println!("│ Algorithm           │  Avg (µs) │  Ops/sec  │  Input     │");
        println!("├─────────────────────┼───────────┼───────────┼────────────┤");

        for bench in self.results() {
            println!(
                "│ {:19} │ {:>9.2} │ {:>9.0} │ {:>10} │",
                bench.name,
                bench.avg_us,
                bench.ops_per_sec,
                format_bytes(bench.memory_bytes)
            );
        }

        println!("└─────────────────────┴───────────┴───────────┴────────────┘");

        println!("\nClosed pruning speedup over unrestricted search: {:.2}x", self.closed_speedup);
    }

    pub fn results(&self) -> [&AlgorithmBenchmark; 5] {
        [
            &self.bipartition,
            &self.recursive_partition,
            &self.closed_top_k,
            &self.open_top_k,
            &self.frequencies,
        ]
    }
}

fn random_graph(rng: &mut StdRng, vertices: u32, edges: usize) -> Digraph<u32> {
    let edges: Vec<(u32, u32)> = (0..edges)
        .map(|_| (rng.gen_range(0..vertices), rng.gen_range(0..vertices)))
        .collect();
    Digraph::from_edges(0..vertices, edges)
}

fn random_database(rng: &mut StdRng, sequences: usize, length: usize, alphabet: Item) -> Database {
    (0..sequences)
        .map(|_| (0..length).map(|_| rng.gen_range(0..alphabet)).collect())
        .collect()
}

fn format_bytes(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MinerError;

    #[test]
    fn test_benchmark_runner() {
        let runner = AdvancedBenchmarkRunner::new(2);
        let bench = runner.bench_bipartition();
        assert_eq!(bench.iterations, 2);
        assert!(bench.min_us <= bench.max_us);

        let closed = runner.bench_top_k(true);
        assert_eq!(closed.name, "Closed Top-K");
        assert!(closed.memory_bytes > 0);
    }

    #[test]
    fn test_failed_runs_are_counted_not_timed() {
        let runner = AdvancedBenchmarkRunner::new(3);
        let mut calls = 0;
        let timing = runner.time(|| {
            calls += 1;
            if calls == 2 {
                Err(MinerError::Internal("no maximal swap pair found".into()))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(timing.times.len(), 2);
        assert_eq!(timing.failures, 1);

        let result = runner.create_result("Failing", timing, 0);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.failures, 1);

        let broken = runner.time(|| top_k(&runner.database, 5, &TopKOptions::default().with_lengths(3, 1)));
        assert!(broken.times.is_empty());
        assert_eq!(broken.failures, 3);
    }

    #[test]
    fn test_inputs_are_reproducible() {
        let first = AdvancedBenchmarkRunner::new(1);
        let second = AdvancedBenchmarkRunner::new(1);
        assert_eq!(first.database, second.database);
        assert_eq!(first.graph.vertices(), second.graph.vertices());
        assert_eq!(first.graph.edge_total(), GRAPH_EDGES);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
