//! Pattern Miner CLI
//!
//! Partitions graphs, mines top-K sequential patterns and aggregates pattern
//! frequencies across models. Inputs are JSON files.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pattern_miner::{
    AdvancedBenchmarkRunner, CostType, Database, Digraph, GraphFile, MinedPattern, MinerConfig,
    MinerError, MinerResult, MiningPipeline, PatternOrder,
};

#[derive(Parser)]
#[command(name = "pattern-miner")]
#[command(about = "Graph partitioning and top-K closed sequential pattern mining", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a graph into size-bounded partitions
    Partition {
        /// Graph file: {"vertices": [...], "edges": [[from, to], ...]}
        #[arg(short, long)]
        graph: PathBuf,

        /// Maximum vertices per partition
        #[arg(short = 's', long)]
        max_size: Option<i64>,

        /// Kernighan-Lin rounds per split; negative runs until converged
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        max_iterations: Option<i64>,

        #[arg(long, value_enum)]
        cost: Option<CostType>,
    },

    /// Mine the top-K patterns of a sequence database
    Mine {
        /// Database file: [[item, ...], ...]
        #[arg(short, long)]
        db: PathBuf,

        /// Number of patterns to report
        #[arg(short, long)]
        k: Option<usize>,

        /// Report all patterns, not only closed ones
        #[arg(long)]
        open: bool,

        #[arg(long)]
        min_length: Option<usize>,

        #[arg(long)]
        max_length: Option<usize>,
    },

    /// Aggregate patterns mined from several models
    Frequency {
        /// Mined patterns per model: [[{"support": 2.0, "pattern": [...]}, ...], ...]
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        max_patterns: Option<usize>,

        /// Rank by model frequency instead of absolute frequency
        #[arg(long)]
        by_models: bool,
    },

    /// Run benchmarks
    Bench {
        #[arg(short, long, default_value = "100")]
        iterations: usize,
    },

    /// Show configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Partition {
            graph,
            max_size,
            max_iterations,
            cost,
        } => {
            if let Some(max_size) = max_size {
                config.partitioning.max_partition_size = max_size;
            }
            if let Some(max_iterations) = max_iterations {
                config.partitioning.max_iterations = max_iterations;
            }
            if let Some(cost) = cost {
                config.partitioning.cost_type = cost;
            }

            let file: GraphFile<String> = read_json(&graph)?;
            let graph = Digraph::from_file(file)?;
            info!(
                "Loaded graph with {} vertices and {} edges",
                graph.vertices().len(),
                graph.edge_total()
            );

            let partitions = MiningPipeline::new(config)?.partition_graph(&graph)?;

            if cli.json {
                print_json(&partitions)?;
            } else {
                println!("{} partitions:", partitions.len());
                for (i, partition) in partitions.iter().enumerate() {
                    println!("  {:>4}: {}", i, partition.join(", "));
                }
            }
        }

        Commands::Mine {
            db,
            k,
            open,
            min_length,
            max_length,
        } => {
            if let Some(k) = k {
                config.mining.max_patterns_per_partition = k;
            }
            if open {
                config.mining.closed_patterns = false;
            }
            if let Some(min_length) = min_length {
                config.mining.min_pattern_length = min_length;
            }
            if let Some(max_length) = max_length {
                config.mining.max_pattern_length = max_length;
            }

            let database: Database = read_json(&db)?;
            info!("Loaded {} sequences", database.len());

            let mut mined = MiningPipeline::new(config)?.mine_partitions(&[database])?;
            let patterns = mined.pop().unwrap_or_default();

            if cli.json {
                print_json(&patterns)?;
            } else {
                println!("{:>10}  Pattern", "Support");
                for mined in &patterns {
                    println!("{:>10}  {:?}", mined.support, mined.pattern);
                }
            }
        }

        Commands::Frequency {
            input,
            max_patterns,
            by_models,
        } => {
            if let Some(max_patterns) = max_patterns {
                config.frequency.max_patterns = max_patterns;
            }
            if by_models {
                config.frequency.pattern_order = PatternOrder::ModelFrequency;
            }

            let models: Vec<Vec<MinedPattern>> = read_json(&input)?;
            info!("Loaded mining results of {} models", models.len());

            let frequencies = MiningPipeline::new(config)?.aggregate_frequencies(&models);

            if cli.json {
                print_json(&frequencies)?;
            } else {
                println!("{:>10}  {:>6}  Pattern", "Absolute", "Models");
                for entry in &frequencies {
                    println!(
                        "{:>10}  {:>6}  {:?}",
                        entry.absolute_frequency, entry.model_frequency, entry.pattern
                    );
                }
            }
        }

        Commands::Bench { iterations } => {
            println!("Running benchmarks ({} iterations)...", iterations);

            let runner = AdvancedBenchmarkRunner::new(iterations);
            let suite = runner.run_all();
            suite.print_summary();
        }

        Commands::Config { save } => {
            config.validate()?;
            if save {
                let path = cli
                    .config
                    .or_else(MinerConfig::default_path)
                    .ok_or_else(|| MinerError::Config("no configuration directory available".into()))?;
                config.save(&path)?;
                println!("Saved configuration to {}", path.display());
            }

            if cli.json {
                print_json(&config)?;
            } else {
                println!("Current Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> MinerResult<MinerConfig> {
    match path {
        Some(path) if path.exists() => MinerConfig::load(path),
        Some(_) => Ok(MinerConfig::default()),
        None => MinerConfig::load_or_default(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> MinerResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> MinerResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
