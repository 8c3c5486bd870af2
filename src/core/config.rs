//! Configuration for partitioning, mining and frequency aggregation

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::algorithms::KernighanLin;
use crate::error::{MinerError, MinerResult};
use crate::mining::{FrequencyOptions, PatternOrder, TopKOptions};

/// Edge cost used while partitioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CostType {
    /// Number of edges between two vertices, both directions
    #[default]
    EdgeCount,
    /// Every pair costs 1
    Constant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitioningConfig {
    /// Kernighan-Lin rounds per bipartition; negative runs until converged
    pub max_iterations: i64,

    /// Maximum number of vertices per partition
    pub max_partition_size: i64,

    pub cost_type: CostType,
}

impl Default for PartitioningConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_partition_size: 10,
            cost_type: CostType::EdgeCount,
        }
    }
}

impl PartitioningConfig {
    /// Validated partition size bound
    pub fn partition_size(&self) -> MinerResult<usize> {
        if self.max_partition_size <= 0 {
            return Err(MinerError::InvalidArgument(format!(
                "the partition size limit must be greater than 0, got {}",
                self.max_partition_size
            )));
        }
        usize::try_from(self.max_partition_size)
            .map_err(|_| MinerError::InvalidArgument("partition size limit out of range".into()))
    }

    /// `None` for an unlimited number of rounds
    pub fn kernighan_lin_iterations(&self) -> Option<usize> {
        usize::try_from(self.max_iterations).ok()
    }

    pub fn kernighan_lin(&self) -> KernighanLin {
        KernighanLin::new().with_max_iterations(self.kernighan_lin_iterations())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub min_pattern_length: usize,
    pub max_pattern_length: usize,

    /// K of the top-K search, per partition database
    pub max_patterns_per_partition: usize,

    /// Only report closed patterns
    pub closed_patterns: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_pattern_length: 1,
            max_pattern_length: 1000,
            max_patterns_per_partition: 10,
            closed_patterns: true,
        }
    }
}

impl MiningConfig {
    pub fn top_k_options(&self) -> TopKOptions<'static> {
        TopKOptions::default()
            .closed(self.closed_patterns)
            .with_lengths(self.min_pattern_length, self.max_pattern_length)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    pub min_absolute_frequency: f64,
    pub min_model_frequency: usize,
    pub max_patterns: usize,
    pub pattern_order: PatternOrder,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        let defaults = FrequencyOptions::default();
        Self {
            min_absolute_frequency: defaults.min_absolute_frequency,
            min_model_frequency: defaults.min_model_frequency,
            max_patterns: defaults.max_patterns,
            pattern_order: defaults.pattern_order,
        }
    }
}

impl FrequencyConfig {
    pub fn options(&self) -> FrequencyOptions {
        FrequencyOptions {
            min_absolute_frequency: self.min_absolute_frequency,
            min_model_frequency: self.min_model_frequency,
            max_patterns: self.max_patterns,
            pattern_order: self.pattern_order,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    pub partitioning: PartitioningConfig,
    pub mining: MiningConfig,
    pub frequency: FrequencyConfig,
}

impl MinerConfig {
    /// Load config from TOML file
    pub fn load(path: &Path) -> MinerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save(&self, path: &Path) -> MinerResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<config dir>/pattern-miner/config.toml`, when the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pattern-miner").join("config.toml"))
    }

    /// Load from the default path, falling back to defaults when absent
    pub fn load_or_default() -> MinerResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> MinerResult<()> {
        self.partitioning.partition_size()?;
        if self.mining.min_pattern_length > self.mining.max_pattern_length {
            return Err(MinerError::InvalidArgument(format!(
                "minimum pattern length {} exceeds maximum {}",
                self.mining.min_pattern_length, self.mining.max_pattern_length
            )));
        }
        if !self.frequency.min_absolute_frequency.is_finite() {
            return Err(MinerError::Config(
                "min_absolute_frequency must be finite".into(),
            ));
        }
        Ok(())
    }
}
