//! Error types shared by the partitioner, the miner and the CLI.

use std::fmt;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for all partitioning and mining operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MinerError {
    /// Invalid argument provided by the caller
    InvalidArgument(String),
    /// Internal invariant violated; indicates a bug or a broken data contract
    Internal(String),
    /// Configuration could not be interpreted
    Config(String),
    /// I/O error occurred
    Io(String),
    /// Input could not be parsed
    Parse(String),
}

impl fmt::Display for MinerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinerError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            MinerError::Internal(msg) => write!(f, "Internal error: {}", msg),
            MinerError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MinerError::Io(msg) => write!(f, "I/O error: {}", msg),
            MinerError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for MinerError {}

impl From<std::io::Error> for MinerError {
    fn from(err: std::io::Error) -> Self {
        MinerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MinerError {
    fn from(err: serde_json::Error) -> Self {
        MinerError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for MinerError {
    fn from(err: toml::de::Error) -> Self {
        MinerError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MinerError {
    fn from(err: toml::ser::Error) -> Self {
        MinerError::Config(err.to_string())
    }
}

/// Result type alias for partitioning and mining operations.
pub type MinerResult<T> = Result<T, MinerError>;
