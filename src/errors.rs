use crate::cell::Cell;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalkerError {
    // Configuration errors: fatal, surfaced to the caller, never retried
    #[error("Collision data directory does not exist: {path}")]
    CollisionDirMissing { path: PathBuf },

    #[error("Collision data path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("No region files (*.json, *.bin) found in {path}")]
    NoRegionFiles { path: PathBuf },

    #[error("Corrupted region file {path}: {reason}")]
    CorruptedRegionFile { path: PathBuf, reason: String },

    #[error("Invalid collision record: {reason}")]
    InvalidCollisionRecord { reason: String },

    #[error("Invalid obstacle catalog: {reason}")]
    InvalidObstacleCatalog { reason: String },

    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // Planning errors
    #[error("No route from {start} to {destination} ({explored} cells explored)")]
    NoRoute {
        start: Cell,
        destination: Cell,
        explored: usize,
    },

    #[error("Route search exceeded {budget:?} after exploring {explored} cells")]
    SearchTimeout { budget: Duration, explored: usize },

    // Execution errors
    #[error("Walk gave up after {attempts} failed attempts")]
    ExecutionExhausted { attempts: u32 },

    #[error("Agent disconnected during the walk")]
    AgentDisconnected,

    #[error("Agent at {position} is too far from its route")]
    RouteDiverged { position: Cell },
}

impl WalkerError {
    /// True for the fatal setup errors (bad data directory, unreadable config, bad input)
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            WalkerError::NoRoute { .. }
                | WalkerError::SearchTimeout { .. }
                | WalkerError::ExecutionExhausted { .. }
                | WalkerError::AgentDisconnected
                | WalkerError::RouteDiverged { .. }
        )
    }
}

/// Result type alias for all operations
pub type WalkerResult<T> = Result<T, WalkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walker_error_display() {
        let err = WalkerError::NoRoute {
            start: Cell::new(0, 0, 0),
            destination: Cell::new(4, 4, 0),
            explored: 12,
        };
        assert_eq!(
            err.to_string(),
            "No route from (0, 0, 0) to (4, 4, 0) (12 cells explored)"
        );

        let err = WalkerError::ConfigDirNotFound;
        assert_eq!(err.to_string(), "Failed to get config directory");
    }

    #[test]
    fn test_error_classification() {
        assert!(
            WalkerError::NoRegionFiles {
                path: PathBuf::from("collision")
            }
            .is_configuration()
        );
        assert!(
            !WalkerError::SearchTimeout {
                budget: Duration::from_secs(10),
                explored: 0
            }
            .is_configuration()
        );
        assert!(!WalkerError::ExecutionExhausted { attempts: 6 }.is_configuration());
    }
}
