//! # Error Types
//!
//! All errors that can be raised while configuring noise, generating chunks or
//! meshing voxel grids. Every failure in this crate is local and fail-fast:
//! none of these are retried.

use thiserror::Error;

/// Errors that can occur in the terrain pipeline.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// Settings are missing or describe something that cannot be built.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A settings update was handed the wrong kind of settings for a generator.
    #[error("settings type mismatch: generator expects {expected} settings, got {found}")]
    TypeMismatch {
        /// The settings kind the generator owns.
        expected: &'static str,
        /// The settings kind that was supplied.
        found: &'static str,
    },

    /// A voxel array does not have the dimensions its consumer requires.
    #[error("dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        /// The required dimensions (x, y, z).
        expected: [usize; 3],
        /// The dimensions that were supplied.
        found: [usize; 3],
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `EngineConfig`.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TerrainError>;
