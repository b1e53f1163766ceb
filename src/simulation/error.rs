//! Error types for the simulation core.
//!
//! Everything fallible in the core reports through [`SimError`]. None of these
//! conditions is fatal to the process; callers either refuse the operation or
//! fall back to a safe default.

use thiserror::Error;

use super::lifecycle::Phase;

/// Main error type for simulation operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// A genome was built from an allele list of the wrong shape.
    #[error("invalid genome: expected {expected} gene pairs, found {found}")]
    InvalidGenome {
        /// Number of loci every genome must have.
        expected: usize,
        /// Number of loci that were supplied.
        found: usize,
    },

    /// An allele symbol does not belong to the alphabet of its locus.
    #[error("allele '{symbol}' is not valid at the {locus} locus")]
    UnknownAllele {
        /// Offending symbol.
        symbol: String,
        /// Locus the symbol was supplied for.
        locus: &'static str,
    },

    /// Simulation parameters failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A world position fell outside the navigation grid.
    #[error("position ({x:.2}, {y:.2}) is outside the navigation grid")]
    OutOfBounds {
        /// World x coordinate.
        x: f32,
        /// World y coordinate.
        y: f32,
    },

    /// A gating device could not be placed at the requested point.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// A lifecycle operation was requested from a phase that does not allow it.
    #[error("cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// Phase the game was in.
        from: Phase,
        /// Phase that was requested.
        to: Phase,
    },

    /// File system errors.
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spatial index construction errors.
    #[error("spatial index error: {0:?}")]
    Spatial(kdtree::ErrorKind),
}

impl From<kdtree::ErrorKind> for SimError {
    fn from(kind: kdtree::ErrorKind) -> Self {
        Self::Spatial(kind)
    }
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
