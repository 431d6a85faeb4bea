//! Error types for cluster matmul operations.

use thiserror::Error;

/// Errors that can occur while configuring the platform or launching a
/// multiply. The kernels themselves never fail.
#[derive(Debug, Error)]
pub enum MatmulError {
    /// The requested supply voltage could not be applied.
    #[error("Voltage set failed: {mv} mV outside [{min}, {max}] mV")]
    VoltageSet { mv: u32, min: u32, max: u32 },

    /// The cluster device could not be opened.
    #[error("Cluster open failed: {0}")]
    ClusterOpen(String),

    /// A team needs at least one worker.
    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(usize),

    /// Dimension mismatch.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Matrix dimension is not a multiple of the dot-kernel lane group.
    #[error("Matrix size {n} is not a multiple of the kernel width {width}")]
    NotDivisible { n: usize, width: usize },

    /// Invalid benchmark configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl MatmulError {
    /// Process status for this error: `-1` (255) when the platform could
    /// not be brought up, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            MatmulError::VoltageSet { .. } | MatmulError::ClusterOpen(_) => 255,
            _ => 1,
        }
    }
}

/// Result type for cluster matmul operations.
pub type Result<T> = std::result::Result<T, MatmulError>;
