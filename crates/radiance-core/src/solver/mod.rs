//! Steady-state solvers and the coupling matrix machinery behind them.
//!
//! The scalar Green's function lives in [`greens`], the parallel matrix
//! assembly and laser projection in [`assembly`], and the steady-state
//! entry points in [`steady`].

pub mod assembly;
pub mod greens;
pub mod steady;

use thiserror::Error;

use radiance_compute::ComputeError;

/// Errors that can occur during a solve or time evolution.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Dimension mismatch: expected length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Linear algebra error: {0}")]
    LinAlgError(String),

    #[error("Invalid evolution options: {0}")]
    InvalidOptions(String),

    #[error("Invalid time span: [{t0}, {t1}]")]
    InvalidTimeSpan { t0: f64, t1: f64 },

    #[error("Integration exceeded {max_steps} steps at t = {t_reached:.6e}")]
    StepLimitExceeded { t_reached: f64, max_steps: usize },

    #[error("Integration step size underflowed at t = {t:.6e}")]
    StepUnderflow { t: f64 },

    #[error("Compute backend error: {0}")]
    Compute(#[from] ComputeError),
}
