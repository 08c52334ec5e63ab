//! Compute backend trait and device abstraction.
//!
//! The [`ComputeBackend`] trait abstracts over execution environments so the
//! physics code in `radiance-core` remains device-agnostic. Two operations
//! matter for performance: filling the N×N coupling matrix (embarrassingly
//! parallel over entries) and the dense matrix-vector product evaluated on
//! every derivative call of a time evolution.

use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;
use thiserror::Error;

/// Errors originating from compute backends.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Backend not available: {0}")]
    Unavailable(String),

    #[error("Device error: {0}")]
    DeviceError(String),

    #[error("Shape mismatch in backend operation: {0}")]
    ShapeMismatch(String),
}

/// Describes the capabilities of a compute backend.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub backend_type: BackendType,
    pub compute_units: Option<usize>,
}

/// The type of compute backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Cpu,
}

/// Abstraction over compute backends.
///
/// Physics code in `radiance-core` operates against this trait. The coupling
/// matrix builder routes its entry-wise fill through
/// [`parallel_matrix_fill`](ComputeBackend::parallel_matrix_fill); the
/// right-hand-side evaluators route their dominant O(N²) product through
/// [`matvec_into`](ComputeBackend::matvec_into) so that parallel mat-vec
/// stays a swappable implementation detail rather than being hard-wired
/// into the physics.
pub trait ComputeBackend: Send + Sync {
    /// Return information about the device.
    fn device_info(&self) -> DeviceInfo;

    /// Fill a `rows`×`cols` complex matrix entry-wise in parallel.
    ///
    /// Each `(i, j)` entry depends only on read-only shared input captured by
    /// `fill_fn` and writes to its own disjoint output slot; the only
    /// synchronization is the final join.
    fn parallel_matrix_fill(
        &self,
        rows: usize,
        cols: usize,
        fill_fn: &(dyn Fn(usize, usize) -> Complex64 + Send + Sync),
    ) -> Result<Array2<Complex64>, ComputeError>;

    /// Perform a complex matrix-vector product $\mathbf{y} = \mathbf{A}\mathbf{x}$.
    fn matvec(
        &self,
        matrix: &Array2<Complex64>,
        vector: ArrayView1<Complex64>,
    ) -> Result<Array1<Complex64>, ComputeError>;

    /// Perform $\mathbf{y} \leftarrow \mathbf{A}\mathbf{x}$ into a
    /// caller-owned buffer.
    ///
    /// This is the hot-path entry point: derivative evaluators call it tens
    /// of thousands of times per evolution run and must not allocate. `out`
    /// must have length `matrix.nrows()`.
    fn matvec_into(
        &self,
        matrix: &Array2<Complex64>,
        vector: ArrayView1<Complex64>,
        out: &mut Array1<Complex64>,
    ) -> Result<(), ComputeError>;
}
