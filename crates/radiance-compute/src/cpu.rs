//! CPU compute backend using Rayon for shared-memory parallelism.

use ndarray::linalg::general_mat_vec_mul;
use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;

use crate::backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};

/// CPU backend that parallelises the matrix fill across threads via Rayon.
///
/// The mat-vec product delegates to ndarray's gemv, which is sequential; the
/// evolution loop that calls it is itself sequential, so the parallelism
/// budget is spent where it pays: the one-off N×N coupling matrix fill.
pub struct CpuBackend {
    num_threads: usize,
}

impl CpuBackend {
    /// Create a new CPU backend using all available threads.
    pub fn new() -> Self {
        Self {
            num_threads: rayon::current_num_threads(),
        }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: format!("CPU ({} threads)", self.num_threads),
            backend_type: BackendType::Cpu,
            compute_units: Some(self.num_threads),
        }
    }

    fn parallel_matrix_fill(
        &self,
        rows: usize,
        cols: usize,
        fill_fn: &(dyn Fn(usize, usize) -> Complex64 + Send + Sync),
    ) -> Result<Array2<Complex64>, ComputeError> {
        use rayon::prelude::*;

        let data: Vec<Complex64> = (0..rows * cols)
            .into_par_iter()
            .map(|idx| {
                let i = idx / cols;
                let j = idx % cols;
                fill_fn(i, j)
            })
            .collect();

        Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| ComputeError::DeviceError(e.to_string()))
    }

    fn matvec(
        &self,
        matrix: &Array2<Complex64>,
        vector: ArrayView1<Complex64>,
    ) -> Result<Array1<Complex64>, ComputeError> {
        if matrix.ncols() != vector.len() {
            return Err(ComputeError::ShapeMismatch(format!(
                "matvec: matrix is {}x{}, vector has length {}",
                matrix.nrows(),
                matrix.ncols(),
                vector.len()
            )));
        }
        Ok(matrix.dot(&vector))
    }

    fn matvec_into(
        &self,
        matrix: &Array2<Complex64>,
        vector: ArrayView1<Complex64>,
        out: &mut Array1<Complex64>,
    ) -> Result<(), ComputeError> {
        if matrix.ncols() != vector.len() || matrix.nrows() != out.len() {
            return Err(ComputeError::ShapeMismatch(format!(
                "matvec_into: matrix is {}x{}, vector has length {}, out has length {}",
                matrix.nrows(),
                matrix.ncols(),
                vector.len(),
                out.len()
            )));
        }
        general_mat_vec_mul(
            Complex64::new(1.0, 0.0),
            matrix,
            &vector,
            Complex64::new(0.0, 0.0),
            out,
        );
        Ok(())
    }
}
