//! Steady-state solvers for both model kinds.
//!
//! The linear scalar model has a closed-form steady state: the coherences
//! solve the dense complex system `G·β = (i/2)·Ωₙ`, handled here by LU
//! decomposition via `faer` (factorize-and-solve, never explicit inversion).
//!
//! The mean-field model has no closed form. Its "steady state" is *defined*
//! operationally as the endpoint of a time evolution over a bounded horizon
//! ([`DEFAULT_NONLINEAR_HORIZON`], caller-overridable) starting from the
//! ground state, with intermediate samples discarded. This is an
//! approximation — the returned state is wherever the dynamics arrived at
//! the horizon, not a certified fixed point.

use faer::linalg::solvers::SpSolver;
use ndarray::Array1;
use num_complex::Complex64;

use radiance_compute::ComputeBackend;

use super::SolverError;
use crate::evolution::{time_evolution, EvolutionOptions};
use crate::problem::{LinearModel, ModelKind, NonLinearModel, Problem};
use crate::types::PhysicalParams;

/// Evolution horizon, in units of 1/Γ, defining the mean-field steady state.
pub const DEFAULT_NONLINEAR_HORIZON: f64 = 50.0;

/// Solve a dense complex linear system by LU decomposition with partial
/// pivoting.
///
/// Fails with a linear-algebra error when the matrix is singular (the
/// factorized solve then produces non-finite entries); the solve is never
/// retried.
pub fn solve_direct(
    matrix: &ndarray::Array2<Complex64>,
    rhs: &Array1<Complex64>,
) -> Result<Array1<Complex64>, SolverError> {
    let dim = matrix.nrows();
    if matrix.ncols() != dim {
        return Err(SolverError::DimensionMismatch {
            expected: dim,
            actual: matrix.ncols(),
        });
    }
    if rhs.len() != dim {
        return Err(SolverError::DimensionMismatch {
            expected: dim,
            actual: rhs.len(),
        });
    }

    // Convert ndarray to faer Mat<c64>
    let faer_mat = faer::Mat::<faer::complex_native::c64>::from_fn(dim, dim, |i, j| {
        let c = matrix[[i, j]];
        faer::complex_native::c64::new(c.re, c.im)
    });

    let faer_rhs = faer::Col::<faer::complex_native::c64>::from_fn(dim, |i| {
        let c = rhs[i];
        faer::complex_native::c64::new(c.re, c.im)
    });

    let lu = faer_mat.partial_piv_lu();
    let faer_sol = lu.solve(&faer_rhs);

    let solution = Array1::from_vec(
        (0..dim)
            .map(|i| {
                let c = faer_sol[i];
                Complex64::new(c.re, c.im)
            })
            .collect(),
    );

    if solution.iter().any(|c| !c.is_finite()) {
        return Err(SolverError::LinAlgError(
            "singular interaction matrix: LU solve produced non-finite entries".into(),
        ));
    }

    Ok(solution)
}

/// Compute the steady state of a problem.
///
/// Linear scalar model: direct solve of `G·β = (i/2)·Ωₙ`, returning the N
/// coherences. Mean-field model: evolve from the ground state over
/// [`DEFAULT_NONLINEAR_HORIZON`] and return the final 2N-component state.
pub fn steady_state(
    problem: &Problem,
    params: &PhysicalParams,
    backend: &dyn ComputeBackend,
) -> Result<Array1<Complex64>, SolverError> {
    steady_state_with(
        problem,
        params,
        backend,
        DEFAULT_NONLINEAR_HORIZON,
        &EvolutionOptions::default(),
    )
}

/// [`steady_state`] with an explicit nonlinear horizon and evolution options.
///
/// The horizon and options only affect the mean-field branch; trajectory
/// retention is forced off since only the endpoint is surfaced.
pub fn steady_state_with(
    problem: &Problem,
    params: &PhysicalParams,
    backend: &dyn ComputeBackend,
    horizon: f64,
    options: &EvolutionOptions,
) -> Result<Array1<Complex64>, SolverError> {
    match problem.kind {
        ModelKind::Linear(LinearModel::Scalar) => {
            let g = problem.interaction_matrix(params, backend)?;
            let omega = problem.driving_vector(params);
            let rhs = omega.mapv(|w| Complex64::new(0.0, 0.5) * w);
            solve_direct(&g, &rhs)
        }
        ModelKind::NonLinear(NonLinearModel::MeanField) => {
            let endpoint_only = EvolutionOptions {
                keep_trajectory: false,
                ..options.clone()
            };
            let u0 = problem.initial_state();
            let evolution =
                time_evolution(problem, u0, (0.0, horizon), &endpoint_only, params, backend)?;
            Ok(evolution.into_final_state())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_solve_identity_system() {
        let dim = 5;
        let mut matrix = ndarray::Array2::<Complex64>::zeros((dim, dim));
        for i in 0..dim {
            matrix[[i, i]] = Complex64::new(1.0, 0.0);
        }
        let rhs =
            Array1::from_vec((0..dim).map(|i| Complex64::new(i as f64, -1.0)).collect());

        let sol = solve_direct(&matrix, &rhs).unwrap();
        for i in 0..dim {
            assert!((sol[i] - rhs[i]).norm() < 1e-12);
        }
    }

    #[test]
    fn test_solve_complex_system_residual() {
        let matrix = ndarray::Array2::from_shape_vec(
            (2, 2),
            vec![
                Complex64::new(1.0, 1.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(0.0, 1.0),
                Complex64::new(3.0, -1.0),
            ],
        )
        .unwrap();
        let rhs = array![Complex64::new(5.0, 1.0), Complex64::new(4.0, 2.0)];

        let sol = solve_direct(&matrix, &rhs).unwrap();
        let check = matrix.dot(&sol);
        for i in 0..2 {
            assert!((check[i] - rhs[i]).norm() < 1e-10);
        }
    }

    #[test]
    fn test_singular_system_is_reported() {
        // Rank-1 matrix: second row is a multiple of the first.
        let matrix = ndarray::Array2::from_shape_vec(
            (2, 2),
            vec![
                Complex64::new(1.0, 0.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(4.0, 0.0),
            ],
        )
        .unwrap();
        let rhs = array![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];

        assert!(matches!(
            solve_direct(&matrix, &rhs),
            Err(SolverError::LinAlgError(_))
        ));
    }

    #[test]
    fn test_rhs_length_mismatch_fails_fast() {
        let matrix = ndarray::Array2::<Complex64>::zeros((3, 3));
        let rhs = Array1::<Complex64>::zeros(2);
        assert!(matches!(
            solve_direct(&matrix, &rhs),
            Err(SolverError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }
}
