//! Time evolution of the coupled dipole/population equations.
//!
//! [`time_evolution`] advances a state vector over a caller-specified time
//! span under the derivative selected by the problem's model kind. The
//! coupling matrix and driving vector are built once per call and shared
//! read-only with every derivative evaluation; scratch buffers belong to
//! exactly one run. A call either returns a fully valid result or fails —
//! there are no partial trajectories.

pub(crate) mod dopri;
pub(crate) mod rhs;

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use radiance_compute::ComputeBackend;

use crate::problem::{LinearModel, ModelKind, NonLinearModel, Problem};
use crate::solver::SolverError;
use crate::types::PhysicalParams;

/// Controls for an adaptive time evolution run.
///
/// The defaults resolve the fast initial transients of a suddenly switched-on
/// drive: tight tolerances and a very small seed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionOptions {
    /// Relative tolerance of the step-error control.
    pub rtol: f64,
    /// Absolute tolerance of the step-error control.
    pub atol: f64,
    /// Initial step size.
    pub initial_step: f64,
    /// Hard limit on attempted steps before the run is abandoned.
    pub max_steps: usize,
    /// Retain every accepted step (`true`) or only the endpoint (`false`).
    pub keep_trajectory: bool,
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-10,
            atol: 1e-10,
            initial_step: 1e-10,
            max_steps: 1_000_000,
            keep_trajectory: true,
        }
    }
}

/// Result of a time evolution: sampled times and the state at each sample.
///
/// With trajectory retention on, one entry per accepted step (the first
/// being the initial condition); with it off, only the endpoint.
#[derive(Debug, Clone)]
pub struct Evolution {
    pub times: Vec<f64>,
    pub states: Vec<Array1<Complex64>>,
}

impl Evolution {
    /// The state at the end of the integrated span.
    pub fn final_state(&self) -> &Array1<Complex64> {
        self.states
            .last()
            .expect("evolution result holds at least one state")
    }

    /// Consume the evolution, keeping only the endpoint state.
    pub fn into_final_state(mut self) -> Array1<Complex64> {
        self.states
            .pop()
            .expect("evolution result holds at least one state")
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Advance `initial_state` over `t_span` under the problem's dynamics.
///
/// For the linear scalar model the state is the length-N coherence vector
/// and the derivative is `du/dt = G·u − (i/2)·Ωₙ`. For the mean-field model
/// the state is the length-2N `[β, z]` vector evolving under the nonlinear
/// two-level equations. The initial state's length is checked against the
/// model before any work is done.
pub fn time_evolution(
    problem: &Problem,
    initial_state: Array1<Complex64>,
    t_span: (f64, f64),
    options: &EvolutionOptions,
    params: &PhysicalParams,
    backend: &dyn ComputeBackend,
) -> Result<Evolution, SolverError> {
    let n = problem.atoms.len();
    let expected = problem.state_len();
    if initial_state.len() != expected {
        return Err(SolverError::DimensionMismatch {
            expected,
            actual: initial_state.len(),
        });
    }

    match problem.kind {
        ModelKind::Linear(LinearModel::Scalar) => {
            let coupling = problem.interaction_matrix(params, backend)?;
            let drive_term = problem
                .driving_vector(params)
                .mapv(|w| Complex64::new(0.0, -0.5) * w);
            let evaluator = rhs::LinearRhs::new(&coupling, &drive_term, backend);
            dopri::integrate(
                |t, y, dy| evaluator.eval(t, y, dy),
                t_span,
                initial_state,
                options,
            )
        }
        ModelKind::NonLinear(NonLinearModel::MeanField) => {
            let mut coupling = problem.interaction_matrix(params, backend)?;
            // Split the scalar matrix into the off-diagonal coupling operator
            // (negated, diagonal zeroed) and the retained self-energy vector.
            let self_energy = coupling.diag().to_owned();
            coupling.mapv_inplace(|g| -g);
            for i in 0..n {
                coupling[[i, i]] = Complex64::new(0.0, 0.0);
            }
            let drive = problem.driving_vector(params);
            let evaluator =
                rhs::MeanFieldRhs::new(&coupling, &self_energy, &drive, params.gamma, n, backend);
            let mut scratch = rhs::MeanFieldScratch::new(n);
            dopri::integrate(
                |t, y, dy| evaluator.eval(t, y, dy, &mut scratch),
                t_span,
                initial_state,
                options,
            )
        }
    }
}
