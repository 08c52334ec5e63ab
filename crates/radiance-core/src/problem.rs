//! Problem definition and model dispatch.
//!
//! A [`Problem`] bundles an atomic ensemble, a driving laser, and a model
//! kind. The kind is a tagged variant: it selects the coupling matrix
//! builder, the derivative evaluator, and the initial condition for the
//! evolution, with no class hierarchy involved.

use ndarray::{concatenate, Array1, Array2, Axis};
use num_complex::Complex64;

use radiance_compute::ComputeBackend;

use crate::solver::{assembly, SolverError};
use crate::types::{AtomEnsemble, Laser, PhysicalParams};

/// Linear optical models: the induced dipoles respond linearly to the total
/// field and the state is one coherence amplitude per atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearModel {
    /// Scalar (polarisation-averaged) dipole coupling.
    Scalar,
}

/// Nonlinear optical models: the state additionally tracks a population
/// variable per atom and the equations of motion are nonlinear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonLinearModel {
    /// Mean-field two-level atoms (factorised correlations).
    MeanField,
}

/// The model kind of a [`Problem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Linear(LinearModel),
    NonLinear(NonLinearModel),
}

impl ModelKind {
    pub fn is_linear(&self) -> bool {
        matches!(self, ModelKind::Linear(_))
    }

    /// Length of the state vector for an ensemble of `n_atoms` atoms.
    pub fn state_len(&self, n_atoms: usize) -> usize {
        match self {
            ModelKind::Linear(LinearModel::Scalar) => n_atoms,
            ModelKind::NonLinear(NonLinearModel::MeanField) => 2 * n_atoms,
        }
    }
}

/// A fully specified simulation problem: who scatters, what drives them,
/// and which model governs the response.
#[derive(Clone)]
pub struct Problem {
    pub atoms: AtomEnsemble,
    pub laser: Laser,
    pub kind: ModelKind,
}

impl Problem {
    /// Linear scalar-model problem.
    pub fn scalar(atoms: AtomEnsemble, laser: Laser) -> Self {
        Self {
            atoms,
            laser,
            kind: ModelKind::Linear(LinearModel::Scalar),
        }
    }

    /// Nonlinear mean-field problem.
    pub fn mean_field(atoms: AtomEnsemble, laser: Laser) -> Self {
        Self {
            atoms,
            laser,
            kind: ModelKind::NonLinear(NonLinearModel::MeanField),
        }
    }

    /// Length of this problem's state vector.
    pub fn state_len(&self) -> usize {
        self.kind.state_len(self.atoms.len())
    }

    /// Build the N×N complex interaction matrix for this problem.
    ///
    /// Both model kinds share the scalar Green's-function form here: the
    /// diagonal is `iΔ − Γ/2` and the off-diagonal entries depend only on
    /// pairwise distance. The mean-field evolution derives its sign-flipped,
    /// diagonal-free coupling operator from this matrix internally.
    ///
    /// Pure with respect to the problem: repeated calls with unchanged atoms
    /// and laser produce identical matrices.
    pub fn interaction_matrix(
        &self,
        params: &PhysicalParams,
        backend: &dyn ComputeBackend,
    ) -> Result<Array2<Complex64>, SolverError> {
        assembly::scalar_interaction_matrix(&self.atoms, self.laser.detuning, params, backend)
    }

    /// Project the laser onto every atom, producing the driving vector Ωₙ.
    pub fn driving_vector(&self, params: &PhysicalParams) -> Array1<Complex64> {
        assembly::driving_vector(&self.atoms, &self.laser, params.k0)
    }

    /// Canonical initial condition for this problem's model.
    ///
    /// Scalar model: all coherences zero (length N). Mean-field model:
    /// β₀ = 0 and z₀ = 2·β₀·β₀* − 1 = −1, every atom unexcited with no
    /// coherence (length 2N).
    pub fn initial_state(&self) -> Array1<Complex64> {
        let n = self.atoms.len();
        match self.kind {
            ModelKind::Linear(LinearModel::Scalar) => Array1::zeros(n),
            ModelKind::NonLinear(NonLinearModel::MeanField) => {
                let beta0 = Array1::<Complex64>::zeros(n);
                let z0 = beta0.mapv(|b| 2.0 * b * b.conj() - 1.0);
                concatenate![Axis(0), beta0, z0]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Laser;

    fn three_atoms() -> AtomEnsemble {
        AtomEnsemble::new(vec![
            [0.0, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [0.0, 2.0, 1.0],
        ])
    }

    #[test]
    fn test_state_len_per_model() {
        let scalar = Problem::scalar(three_atoms(), Laser::plane_wave(0.0));
        let mean_field = Problem::mean_field(three_atoms(), Laser::plane_wave(0.0));
        assert_eq!(scalar.state_len(), 3);
        assert_eq!(mean_field.state_len(), 6);
    }

    #[test]
    fn test_scalar_initial_state_is_zero() {
        let problem = Problem::scalar(three_atoms(), Laser::plane_wave(0.0));
        let u0 = problem.initial_state();
        assert_eq!(u0.len(), 3);
        assert!(u0.iter().all(|c| c.norm() == 0.0));
    }

    #[test]
    fn test_mean_field_initial_state_is_ground_state() {
        for n in [1usize, 2, 7, 31] {
            let positions = (0..n).map(|i| [i as f64, 0.0, 0.0]).collect();
            let problem =
                Problem::mean_field(AtomEnsemble::new(positions), Laser::plane_wave(0.3));
            let u0 = problem.initial_state();
            assert_eq!(u0.len(), 2 * n);
            for i in 0..n {
                assert_eq!(u0[i], Complex64::new(0.0, 0.0));
                assert_eq!(u0[n + i], Complex64::new(-1.0, 0.0));
            }
        }
    }
}
