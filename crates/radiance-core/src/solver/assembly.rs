//! Interaction matrix assembly and laser projection.
//!
//! Constructs the N×N complex interaction matrix G where entry (j, k) is:
//!
//! - Diagonal (j = k): the self-energy `iΔ − Γ/2`.
//! - Off-diagonal (j ≠ k): the scalar Green's function of the pairwise
//!   distance R_jk.
//!
//! Every entry depends only on read-only geometry and constants, so the fill
//! is a data-parallel map over index pairs routed through the compute
//! backend; the only synchronisation is the final join.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use radiance_compute::ComputeBackend;

use super::{greens, SolverError};
use crate::types::{AtomEnsemble, Laser, PhysicalParams};

/// Assemble the scalar-model interaction matrix.
///
/// # Arguments
/// * `atoms` - Ensemble of N ≥ 1 atoms at pairwise-distinct positions.
/// * `detuning` - Laser detuning Δ entering the diagonal self-energy.
/// * `params` - Physical constants Γ and k₀.
/// * `backend` - Compute backend performing the parallel entry fill.
///
/// Coincident atoms are not guarded: a zero pairwise distance produces a
/// non-finite coupling entry.
pub fn scalar_interaction_matrix(
    atoms: &AtomEnsemble,
    detuning: f64,
    params: &PhysicalParams,
    backend: &dyn ComputeBackend,
) -> Result<Array2<Complex64>, SolverError> {
    if atoms.is_empty() {
        return Err(SolverError::InvalidGeometry("No atoms provided".into()));
    }

    let n = atoms.len();
    let distances = atoms.distance_matrix();
    let diagonal = greens::self_energy(detuning, params.gamma);
    let gamma = params.gamma;
    let k0 = params.k0;

    let fill = move |j: usize, k: usize| -> Complex64 {
        if j == k {
            diagonal
        } else {
            greens::scalar_coupling(distances[[j, k]], gamma, k0)
        }
    };

    Ok(backend.parallel_matrix_fill(n, n, &fill)?)
}

/// Project the laser onto each atom, producing the length-N driving vector.
pub fn driving_vector(atoms: &AtomEnsemble, laser: &Laser, k0: f64) -> Array1<Complex64> {
    atoms
        .positions()
        .iter()
        .map(|position| laser.amplitude_at(position, k0))
        .collect()
}
