//! Right-hand-side evaluators for the coupled dipole equations.
//!
//! These are the hot path of every time evolution: the adaptive stepper
//! calls them on the order of tens of thousands of times per run under
//! tight tolerances, so both evaluators write their derivative into a
//! caller-owned buffer and allocate nothing. The dominant O(N²) cost, the
//! dense coupling mat-vec, is routed through the compute backend so that a
//! parallel implementation stays configurable rather than hard-wired.

use ndarray::{s, Array1, Array2};
use num_complex::Complex64;

use radiance_compute::ComputeBackend;

use crate::solver::SolverError;

/// Linear scalar model derivative: `du/dt = G·u + Ω′`.
///
/// Both `G` and the driving term `Ω′ = −(i/2)·Ωₙ` are fixed for the whole
/// integration and are computed once before the run — nothing is rebuilt
/// per step.
pub(crate) struct LinearRhs<'a> {
    coupling: &'a Array2<Complex64>,
    drive_term: &'a Array1<Complex64>,
    backend: &'a dyn ComputeBackend,
}

impl<'a> LinearRhs<'a> {
    pub fn new(
        coupling: &'a Array2<Complex64>,
        drive_term: &'a Array1<Complex64>,
        backend: &'a dyn ComputeBackend,
    ) -> Self {
        Self {
            coupling,
            drive_term,
            backend,
        }
    }

    pub fn eval(
        &self,
        _t: f64,
        u: &Array1<Complex64>,
        du: &mut Array1<Complex64>,
    ) -> Result<(), SolverError> {
        self.backend.matvec_into(self.coupling, u.view(), du)?;
        *du += self.drive_term;
        Ok(())
    }
}

/// Scratch buffers for the mean-field derivative, allocated once per
/// integration run and threaded through every call.
pub(crate) struct MeanFieldScratch {
    /// Coupling product G·β.
    coupled: Array1<Complex64>,
    /// Effective drive Wₙ = Ωₙ/2 − i·(G·β)ₙ.
    effective_drive: Array1<Complex64>,
}

impl MeanFieldScratch {
    pub fn new(n_atoms: usize) -> Self {
        Self {
            coupled: Array1::zeros(n_atoms),
            effective_drive: Array1::zeros(n_atoms),
        }
    }
}

/// Mean-field two-level derivative.
///
/// The state splits into coherences β = u[..N] and populations z = u[N..].
/// With the coupling matrix pre-negated and its diagonal pre-zeroed (so the
/// mat-vec already excludes self-coupling), each evaluation computes
///
/// ```text
/// Wₙ      = Ωₙ/2 − i·(G·β)ₙ
/// dβₙ/dt  = (iΔ − Γ/2)·βₙ + i·Wₙ·zₙ
/// dzₙ/dt  = −Γ·(1 + zₙ) − 4·Im(βₙ·Wₙ*)
/// ```
///
/// where `iΔ − Γ/2` is supplied by the self-energy vector retained when the
/// diagonal was removed from the coupling matrix.
pub(crate) struct MeanFieldRhs<'a> {
    /// Negated scalar coupling with zeroed diagonal.
    coupling: &'a Array2<Complex64>,
    /// The removed diagonal, `iΔ − Γ/2` per atom.
    self_energy: &'a Array1<Complex64>,
    /// Driving vector Ωₙ.
    drive: &'a Array1<Complex64>,
    gamma: f64,
    n_atoms: usize,
    backend: &'a dyn ComputeBackend,
}

impl<'a> MeanFieldRhs<'a> {
    pub fn new(
        coupling: &'a Array2<Complex64>,
        self_energy: &'a Array1<Complex64>,
        drive: &'a Array1<Complex64>,
        gamma: f64,
        n_atoms: usize,
        backend: &'a dyn ComputeBackend,
    ) -> Self {
        Self {
            coupling,
            self_energy,
            drive,
            gamma,
            n_atoms,
            backend,
        }
    }

    pub fn eval(
        &self,
        _t: f64,
        u: &Array1<Complex64>,
        du: &mut Array1<Complex64>,
        scratch: &mut MeanFieldScratch,
    ) -> Result<(), SolverError> {
        let n = self.n_atoms;
        let beta = u.slice(s![..n]);

        self.backend
            .matvec_into(self.coupling, beta, &mut scratch.coupled)?;

        for i in 0..n {
            scratch.effective_drive[i] =
                0.5 * self.drive[i] - Complex64::i() * scratch.coupled[i];
        }

        for i in 0..n {
            let beta_i = u[i];
            let z_i = u[n + i];
            let w_i = scratch.effective_drive[i];
            du[i] = self.self_energy[i] * beta_i + Complex64::i() * w_i * z_i;
            let pump = 4.0 * (beta_i * w_i.conj()).im;
            du[n + i] = -self.gamma * (z_i + 1.0) - pump;
        }

        Ok(())
    }
}
