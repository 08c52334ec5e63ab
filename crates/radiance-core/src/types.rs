//! Core types shared across the radiance framework.
//!
//! This module defines the fundamental data structures used throughout the
//! simulation pipeline: the atomic ensemble, the driving laser, and the
//! physical constants that parameterise every solver call.

use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Physical constants of the atom-light system.
///
/// Passed explicitly into every builder and derivative evaluation; the crate
/// holds no global physical state. The defaults correspond to natural units
/// where the single-atom linewidth and the light wavenumber are both 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicalParams {
    /// Natural excited-state decay rate Γ of a single atom.
    pub gamma: f64,
    /// Wavenumber k₀ of the driving light field.
    pub k0: f64,
}

impl Default for PhysicalParams {
    fn default() -> Self {
        Self { gamma: 1.0, k0: 1.0 }
    }
}

/// An ensemble of point-like atomic scatterers.
///
/// Positions are fixed for the duration of a solve or evolution call.
/// Distinct positions are a precondition for every coupling computation:
/// coincident atoms produce a zero pairwise distance and an undefined
/// (division-by-zero) coupling entry, which is deliberately not guarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomEnsemble {
    positions: Vec<[f64; 3]>,
}

impl AtomEnsemble {
    /// Create an ensemble from explicit 3-D positions.
    pub fn new(positions: Vec<[f64; 3]>) -> Self {
        Self { positions }
    }

    /// Number of atoms in the ensemble.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Atom positions, one `[x, y, z]` triple per atom.
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    /// The N×N matrix of pairwise distances.
    ///
    /// Symmetric with a zero diagonal. This is the geometric input consumed
    /// by the interaction matrix builder.
    pub fn distance_matrix(&self) -> Array2<f64> {
        let n = self.positions.len();
        let mut distances = Array2::<f64>::zeros((n, n));
        for j in 0..n {
            for k in (j + 1)..n {
                let a = &self.positions[j];
                let b = &self.positions[k];
                let dx = a[0] - b[0];
                let dy = a[1] - b[1];
                let dz = a[2] - b[2];
                let r = (dx * dx + dy * dy + dz * dz).sqrt();
                distances[[j, k]] = r;
                distances[[k, j]] = r;
            }
        }
        distances
    }
}

/// Spatial profile of the driving field.
///
/// Collaborating code defines the laser mode (Gaussian beams, structured
/// light, ...) by implementing this trait; the core only ever asks for the
/// complex field amplitude at an atom's position.
pub trait DriveProfile: Send + Sync {
    /// Complex field amplitude at `position` for wavenumber `k0`.
    fn amplitude_at(&self, position: &[f64; 3], k0: f64) -> Complex64;
}

/// Plane-wave drive.
///
/// $E(\mathbf{r}) = E_0 \exp(i k_0 \hat{\mathbf{k}} \cdot \mathbf{r})$
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneWave {
    /// Propagation direction (unit vector).
    pub direction: [f64; 3],
    /// Field amplitude E₀.
    pub amplitude: f64,
}

impl Default for PlaneWave {
    fn default() -> Self {
        Self {
            direction: [0.0, 0.0, 1.0],
            amplitude: 1.0,
        }
    }
}

impl DriveProfile for PlaneWave {
    fn amplitude_at(&self, position: &[f64; 3], k0: f64) -> Complex64 {
        let kdotr = k0
            * (self.direction[0] * position[0]
                + self.direction[1] * position[1]
                + self.direction[2] * position[2]);
        self.amplitude * Complex64::new(0.0, kdotr).exp()
    }
}

/// The driving laser: a detuning from atomic resonance plus a spatial
/// profile projecting the field onto each atom.
#[derive(Clone)]
pub struct Laser {
    /// Frequency offset Δ of the laser from the atomic transition.
    pub detuning: f64,
    profile: Arc<dyn DriveProfile>,
}

impl Laser {
    pub fn new(detuning: f64, profile: Arc<dyn DriveProfile>) -> Self {
        Self { detuning, profile }
    }

    /// Convenience constructor: unit-amplitude plane wave along z.
    pub fn plane_wave(detuning: f64) -> Self {
        Self::new(detuning, Arc::new(PlaneWave::default()))
    }

    /// Project the laser onto a single position.
    pub fn amplitude_at(&self, position: &[f64; 3], k0: f64) -> Complex64 {
        self.profile.amplitude_at(position, k0)
    }
}
