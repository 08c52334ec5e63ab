//! Steady-state behaviour across both models.

use ndarray::Array1;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use radiance_compute::CpuBackend;
use radiance_core::{steady_state, AtomEnsemble, Laser, PhysicalParams, Problem};

/// Jittered cubic lattice: well separated by construction (spacing 2.0 in
/// units of 1/k0, jitter bounded well below half the spacing).
fn random_cloud(side: usize, seed: u64) -> AtomEnsemble {
    let mut rng = StdRng::seed_from_u64(seed);
    let spacing = 2.0;
    let mut positions = Vec::with_capacity(side * side * side);
    for ix in 0..side {
        for iy in 0..side {
            for iz in 0..side {
                positions.push([
                    spacing * ix as f64 + rng.gen_range(-0.3..0.3),
                    spacing * iy as f64 + rng.gen_range(-0.3..0.3),
                    spacing * iz as f64 + rng.gen_range(-0.3..0.3),
                ]);
            }
        }
    }
    AtomEnsemble::new(positions)
}

#[test]
fn test_linear_steady_state_satisfies_coupled_equations() {
    let backend = CpuBackend::new();
    let params = PhysicalParams::default();

    for seed in [1u64, 7, 42] {
        let atoms = random_cloud(3, seed);
        let problem = Problem::scalar(atoms, Laser::plane_wave(0.6));

        let beta = steady_state(&problem, &params, &backend).unwrap();
        assert_eq!(beta.len(), 27);

        let g = problem.interaction_matrix(&params, &backend).unwrap();
        let omega = problem.driving_vector(&params);
        let rhs: Array1<Complex64> = omega.mapv(|w| Complex64::new(0.0, 0.5) * w);

        let residual = &g.dot(&beta) - &rhs;
        let residual_norm: f64 = residual.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
        let rhs_norm: f64 = rhs.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
        assert!(
            residual_norm < 1e-10 * rhs_norm.max(1.0),
            "residual {:.3e} too large for seed {}",
            residual_norm,
            seed
        );
    }
}

#[test]
fn test_single_atom_linear_steady_state_closed_form() {
    let backend = CpuBackend::new();
    let params = PhysicalParams::default();
    let detuning = 1.3;
    let atoms = AtomEnsemble::new(vec![[0.0, 0.0, 0.0]]);
    let problem = Problem::scalar(atoms, Laser::plane_wave(detuning));

    let beta = steady_state(&problem, &params, &backend).unwrap();

    // G is the 1x1 matrix [iD - 1/2] and Omega = 1 at the origin:
    // beta = (i/2) / (iD - 1/2).
    let expected = Complex64::new(0.0, 0.5) / Complex64::new(-0.5, detuning);
    assert!((beta[0] - expected).norm() < 1e-12);
}

#[test]
fn test_mean_field_steady_state_matches_two_level_saturation() {
    // A single atom reduces to the driven two-level mean-field equations,
    // whose long-time population is z = -1/(1 + s) with
    // s = (Omega^2/2)/(Delta^2 + Gamma^2/4).
    let backend = CpuBackend::new();
    let params = PhysicalParams::default();
    let detuning = 0.5;
    let atoms = AtomEnsemble::new(vec![[0.0, 0.0, 0.0]]);
    let problem = Problem::mean_field(atoms, Laser::plane_wave(detuning));

    let state = steady_state(&problem, &params, &backend).unwrap();
    assert_eq!(state.len(), 2);

    let omega = 1.0_f64;
    let d = detuning * detuning + 0.25;
    let s = (omega * omega / 2.0) / d;
    let z_expected = -1.0 / (1.0 + s);
    let w = omega / 2.0;
    let beta_expected = w * z_expected * Complex64::new(-detuning, 0.5) / d;

    assert!(
        (state[1] - Complex64::new(z_expected, 0.0)).norm() < 1e-6,
        "population {:?} vs expected {}",
        state[1],
        z_expected
    );
    assert!((state[0] - beta_expected).norm() < 1e-6);
}

#[test]
fn test_mean_field_steady_state_populations_stay_physical() {
    let backend = CpuBackend::new();
    let params = PhysicalParams::default();
    let atoms = random_cloud(2, 3);
    let n = atoms.len();
    let problem = Problem::mean_field(atoms, Laser::plane_wave(0.0));

    let state = steady_state(&problem, &params, &backend).unwrap();
    assert_eq!(state.len(), 2 * n);
    for i in 0..n {
        let z = state[n + i];
        assert!(z.re >= -1.0 - 1e-6 && z.re <= 1.0 + 1e-6, "z out of range: {:?}", z);
        assert!(z.im.abs() < 1e-9, "population picked up imaginary part: {:?}", z);
    }
}
