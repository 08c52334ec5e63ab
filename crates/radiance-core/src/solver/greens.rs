//! Scalar Green's function for radiation-mediated atom-atom coupling.
//!
//! In the scalar (polarisation-averaged) model the coupling between two
//! atoms separated by a distance $R$ is
//!
//! $$
//! G(R) = -\frac{\Gamma}{2} \frac{e^{i k_0 R}}{i k_0 R}
//! $$
//!
//! and each atom's self-energy is $i\Delta - \Gamma/2$: the laser detuning
//! shifts the rotating-frame phase while spontaneous emission damps the
//! coherence at half the population decay rate.

use num_complex::Complex64;

/// Scalar pairwise coupling between two atoms at distance `distance`.
///
/// # Arguments
/// * `distance` - Separation between the two atoms. Must be strictly
///   positive; a zero distance divides by zero and yields a non-finite
///   entry. Distinct atom positions are a caller precondition.
/// * `gamma` - Single-atom linewidth Γ.
/// * `k0` - Wavenumber of the driving light.
pub fn scalar_coupling(distance: f64, gamma: f64, k0: f64) -> Complex64 {
    let ikr = Complex64::new(0.0, k0 * distance);
    -(gamma / 2.0) * ikr.exp() / ikr
}

/// Diagonal self-energy `iΔ − Γ/2` of every atom.
pub fn self_energy(detuning: f64, gamma: f64) -> Complex64 {
    Complex64::new(-gamma / 2.0, detuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_coupling_against_closed_form() {
        // e^{ix}/(ix) = sin(x)/x - i cos(x)/x
        let gamma = 1.0;
        let k0 = 1.0;
        for &r in &[0.1, 0.5, 1.0, 2.5, 10.0] {
            let x: f64 = k0 * r;
            let expected_re = -(gamma / 2.0) * x.sin() / x;
            let expected_im = (gamma / 2.0) * x.cos() / x;
            let g = scalar_coupling(r, gamma, k0);
            assert_abs_diff_eq!(g.re, expected_re, epsilon = 1e-14);
            assert_abs_diff_eq!(g.im, expected_im, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_coupling_at_zero_distance_is_not_finite() {
        let g = scalar_coupling(0.0, 1.0, 1.0);
        assert!(!g.is_finite());
    }

    #[test]
    fn test_self_energy_components() {
        let s = self_energy(2.5, 1.0);
        assert_abs_diff_eq!(s.re, -0.5, epsilon = 0.0);
        assert_abs_diff_eq!(s.im, 2.5, epsilon = 0.0);
    }
}
