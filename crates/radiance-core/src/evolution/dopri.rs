//! Embedded Dormand-Prince 5(4) stepper over complex state vectors.
//!
//! A purpose-built adaptive integrator for the coupled dipole equations: it
//! is private to the evolution module and works directly on
//! `Array1<Complex64>` so no packing into real vectors is needed. Seven
//! stage buffers are allocated once per run and reused on every step; the
//! first-same-as-last property of the tableau saves one derivative
//! evaluation per accepted step. Step size is controlled by the scaled RMS
//! error of the embedded fourth-order solution.
//!
//! Failure modes are propagated, never papered over: exceeding the step
//! budget or shrinking the step below the floating-point resolution of the
//! current time aborts the run with an error.

use ndarray::Array1;
use num_complex::Complex64;

use super::{Evolution, EvolutionOptions};
use crate::solver::SolverError;

// Dormand-Prince 5(4) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (b2 = b7 = 0).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Error weights: difference between the fifth- and fourth-order solutions.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_SHRINK: f64 = 0.2;
const MAX_GROWTH: f64 = 5.0;

/// Integrate `dy/dt = rhs(t, y)` over `t_span`.
///
/// `rhs` writes the derivative into its output buffer; any error it returns
/// aborts the run immediately.
pub(crate) fn integrate<F>(
    mut rhs: F,
    t_span: (f64, f64),
    y0: Array1<Complex64>,
    options: &EvolutionOptions,
) -> Result<Evolution, SolverError>
where
    F: FnMut(f64, &Array1<Complex64>, &mut Array1<Complex64>) -> Result<(), SolverError>,
{
    let (t0, t_end) = t_span;
    if !t0.is_finite() || !t_end.is_finite() || t_end <= t0 {
        return Err(SolverError::InvalidTimeSpan { t0, t1: t_end });
    }
    validate_options(options)?;

    let dim = y0.len();
    let mut t = t0;
    let mut y = y0;
    let mut h = options.initial_step.min(t_end - t0);

    let mut k1 = Array1::<Complex64>::zeros(dim);
    let mut k2 = Array1::<Complex64>::zeros(dim);
    let mut k3 = Array1::<Complex64>::zeros(dim);
    let mut k4 = Array1::<Complex64>::zeros(dim);
    let mut k5 = Array1::<Complex64>::zeros(dim);
    let mut k6 = Array1::<Complex64>::zeros(dim);
    let mut k7 = Array1::<Complex64>::zeros(dim);
    let mut y_stage = Array1::<Complex64>::zeros(dim);
    let mut y_new = Array1::<Complex64>::zeros(dim);

    let mut times = Vec::new();
    let mut states = Vec::new();
    if options.keep_trajectory {
        times.push(t);
        states.push(y.clone());
    }

    rhs(t, &y, &mut k1)?;

    let mut n_steps = 0usize;
    while t < t_end {
        if n_steps >= options.max_steps {
            return Err(SolverError::StepLimitExceeded {
                t_reached: t,
                max_steps: options.max_steps,
            });
        }
        n_steps += 1;

        let last_step = h >= t_end - t;
        let hs = if last_step { t_end - t } else { h };

        for i in 0..dim {
            y_stage[i] = y[i] + hs * (A21 * k1[i]);
        }
        rhs(t + C2 * hs, &y_stage, &mut k2)?;

        for i in 0..dim {
            y_stage[i] = y[i] + hs * (A31 * k1[i] + A32 * k2[i]);
        }
        rhs(t + C3 * hs, &y_stage, &mut k3)?;

        for i in 0..dim {
            y_stage[i] = y[i] + hs * (A41 * k1[i] + A42 * k2[i] + A43 * k3[i]);
        }
        rhs(t + C4 * hs, &y_stage, &mut k4)?;

        for i in 0..dim {
            y_stage[i] =
                y[i] + hs * (A51 * k1[i] + A52 * k2[i] + A53 * k3[i] + A54 * k4[i]);
        }
        rhs(t + C5 * hs, &y_stage, &mut k5)?;

        for i in 0..dim {
            y_stage[i] = y[i]
                + hs * (A61 * k1[i] + A62 * k2[i] + A63 * k3[i] + A64 * k4[i] + A65 * k5[i]);
        }
        rhs(t + hs, &y_stage, &mut k6)?;

        for i in 0..dim {
            y_new[i] =
                y[i] + hs * (B1 * k1[i] + B3 * k3[i] + B4 * k4[i] + B5 * k5[i] + B6 * k6[i]);
        }
        rhs(t + hs, &y_new, &mut k7)?;

        // Scaled RMS of the embedded error estimate.
        let mut err_sq = 0.0;
        for i in 0..dim {
            let err_i = hs
                * (E1 * k1[i]
                    + E3 * k3[i]
                    + E4 * k4[i]
                    + E5 * k5[i]
                    + E6 * k6[i]
                    + E7 * k7[i]);
            let scale = options.atol + options.rtol * y[i].norm().max(y_new[i].norm());
            let ratio = err_i.norm() / scale;
            err_sq += ratio * ratio;
        }
        let err = (err_sq / dim as f64).sqrt();

        if err <= 1.0 {
            t = if last_step { t_end } else { t + hs };
            std::mem::swap(&mut y, &mut y_new);
            // First-same-as-last: the derivative at the accepted point
            // becomes stage one of the next step.
            std::mem::swap(&mut k1, &mut k7);
            if options.keep_trajectory {
                times.push(t);
                states.push(y.clone());
            }
            let factor = (SAFETY * err.powf(-0.2)).clamp(MIN_SHRINK, MAX_GROWTH);
            h = hs * factor;
        } else {
            h = hs * (SAFETY * err.powf(-0.2)).max(MIN_SHRINK);
        }

        if t < t_end && h <= f64::EPSILON * t.abs().max(1.0) {
            return Err(SolverError::StepUnderflow { t });
        }
    }

    if !options.keep_trajectory {
        times.push(t);
        states.push(y);
    }

    Ok(Evolution { times, states })
}

fn validate_options(options: &EvolutionOptions) -> Result<(), SolverError> {
    if !(options.rtol > 0.0) || !(options.atol > 0.0) {
        return Err(SolverError::InvalidOptions(format!(
            "tolerances must be positive (rtol = {}, atol = {})",
            options.rtol, options.atol
        )));
    }
    if !(options.initial_step > 0.0) {
        return Err(SolverError::InvalidOptions(format!(
            "initial step must be positive (got {})",
            options.initial_step
        )));
    }
    if options.max_steps == 0 {
        return Err(SolverError::InvalidOptions(
            "step limit must be nonzero".into(),
        ));
    }
    Ok(())
}
