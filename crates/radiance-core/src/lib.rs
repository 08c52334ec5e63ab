//! # Radiance Core
//!
//! The numerical backbone of the radiance framework: the optical response of
//! an ensemble of point-like atomic scatterers driven by a laser field.
//!
//! ## Models
//!
//! Two models are supported, selected by the [`problem::ModelKind`] of a
//! [`problem::Problem`]:
//!
//! - **Linear scalar**: each atom carries one dipole coherence; the coupled
//!   equations are linear in the state and the steady state is a direct
//!   dense solve.
//! - **Nonlinear mean-field**: each atom carries a coherence and a
//!   population variable; the equations are nonlinear and the steady state
//!   is defined as the endpoint of a bounded time evolution.
//!
//! ## Modules
//!
//! - [`types`] — Ensemble, laser, and physical constants.
//! - [`problem`] — Model dispatch, interaction matrix, initial conditions.
//! - [`solver`] — Green's function, parallel matrix assembly, steady states.
//! - [`evolution`] — Adaptive time evolution and the derivative evaluators.
//!
//! Heavy entry-wise and matrix-vector work is routed through the
//! [`radiance_compute::ComputeBackend`] trait so execution stays
//! configurable.

pub mod evolution;
pub mod problem;
pub mod solver;
pub mod types;

pub use evolution::{time_evolution, Evolution, EvolutionOptions};
pub use problem::{LinearModel, ModelKind, NonLinearModel, Problem};
pub use solver::steady::{steady_state, steady_state_with, DEFAULT_NONLINEAR_HORIZON};
pub use solver::SolverError;
pub use types::{AtomEnsemble, DriveProfile, Laser, PhysicalParams, PlaneWave};
