//! # Radiance Compute
//!
//! Compute backend abstraction for the radiance simulator. This crate
//! provides a [`ComputeBackend`](backend::ComputeBackend) trait that isolates
//! the physics code from device-specific execution details: the coupling
//! matrix fill is a data-parallel map over index pairs, and the evolution
//! hot path needs a dense matrix-vector product that writes into a
//! caller-owned buffer.
//!
//! ## Available backends
//!
//! | Backend | Feature flag | Status |
//! |---------|-------------|--------|
//! | CPU (Rayon) | `cpu` (default) | Implemented |

pub mod backend;

#[cfg(feature = "cpu")]
pub mod cpu;

pub use backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};

#[cfg(feature = "cpu")]
pub use cpu::CpuBackend;
