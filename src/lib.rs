//! harmonicp: Harmonic Mean P-Value Combination
//!
//! This library combines a collection of p-values into a single significance
//! measure using the harmonic mean p-value method (Wilson 2019), which is
//! robust to dependence between the individual tests.
//!
//! The main components of this library are:
//! - `combine`: The raw weighted harmonic mean statistic
//! - `upper_bound`: A conservative Vovk-Wang worst-case bound on significance
//! - `hmp`: The asymptotically exact combined p-value via the Landau
//!   distribution
//! - `QuadConfig`: Configuration for the adaptive quadrature tolerances
//!
//! The Landau density has no closed form; it is evaluated from its defining
//! oscillatory improper integral with adaptive Gauss-Kronrod quadrature, and
//! `hmp` integrates that density again over an infinite domain. Failures to
//! converge surface as [`HmpError::QuadratureError`] rather than a silent
//! wrong value.

mod combine;
mod config;
mod error;
mod hmp;
mod landau;
mod quad;

pub use combine::{combine, upper_bound};
pub use config::QuadConfig;
pub use error::{HmpError, WeightViolation};
pub use hmp::{hmp, hmp_with_config};
