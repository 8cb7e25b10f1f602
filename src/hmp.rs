use std::f64::consts::FRAC_PI_2;

use crate::{
    combine::combine, config::QuadConfig, error::HmpError, landau::landau_density,
    quad::integrate_to_infinity,
};

/// Combines p-values into an asymptotically exact harmonic mean p-value.
///
/// The harmonic statistic from [`combine`] is transformed through the Landau
/// distribution with `mu = ln(L) + 0.874` and `sigma = pi/2`, integrating the
/// density from `1/statistic` to infinity (Wilson 2019).
///
/// The result targets `[0, 1]` but is not clamped: quadrature error of up to
/// roughly 1e-4 can carry it past either end, and for `L = 1` the transform
/// degenerates and routinely exceeds 1. Uses default quadrature settings; see
/// [`hmp_with_config`] to tune them.
///
/// This is a doubly nested numerical integration: every outer evaluation runs
/// a full inner integration, so cost is the product of the two evaluation
/// counts. Moderate inputs complete in a few thousand integrand evaluations.
pub fn hmp(p_values: &[f64], weights: Option<&[f64]>) -> Result<f64, HmpError> {
    hmp_with_config(p_values, weights, &QuadConfig::default())
}

/// [`hmp`] with explicit quadrature tolerances and subdivision limit, applied
/// to both nesting levels.
pub fn hmp_with_config(
    p_values: &[f64],
    weights: Option<&[f64]>,
    config: &QuadConfig,
) -> Result<f64, HmpError> {
    let harmonic_mean = combine(p_values, weights)?;

    let count = p_values.len() as f64;
    let mu = count.ln() + 0.874;
    let sigma = FRAC_PI_2;

    integrate_to_infinity(
        |x| landau_density(x, mu, sigma, config),
        harmonic_mean.recip(),
        &[],
        config,
    )
}
