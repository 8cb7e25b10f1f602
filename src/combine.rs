use std::f64::consts::E;

use itertools::Itertools;

use crate::error::{HmpError, WeightViolation};

/// Absolute tolerance for the weight-sum check.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-8;

/// Computes the weighted harmonic mean of a set of p-values.
///
/// This is the raw harmonic mean p-value statistic; prefer [`hmp`] for an
/// asymptotically exact combined test, or [`upper_bound`] for a quick
/// conservative screen.
///
/// When `weights` is `None`, uniform weights `1/L` are used. Supplied weights
/// must match the p-values in length, be non-negative, and sum to 1 within
/// 1e-8. Every p-value must lie in `(0, 1]`; zero is rejected rather than
/// collapsing the statistic through an infinite reciprocal.
///
/// [`hmp`]: crate::hmp()
/// [`upper_bound`]: crate::upper_bound
pub fn combine(p_values: &[f64], weights: Option<&[f64]>) -> Result<f64, HmpError> {
    if p_values.is_empty() {
        return Err(HmpError::EmptyInput);
    }
    for &p in p_values {
        if !(p > 0.0 && p <= 1.0) {
            return Err(HmpError::DomainError(p));
        }
    }

    let denominator = match weights {
        Some(weights) => {
            validate_weights(weights, p_values.len())?;
            weights
                .iter()
                .zip_eq(p_values)
                .map(|(weight, p)| weight / p)
                .sum::<f64>()
        }
        None => {
            let uniform = 1.0 / p_values.len() as f64;
            p_values.iter().map(|p| uniform / p).sum::<f64>()
        }
    };

    Ok(1.0 / denominator)
}

/// Computes a worst-case combined p-value bound from the harmonic mean.
///
/// The harmonic mean p-value is never more anti-conservative than a factor of
/// `e * ln(L)` (Vovk & Wang 2020), so `combine * e * ln(L)` bounds the true
/// significance. The bound is only defined for two or more p-values and is
/// not itself guaranteed to lie below 1.
pub fn upper_bound(p_values: &[f64], weights: Option<&[f64]>) -> Result<f64, HmpError> {
    let count = p_values.len();
    if count < 2 {
        return Err(HmpError::InsufficientValues(count));
    }
    let harmonic_mean = combine(p_values, weights)?;
    Ok(harmonic_mean * E * (count as f64).ln())
}

fn validate_weights(weights: &[f64], expected: usize) -> Result<(), HmpError> {
    if weights.len() != expected {
        return Err(HmpError::InvalidWeights(WeightViolation::LengthMismatch {
            weights: weights.len(),
            pvalues: expected,
        }));
    }
    for &weight in weights {
        if !(weight >= 0.0) {
            return Err(HmpError::InvalidWeights(WeightViolation::Negative(weight)));
        }
    }
    let sum = weights.iter().sum::<f64>();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(HmpError::InvalidWeights(WeightViolation::SumNotOne(sum)));
    }
    Ok(())
}
