use thiserror::Error;

/// The ways a weight set can fail validation against its p-value set.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WeightViolation {
    #[error("{weights} weights supplied for {pvalues} p-values")]
    LengthMismatch { weights: usize, pvalues: usize },
    #[error("negative weight {0}")]
    Negative(f64),
    #[error("weights sum to {0}, expected 1")]
    SumNotOne(f64),
}

/// Errors raised by the p-value combiners and their quadrature engine.
///
/// All variants are synchronous precondition or convergence failures; no
/// operation retries internally or returns a partial result.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HmpError {
    /// No p-values were supplied.
    #[error("no p-values supplied")]
    EmptyInput,
    /// An operation requiring comparison across tests received fewer than two.
    #[error("{0} p-value(s) supplied where at least two are required")]
    InsufficientValues(usize),
    /// The weight set is mismatched, negative, or does not sum to 1.
    #[error("invalid weights: {0}")]
    InvalidWeights(WeightViolation),
    /// A p-value lies outside (0, 1].
    #[error("p-value {0} lies outside (0, 1]")]
    DomainError(f64),
    /// Numerical integration failed to reach tolerance within the configured
    /// subdivision limit.
    #[error("quadrature failed to converge: residual error {residual:e} after {subdivisions} subdivisions")]
    QuadratureError { residual: f64, subdivisions: usize },
}
