use bon::Builder;

/// Accuracy controls for the adaptive quadrature underlying [`hmp`] and the
/// Landau density evaluation.
///
/// An integration stops once its summed error estimate drops below
/// `max(abs_tol, rel_tol * |result|)`, and fails with
/// [`HmpError::QuadratureError`] if that does not happen within
/// `max_subdivisions` segments. The defaults are tuned so the nested HMP
/// integration reproduces reference values to better than 1e-4 while staying
/// well clear of the subdivision limit on moderate inputs.
///
/// In the nested integration both levels share one config, so the total
/// number of integrand evaluations is bounded by `(15 * max_subdivisions)^2`.
///
/// [`hmp`]: crate::hmp()
/// [`HmpError::QuadratureError`]: crate::HmpError::QuadratureError
#[derive(Debug, Clone, Copy, Builder)]
pub struct QuadConfig {
    /// Absolute error tolerance for each integration.
    #[builder(default = 1e-12)]
    pub abs_tol: f64,
    /// Relative error tolerance for each integration.
    #[builder(default = 1e-7)]
    pub rel_tol: f64,
    /// Maximum number of segments an integration may be split into.
    #[builder(default = 512)]
    pub max_subdivisions: usize,
}

impl Default for QuadConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
