pub mod adaptive;
pub mod gauss_kronrod;
pub mod gauss_legendre;

pub use adaptive::{AdaptiveGaussKronrod, AdaptiveSettings};
pub use gauss_kronrod::{GaussKronrodEstimate, GaussKronrodRule};
pub use gauss_legendre::GaussLegendre;

use crate::domain::{Categorized, ErrorCategory, KpolError, classify};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntegrationRange {
    Finite { lower: f64, upper: f64 },
    /// `[lower, +inf)`
    UpperUnbounded { lower: f64 },
    /// `(-inf, upper]`
    LowerUnbounded { upper: f64 },
    Unbounded,
}

impl IntegrationRange {
    pub const fn finite(lower: f64, upper: f64) -> Self {
        Self::Finite { lower, upper }
    }

    pub const fn to_infinity(lower: f64) -> Self {
        Self::UpperUnbounded { lower }
    }

    pub const fn from_negative_infinity(upper: f64) -> Self {
        Self::LowerUnbounded { upper }
    }

    pub fn validate(&self) -> Result<(), QuadratureError> {
        let (lower, upper) = match *self {
            Self::Finite { lower, upper } => (lower, upper),
            Self::UpperUnbounded { lower } => (lower, f64::INFINITY),
            Self::LowerUnbounded { upper } => (f64::NEG_INFINITY, upper),
            Self::Unbounded => return Ok(()),
        };

        let lower_ok = lower.is_finite() || matches!(self, Self::LowerUnbounded { .. });
        let upper_ok = upper.is_finite() || matches!(self, Self::UpperUnbounded { .. });
        if !lower_ok || !upper_ok {
            return Err(QuadratureError::InvalidRange { lower, upper });
        }
        Ok(())
    }

    /// Bounds of the integration parameter after substitution.
    pub fn parameter_bounds(&self) -> (f64, f64) {
        match *self {
            Self::Finite { lower, upper } => (lower, upper),
            Self::UpperUnbounded { .. } | Self::LowerUnbounded { .. } => (0.0, 1.0),
            Self::Unbounded => (-1.0, 1.0),
        }
    }

    /// Maps the parameter `t` to `(x(t), dx/dt)`.
    pub fn substitute(&self, t: f64) -> (f64, f64) {
        match *self {
            Self::Finite { .. } => (t, 1.0),
            Self::UpperUnbounded { lower } => {
                let complement = 1.0 - t;
                (lower + t / complement, 1.0 / (complement * complement))
            }
            Self::LowerUnbounded { upper } => (upper - (1.0 - t) / t, 1.0 / (t * t)),
            Self::Unbounded => {
                let complement = 1.0 - t * t;
                (
                    t / complement,
                    (1.0 + t * t) / (complement * complement),
                )
            }
        }
    }

    /// Integrand in the substituted parameter. At the mapped end points the
    /// jacobian overflows; the integrand is taken to vanish there.
    pub fn transform<'a>(&'a self, integrand: &'a dyn Fn(f64) -> f64) -> impl Fn(f64) -> f64 + 'a {
        move |t| {
            let (x, jacobian) = self.substitute(t);
            if !x.is_finite() || !jacobian.is_finite() {
                return 0.0;
            }
            integrand(x) * jacobian
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureValue {
    pub value: f64,
    /// Absolute error estimate; fixed-node rules report `0.0`.
    pub error: f64,
    pub evaluations: usize,
    pub subdivisions: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuadratureError {
    #[error("integration range [{lower}, {upper}] must have finite bounds where bounded")]
    InvalidRange { lower: f64, upper: f64 },
    #[error("quadrature tolerances must be finite and >= 0 with one > 0, got abs={absolute}, rel={relative}")]
    InvalidTolerance { absolute: f64, relative: f64 },
    #[error("quadrature requires at least one subdivision, got {limit}")]
    InvalidSubdivisionLimit { limit: usize },
    #[error("gauss-legendre rule requires at least 1 node, got {nodes}")]
    InvalidNodeCount { nodes: usize },
    #[error("integrand is not finite on parameter interval [{lower}, {upper}]")]
    NonFiniteIntegrand { lower: f64, upper: f64 },
    #[error(
        "quadrature did not converge after {subdivisions} subdivisions: value={value}, error={error}, tolerance={tolerance}"
    )]
    NotConverged {
        value: f64,
        error: f64,
        tolerance: f64,
        subdivisions: usize,
    },
    #[error("quadrature hit round-off limit at parameter {at}: value={value}, error={error}")]
    RoundoffLimited { value: f64, error: f64, at: f64 },
}

impl Categorized for QuadratureError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRange { .. }
            | Self::InvalidTolerance { .. }
            | Self::InvalidSubdivisionLimit { .. }
            | Self::InvalidNodeCount { .. } => ErrorCategory::Configuration,
            Self::NonFiniteIntegrand { .. }
            | Self::NotConverged { .. }
            | Self::RoundoffLimited { .. } => ErrorCategory::NumericalFailure,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "CONFIG.QUADRATURE_RANGE",
            Self::InvalidTolerance { .. } => "CONFIG.QUADRATURE_TOLERANCE",
            Self::InvalidSubdivisionLimit { .. } => "CONFIG.QUADRATURE_LIMIT",
            Self::InvalidNodeCount { .. } => "CONFIG.QUADRATURE_NODES",
            Self::NonFiniteIntegrand { .. } => "NUMERIC.NON_FINITE_INTEGRAND",
            Self::NotConverged { .. } => "NUMERIC.QUADRATURE_DIVERGED",
            Self::RoundoffLimited { .. } => "NUMERIC.QUADRATURE_ROUNDOFF",
        }
    }
}

impl From<QuadratureError> for KpolError {
    fn from(error: QuadratureError) -> Self {
        classify(error)
    }
}

/// A rule that integrates a real function of one real variable.
pub trait Quadrature {
    fn integrate(
        &self,
        integrand: &dyn Fn(f64) -> f64,
        range: IntegrationRange,
    ) -> Result<QuadratureValue, QuadratureError>;
}

#[cfg(test)]
mod tests {
    use super::{IntegrationRange, QuadratureError};

    #[test]
    fn substitution_maps_parameter_ends_onto_range() {
        let range = IntegrationRange::to_infinity(2.0);
        assert_eq!(range.parameter_bounds(), (0.0, 1.0));
        assert_eq!(range.substitute(0.0), (2.0, 1.0));
        let (x, jacobian) = range.substitute(0.5);
        assert_eq!(x, 3.0);
        assert_eq!(jacobian, 4.0);

        let range = IntegrationRange::from_negative_infinity(1.0);
        let (x, jacobian) = range.substitute(0.5);
        assert_eq!(x, 0.0);
        assert_eq!(jacobian, 4.0);

        let (x, _) = IntegrationRange::Unbounded.substitute(0.0);
        assert_eq!(x, 0.0);
    }

    #[test]
    fn transform_vanishes_where_jacobian_overflows() {
        let range = IntegrationRange::to_infinity(0.0);
        let integrand = |_x: f64| 1.0;
        let transformed = range.transform(&integrand);
        assert_eq!(transformed(1.0), 0.0);
        assert_eq!(transformed(0.0), 1.0);
    }

    #[test]
    fn validate_rejects_non_finite_bounds() {
        assert_eq!(
            IntegrationRange::finite(0.0, f64::INFINITY).validate(),
            Err(QuadratureError::InvalidRange {
                lower: 0.0,
                upper: f64::INFINITY,
            })
        );
        assert!(IntegrationRange::to_infinity(f64::NAN).validate().is_err());
        assert!(IntegrationRange::to_infinity(1.0).validate().is_ok());
        assert!(IntegrationRange::Unbounded.validate().is_ok());
    }
}
