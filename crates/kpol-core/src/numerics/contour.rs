use super::derivative::{DerivativeError, central_derivative};
use super::quadrature::{
    AdaptiveGaussKronrod, AdaptiveSettings, GaussLegendre, IntegrationRange, Quadrature,
    QuadratureError,
};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourIntegral {
    pub value: Complex64,
    pub real_error: f64,
    pub imag_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrationStrategy {
    /// Fixed-node rule for smooth integrands.
    GaussLegendre { nodes: usize },
    /// Adaptive bisection when peaked or singular behaviour is expected.
    Adaptive(AdaptiveSettings),
}

impl Default for IntegrationStrategy {
    fn default() -> Self {
        Self::Adaptive(AdaptiveSettings::default())
    }
}

impl IntegrationStrategy {
    pub const fn gauss_legendre() -> Self {
        Self::GaussLegendre {
            nodes: GaussLegendre::DEFAULT_NODES,
        }
    }
}

/// Integrates `curve(t)` over `range`.
pub fn integrate_curve<C, Q>(
    curve: C,
    range: IntegrationRange,
    engine: &Q,
) -> Result<ContourIntegral, QuadratureError>
where
    C: Fn(f64) -> Complex64,
    Q: Quadrature + ?Sized,
{
    let real = engine.integrate(&|t: f64| curve(t).re, range)?;
    let imag = engine.integrate(&|t: f64| curve(t).im, range)?;
    Ok(ContourIntegral {
        value: Complex64::new(real.value, imag.value),
        real_error: real.error,
        imag_error: imag.error,
    })
}

/// Integrates `function` along `curve`, i.e. `integral function(curve(t)) curve'(t) dt`.
pub fn integrate_along<F, C, D, Q>(
    function: F,
    curve: C,
    curve_derivative: D,
    range: IntegrationRange,
    engine: &Q,
) -> Result<ContourIntegral, QuadratureError>
where
    F: Fn(Complex64) -> Complex64,
    C: Fn(f64) -> Complex64,
    D: Fn(f64) -> Complex64,
    Q: Quadrature + ?Sized,
{
    integrate_curve(
        |t| function(curve(t)) * curve_derivative(t),
        range,
        engine,
    )
}

pub fn complex_integration<C>(
    curve: C,
    range: IntegrationRange,
    strategy: IntegrationStrategy,
) -> Result<Complex64, QuadratureError>
where
    C: Fn(f64) -> Complex64,
{
    let integral = match strategy {
        IntegrationStrategy::GaussLegendre { nodes } => {
            integrate_curve(curve, range, &GaussLegendre::new(nodes)?)?
        }
        IntegrationStrategy::Adaptive(settings) => {
            integrate_curve(curve, range, &AdaptiveGaussKronrod::new(settings)?)?
        }
    };
    Ok(integral.value)
}

/// Central-difference derivative of `curve` at `t`, part by part.
pub fn curve_derivative<C>(curve: C, t: f64, step: f64) -> Result<Complex64, DerivativeError>
where
    C: Fn(f64) -> Complex64,
{
    let real = central_derivative(|x| curve(x).re, t, step)?;
    let imag = central_derivative(|x| curve(x).im, t, step)?;
    Ok(Complex64::new(real.value, imag.value))
}

pub fn real_parts(values: &[Complex64]) -> Vec<f64> {
    values.iter().map(|value| value.re).collect()
}

pub fn imag_parts(values: &[Complex64]) -> Vec<f64> {
    values.iter().map(|value| value.im).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        IntegrationStrategy, complex_integration, curve_derivative, imag_parts, integrate_along,
        integrate_curve, real_parts,
    };
    use crate::numerics::quadrature::{
        AdaptiveGaussKronrod, AdaptiveSettings, GaussLegendre, IntegrationRange, QuadratureError,
    };
    use num_complex::Complex64;
    use std::f64::consts::PI;

    fn unit_circle(t: f64) -> Complex64 {
        Complex64::new(0.0, t).exp()
    }

    #[test]
    fn curve_integral_splits_real_and_imaginary_parts() {
        let engine = AdaptiveGaussKronrod::new(AdaptiveSettings::default()).expect("engine");
        let result = integrate_curve(unit_circle, IntegrationRange::finite(0.0, PI), &engine)
            .expect("half circle");
        assert!(result.value.re.abs() < 1.0e-12);
        assert!((result.value.im - 2.0).abs() < 1.0e-12);
        assert!(result.real_error >= 0.0 && result.imag_error >= 0.0);
    }

    #[test]
    fn contour_integral_of_inverse_picks_up_the_residue() {
        let engine = GaussLegendre::new(64).expect("rule");
        let derivative = |t: f64| Complex64::i() * unit_circle(t);
        let range = IntegrationRange::finite(0.0, 2.0 * PI);

        let residue = integrate_along(|z: Complex64| 1.0 / z, unit_circle, derivative, range, &engine)
            .expect("inverse");
        assert!((residue.value - Complex64::new(0.0, 2.0 * PI)).norm() < 1.0e-12);

        let regular = integrate_along(|z: Complex64| z * z, unit_circle, derivative, range, &engine)
            .expect("square");
        assert!(regular.value.norm() < 1.0e-12);
    }

    #[test]
    fn both_strategies_handle_infinite_ranges() {
        let curve = |t: f64| Complex64::new(1.0, -2.0) * (-t).exp();
        let range = IntegrationRange::to_infinity(0.0);
        let expected = Complex64::new(1.0, -2.0);

        let fixed = complex_integration(curve, range, IntegrationStrategy::gauss_legendre())
            .expect("gauss-legendre");
        let adaptive =
            complex_integration(curve, range, IntegrationStrategy::default()).expect("adaptive");
        assert!((fixed - expected).norm() < 1.0e-10);
        assert!((adaptive - expected).norm() < 1.0e-7);
    }

    #[test]
    fn invalid_strategy_is_a_quadrature_error() {
        let error = complex_integration(
            unit_circle,
            IntegrationRange::finite(0.0, 1.0),
            IntegrationStrategy::GaussLegendre { nodes: 0 },
        )
        .expect_err("zero nodes");
        assert_eq!(error, QuadratureError::InvalidNodeCount { nodes: 0 });
    }

    #[test]
    fn curve_derivative_and_part_helpers() {
        let t = 0.3;
        let derivative = curve_derivative(unit_circle, t, 1.0e-2).expect("derivative");
        assert!((derivative - Complex64::i() * unit_circle(t)).norm() < 1.0e-9);

        let values = [Complex64::new(1.0, 2.0), Complex64::new(-3.0, 0.5)];
        assert_eq!(real_parts(&values), vec![1.0, -3.0]);
        assert_eq!(imag_parts(&values), vec![2.0, 0.5]);
    }
}
