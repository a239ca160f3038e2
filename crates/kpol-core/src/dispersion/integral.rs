//! Subtracted dispersion integral over the `K pi` cut.
//!
//! With `p` the subtraction point, `n` the number of subtractions and `N(s)`
//! the rescaled numerator built from both discontinuities,
//!
//! ```text
//! s <  s_th:  A(s) = (s-p)^n / 2pi  int N(x) / ((x-p)^n (x-s)) dx
//! s >= s_th:  A(s) = (s-p)^n / 2pi  int (N(x) - N(s)) / ((x-p)^n (x-s)) dx
//!                    + R(s) / 2pi + i N(s) / 2
//! ```
//!
//! The integrals run from `s_th` to the cutoff, and `R(s)` is the integral of
//! the subtracted `N(s)` term in closed form. The result is divided by the
//! rescaling factor once at the end.

use super::DispersionError;
use super::discontinuity::Discontinuity;
use crate::common::constants::TWO_PI;
use crate::numerics::derivative::central_derivative;
use crate::numerics::quadrature::{
    AdaptiveGaussKronrod, AdaptiveSettings, IntegrationRange, Quadrature,
};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtractionOrder {
    Once,
    Twice,
}

impl SubtractionOrder {
    pub const fn power(self) -> i32 {
        match self {
            Self::Once => 1,
            Self::Twice => 2,
        }
    }
}

impl TryFrom<u32> for SubtractionOrder {
    type Error = DispersionError;

    fn try_from(order: u32) -> Result<Self, Self::Error> {
        match order {
            1 => Ok(Self::Once),
            2 => Ok(Self::Twice),
            _ => Err(DispersionError::UnsupportedSubtractionOrder { order }),
        }
    }
}

/// Which edge of the discontinuity band enters the numerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorMode {
    #[default]
    Central,
    Lower,
    Upper,
}

impl TryFrom<u8> for ErrorMode {
    type Error = DispersionError;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Central),
            1 => Ok(Self::Lower),
            2 => Ok(Self::Upper),
            _ => Err(DispersionError::UnknownErrorMode { mode }),
        }
    }
}

/// Upper limit of the dispersion integral.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Cutoff {
    #[default]
    Unbounded,
    Finite(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegralSettings {
    /// Rescaling of the discontinuities during integration.
    pub multiply: f64,
    pub quadrature: AdaptiveSettings,
}

impl Default for IntegralSettings {
    fn default() -> Self {
        Self {
            multiply: 1.0e3,
            quadrature: AdaptiveSettings::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispersiveIntegral<D> {
    charged: D,
    neutral: D,
    order: SubtractionOrder,
    mode: ErrorMode,
    multiply: f64,
    threshold: f64,
    subtraction_point: f64,
    cutoff: Cutoff,
    engine: AdaptiveGaussKronrod,
}

impl<D: Discontinuity> DispersiveIntegral<D> {
    pub fn new(
        charged: D,
        neutral: D,
        order: SubtractionOrder,
        mode: ErrorMode,
        subtraction_point: f64,
        settings: IntegralSettings,
    ) -> Result<Self, DispersionError> {
        let threshold = charged.threshold();
        let neutral_threshold = neutral.threshold();
        if (threshold - neutral_threshold).abs() > 1.0e-12 * threshold.abs().max(1.0) {
            return Err(DispersionError::ThresholdMismatch {
                charged: threshold,
                neutral: neutral_threshold,
            });
        }
        if !(subtraction_point < threshold) {
            return Err(DispersionError::SubtractionPointNotBelowThreshold {
                subtraction_point,
                threshold,
            });
        }
        if !settings.multiply.is_finite() || settings.multiply <= 0.0 {
            return Err(DispersionError::InvalidMultiplier {
                multiply: settings.multiply,
            });
        }
        let engine = AdaptiveGaussKronrod::new(settings.quadrature)?;

        Ok(Self {
            charged,
            neutral,
            order,
            mode,
            multiply: settings.multiply,
            threshold,
            subtraction_point,
            cutoff: Cutoff::Unbounded,
            engine,
        })
    }

    /// Replaces the upper integration limit. Two subtractions have no closed
    /// form for a finite cutoff and are rejected.
    pub fn with_cutoff(mut self, cutoff: Cutoff) -> Result<Self, DispersionError> {
        if let Cutoff::Finite(limit) = cutoff {
            if !limit.is_finite() || limit <= self.threshold {
                return Err(DispersionError::InvalidCutoff {
                    cutoff: limit,
                    threshold: self.threshold,
                });
            }
            if self.order == SubtractionOrder::Twice {
                return Err(DispersionError::FiniteCutoffWithTwoSubtractions { cutoff: limit });
            }
        }
        self.cutoff = cutoff;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn subtraction_point(&self) -> f64 {
        self.subtraction_point
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    pub fn order(&self) -> SubtractionOrder {
        self.order
    }

    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    pub fn multiply(&self) -> f64 {
        self.multiply
    }

    /// Rescaled sum of both discontinuities, shifted by their uncertainties
    /// according to the error mode.
    pub fn numerator(&self, s: f64) -> f64 {
        let charged = self.charged.value(s);
        let neutral = self.neutral.value(s);
        let combined = match self.mode {
            ErrorMode::Central => charged + neutral,
            ErrorMode::Lower => {
                (charged - self.charged.uncertainty(s)) + (neutral - self.neutral.uncertainty(s))
            }
            ErrorMode::Upper => {
                (charged + self.charged.uncertainty(s)) + (neutral + self.neutral.uncertainty(s))
            }
        };
        self.multiply * combined
    }

    fn kernel_denominator(&self, s: f64, s_prime: f64) -> f64 {
        (s_prime - self.subtraction_point).powi(self.order.power()) * (s_prime - s)
    }

    pub fn integrand_trivial(&self, s: f64, s_prime: f64) -> f64 {
        self.numerator(s_prime) / self.kernel_denominator(s, s_prime)
    }

    pub fn integrand_cauchy(&self, s: f64, s_prime: f64) -> f64 {
        self.cauchy_with(s, self.numerator(s), s_prime)
    }

    fn cauchy_with(&self, s: f64, numerator_at_s: f64, s_prime: f64) -> f64 {
        let scale = s.abs().max(1.0);
        if (s_prime - s).abs() < f64::EPSILON.sqrt() * scale {
            // The difference quotient tends to N'(s).
            let slope = central_derivative(|x| self.numerator(x), s, 1.0e-4 * scale)
                .map_or(f64::NAN, |estimate| estimate.value);
            return slope / (s_prime - self.subtraction_point).powi(self.order.power());
        }
        (self.numerator(s_prime) - numerator_at_s) / self.kernel_denominator(s, s_prime)
    }

    /// Closed-form factor multiplying `N(s)` in the remainder.
    pub fn closed_form(&self, s: f64) -> Result<f64, DispersionError> {
        let p = self.subtraction_point;
        let threshold_log = ((s - self.threshold) / (self.threshold - p)).ln();
        match (self.order, self.cutoff) {
            (SubtractionOrder::Once, Cutoff::Unbounded) => Ok(-threshold_log),
            (SubtractionOrder::Once, Cutoff::Finite(limit)) => {
                Ok(((limit - s) / (limit - p)).ln() - threshold_log)
            }
            (SubtractionOrder::Twice, Cutoff::Unbounded) => {
                Ok(-(s - p) / (self.threshold - p) - threshold_log)
            }
            (SubtractionOrder::Twice, Cutoff::Finite(limit)) => {
                Err(DispersionError::FiniteCutoffWithTwoSubtractions { cutoff: limit })
            }
        }
    }

    /// `N(s)` times the closed form; zero where `N(s)` vanishes and at the
    /// threshold itself, where `N` goes to zero faster than the logarithm.
    pub fn analytic_remainder(&self, s: f64) -> Result<f64, DispersionError> {
        let numerator = self.numerator(s);
        if numerator == 0.0 || s <= self.threshold {
            return Ok(0.0);
        }
        Ok(numerator * self.closed_form(s)?)
    }

    fn range(&self) -> IntegrationRange {
        match self.cutoff {
            Cutoff::Unbounded => IntegrationRange::to_infinity(self.threshold),
            Cutoff::Finite(limit) => IntegrationRange::finite(self.threshold, limit),
        }
    }

    pub fn evaluate(&self, s: f64) -> Result<Complex64, DispersionError> {
        if !s.is_finite() {
            return Err(DispersionError::NonFiniteEnergy { s });
        }
        if let Cutoff::Finite(limit) = self.cutoff {
            if s >= limit {
                return Err(DispersionError::AboveCutoff { s, cutoff: limit });
            }
        }

        let weight = (s - self.subtraction_point).powi(self.order.power()) / TWO_PI;

        if s < self.threshold {
            let integral = self
                .engine
                .integrate(&|x| self.integrand_trivial(s, x), self.range())
                .map_err(|source| DispersionError::Quadrature { s, source })?;
            tracing::debug!(
                s,
                regime = "trivial",
                subdivisions = integral.subdivisions,
                "dispersion integral"
            );
            return Ok(Complex64::new(weight * integral.value / self.multiply, 0.0));
        }

        let numerator_at_s = self.numerator(s);
        let integral = self
            .engine
            .integrate(&|x| self.cauchy_with(s, numerator_at_s, x), self.range())
            .map_err(|source| DispersionError::Quadrature { s, source })?;
        let remainder = self.analytic_remainder(s)?;
        tracing::debug!(
            s,
            regime = "cauchy",
            subdivisions = integral.subdivisions,
            remainder,
            "dispersion integral"
        );

        let real = weight * integral.value + remainder / TWO_PI;
        let imag = 0.5 * numerator_at_s;
        Ok(Complex64::new(real, imag) / self.multiply)
    }
}
