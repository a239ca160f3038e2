use super::gauss_kronrod::GaussKronrodRule;
use super::{IntegrationRange, Quadrature, QuadratureError, QuadratureValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const ROUNDOFF_FACTOR: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdaptiveSettings {
    pub absolute_tolerance: f64,
    pub relative_tolerance: f64,
    pub max_subdivisions: usize,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            absolute_tolerance: 0.0,
            relative_tolerance: 1.0e-7,
            max_subdivisions: 10_000,
        }
    }
}

impl AdaptiveSettings {
    pub fn validate(&self) -> Result<(), QuadratureError> {
        let absolute = self.absolute_tolerance;
        let relative = self.relative_tolerance;
        let finite = absolute.is_finite() && relative.is_finite();
        if !finite || absolute < 0.0 || relative < 0.0 || (absolute == 0.0 && relative == 0.0) {
            return Err(QuadratureError::InvalidTolerance { absolute, relative });
        }
        if self.max_subdivisions == 0 {
            return Err(QuadratureError::InvalidSubdivisionLimit {
                limit: self.max_subdivisions,
            });
        }
        Ok(())
    }

    fn tolerance_for(&self, value: f64) -> f64 {
        self.absolute_tolerance
            .max(self.relative_tolerance * value.abs())
    }

    /// An error at the round-off floor of `integral |f|` cannot shrink further,
    /// so it also counts as converged. This matters for integrals that vanish.
    fn accepts(&self, value: f64, error: f64, absolute: f64) -> bool {
        error <= self.tolerance_for(value).max(ROUNDOFF_FACTOR * f64::EPSILON * absolute)
    }
}

/// Bisects the interval with the largest error estimate until the error
/// meets the tolerance or the round-off floor. Hitting `max_subdivisions`
/// is [`QuadratureError::NotConverged`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveGaussKronrod {
    settings: AdaptiveSettings,
    rule: GaussKronrodRule,
}

impl AdaptiveGaussKronrod {
    pub fn new(settings: AdaptiveSettings) -> Result<Self, QuadratureError> {
        settings.validate()?;
        Ok(Self {
            settings,
            rule: GaussKronrodRule,
        })
    }

    pub fn settings(&self) -> AdaptiveSettings {
        self.settings
    }

    fn integrate_parameter<F>(
        &self,
        integrand: &F,
        lower: f64,
        upper: f64,
    ) -> Result<QuadratureValue, QuadratureError>
    where
        F: Fn(f64) -> f64 + ?Sized,
    {
        let initial = self.evaluate_segment(integrand, lower, upper)?;
        let mut total_value = initial.value;
        let mut total_error = initial.error;
        let mut total_absolute = initial.absolute;
        let mut evaluations = GaussKronrodRule::EVALUATIONS;

        if self.settings.accepts(total_value, total_error, total_absolute) {
            return Ok(QuadratureValue {
                value: total_value,
                error: total_error,
                evaluations,
                subdivisions: 1,
            });
        }

        let mut heap = BinaryHeap::new();
        heap.push(initial);
        let mut subdivisions = 1;

        while subdivisions < self.settings.max_subdivisions {
            let Some(worst) = heap.pop() else {
                break;
            };

            let midpoint = 0.5 * (worst.lower + worst.upper);
            if !bisectable(worst.lower, midpoint, worst.upper) {
                return Err(QuadratureError::RoundoffLimited {
                    value: total_value,
                    error: total_error,
                    at: midpoint,
                });
            }

            let left = self.evaluate_segment(integrand, worst.lower, midpoint)?;
            let right = self.evaluate_segment(integrand, midpoint, worst.upper)?;
            evaluations += 2 * GaussKronrodRule::EVALUATIONS;
            subdivisions += 1;

            total_value += left.value + right.value - worst.value;
            total_error += left.error + right.error - worst.error;
            total_absolute += left.absolute + right.absolute - worst.absolute;
            heap.push(left);
            heap.push(right);

            if self.settings.accepts(total_value, total_error, total_absolute) {
                // Re-sum to shed the drift of the running totals.
                let value: f64 = heap.iter().map(|segment| segment.value).sum();
                let error: f64 = heap.iter().map(|segment| segment.error).sum();
                tracing::debug!(subdivisions, evaluations, value, error, "adaptive quadrature converged");
                return Ok(QuadratureValue {
                    value,
                    error,
                    evaluations,
                    subdivisions,
                });
            }
        }

        let tolerance = self.settings.tolerance_for(total_value);
        tracing::warn!(
            subdivisions,
            value = total_value,
            error = total_error,
            tolerance,
            "adaptive quadrature reached its subdivision cap"
        );
        Err(QuadratureError::NotConverged {
            value: total_value,
            error: total_error,
            tolerance,
            subdivisions,
        })
    }

    fn evaluate_segment<F>(
        &self,
        integrand: &F,
        lower: f64,
        upper: f64,
    ) -> Result<Segment, QuadratureError>
    where
        F: Fn(f64) -> f64 + ?Sized,
    {
        let estimate = self.rule.integrate(integrand, lower, upper);
        if !estimate.value.is_finite() || !estimate.error.is_finite() {
            return Err(QuadratureError::NonFiniteIntegrand { lower, upper });
        }
        Ok(Segment {
            lower,
            upper,
            value: estimate.value,
            error: estimate.error,
            absolute: estimate.absolute_value,
        })
    }
}

impl Quadrature for AdaptiveGaussKronrod {
    fn integrate(
        &self,
        integrand: &dyn Fn(f64) -> f64,
        range: IntegrationRange,
    ) -> Result<QuadratureValue, QuadratureError> {
        range.validate()?;
        let (lower, upper) = range.parameter_bounds();
        if lower == upper {
            return Ok(QuadratureValue {
                value: 0.0,
                error: 0.0,
                evaluations: 0,
                subdivisions: 0,
            });
        }

        let transformed = range.transform(integrand);
        self.integrate_parameter(&transformed, lower, upper)
    }
}

fn bisectable(lower: f64, midpoint: f64, upper: f64) -> bool {
    let scale = lower.abs().max(upper.abs());
    let width = (upper - lower).abs();
    midpoint != lower && midpoint != upper && width > 100.0 * f64::EPSILON * scale
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    lower: f64,
    upper: f64,
    value: f64,
    error: f64,
    absolute: f64,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    // Max-heap on the error estimate.
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}
