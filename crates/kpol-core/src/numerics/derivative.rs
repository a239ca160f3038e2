use crate::domain::{Categorized, ErrorCategory, KpolError, classify};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivativeEstimate {
    pub value: f64,
    pub error: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DerivativeError {
    #[error("derivative step must be finite and > 0, got {step}")]
    InvalidStep { step: f64 },
    #[error("derivative point must be finite, got {x}")]
    NonFinitePoint { x: f64 },
    #[error("function is not finite near x={x} with step {step}")]
    NonFiniteFunction { x: f64, step: f64 },
}

impl Categorized for DerivativeError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidStep { .. } => ErrorCategory::Configuration,
            Self::NonFinitePoint { .. } => ErrorCategory::Domain,
            Self::NonFiniteFunction { .. } => ErrorCategory::NumericalFailure,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::InvalidStep { .. } => "CONFIG.DERIVATIVE_STEP",
            Self::NonFinitePoint { .. } => "DOMAIN.DERIVATIVE_POINT",
            Self::NonFiniteFunction { .. } => "NUMERIC.DERIVATIVE_NON_FINITE",
        }
    }
}

impl From<DerivativeError> for KpolError {
    fn from(error: DerivativeError) -> Self {
        classify(error)
    }
}

/// Five-point central difference with a truncation/round-off error estimate.
///
/// When round-off dominates, the step is rescaled once to balance the two
/// error sources; the rescaled result is kept only if it is consistent with
/// the first one.
pub fn central_derivative<F>(
    function: F,
    x: f64,
    step: f64,
) -> Result<DerivativeEstimate, DerivativeError>
where
    F: Fn(f64) -> f64,
{
    if !step.is_finite() || step <= 0.0 {
        return Err(DerivativeError::InvalidStep { step });
    }
    if !x.is_finite() {
        return Err(DerivativeError::NonFinitePoint { x });
    }

    let first = central_difference(&function, x, step)?;
    let total = first.truncation + first.round_off;

    if first.round_off < first.truncation && first.round_off > 0.0 && first.truncation > 0.0 {
        let optimal_step = step * (first.round_off / (2.0 * first.truncation)).cbrt();
        let refined = central_difference(&function, x, optimal_step)?;
        let refined_total = refined.truncation + refined.round_off;
        if refined_total < total && (refined.value - first.value).abs() < 4.0 * total {
            return Ok(DerivativeEstimate {
                value: refined.value,
                error: refined_total,
            });
        }
    }

    Ok(DerivativeEstimate {
        value: first.value,
        error: total,
    })
}

struct Difference {
    value: f64,
    truncation: f64,
    round_off: f64,
}

fn central_difference<F>(function: &F, x: f64, step: f64) -> Result<Difference, DerivativeError>
where
    F: Fn(f64) -> f64,
{
    let f_minus = function(x - step);
    let f_plus = function(x + step);
    let f_minus_half = function(x - 0.5 * step);
    let f_plus_half = function(x + 0.5 * step);
    if [f_minus, f_plus, f_minus_half, f_plus_half]
        .iter()
        .any(|value| !value.is_finite())
    {
        return Err(DerivativeError::NonFiniteFunction { x, step });
    }

    let three_point = 0.5 * (f_plus - f_minus);
    let five_point = (4.0 / 3.0) * (f_plus_half - f_minus_half) - three_point / 3.0;

    let e3 = (f_plus.abs() + f_minus.abs()) * f64::EPSILON;
    let e5 = 2.0 * (f_plus_half.abs() + f_minus_half.abs()) * f64::EPSILON + e3;
    let dy = (three_point / step).abs().max((five_point / step).abs()) * (x.abs() / step)
        * f64::EPSILON;

    Ok(Difference {
        value: five_point / step,
        truncation: ((five_point - three_point) / step).abs(),
        round_off: (e5 / step).abs() + dy,
    })
}

#[cfg(test)]
mod tests {
    use super::{DerivativeError, central_derivative};

    #[test]
    fn cubic_derivative_is_exact() {
        let estimate = central_derivative(|x| x * x * x - 2.0 * x, 1.5, 1.0e-2).expect("cubic");
        assert!((estimate.value - (3.0 * 1.5 * 1.5 - 2.0)).abs() < 1.0e-8);
        assert!(estimate.error.is_finite());
    }

    #[test]
    fn exponential_derivative_is_accurate() {
        let estimate = central_derivative(f64::exp, 0.7, 1.0e-2).expect("exp");
        let expected = 0.7_f64.exp();
        assert!((estimate.value - expected).abs() < 1.0e-8);
    }

    #[test]
    fn rejects_bad_step_and_non_finite_function() {
        assert_eq!(
            central_derivative(f64::sin, 0.0, 0.0),
            Err(DerivativeError::InvalidStep { step: 0.0 })
        );
        assert_eq!(
            central_derivative(|x: f64| (x - 0.005).sqrt(), 0.0, 1.0e-2),
            Err(DerivativeError::NonFiniteFunction { x: 0.0, step: 1.0e-2 })
        );
    }
}
