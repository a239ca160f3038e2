//! Continuation of a tabulated function by a rational tail `a / (s + b)`.
//!
//! Value and first derivative of the tail agree with the interpolated
//! function at the match point `s0`, so the composed function is C1 there:
//!
//! ```text
//! y = g(s0),  m = g'(s0),  b = -s0 - y/m,  a = -y^2/m
//! ```

use crate::domain::{Categorized, ErrorCategory, KpolError, classify};
use crate::numerics::derivative::{DerivativeError, central_derivative};
use crate::numerics::interpolation::CubicSpline;
use crate::numerics::piecewise::{Piece, PiecewiseFunction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchingSettings {
    /// Seam between table and tail, in GeV^2.
    pub match_point: f64,
    pub derivative_step: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            match_point: 1.0,
            derivative_step: 1.0e-2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("match point {match_point} must be finite and the step {step} finite and > 0")]
    InvalidSettings { match_point: f64, step: f64 },
    #[error(
        "match point {match_point} must lie in [{front} + {step}, {back} - {step}] of the sampled domain"
    )]
    OutsideTable {
        match_point: f64,
        front: f64,
        back: f64,
        step: f64,
    },
    #[error("matched function is not finite at {match_point}: value={value}")]
    NonFiniteValue { match_point: f64, value: f64 },
    #[error("derivative at match point {match_point} vanishes, rational tail is undefined")]
    DegenerateSlope { match_point: f64 },
    #[error("rational tail has a pole at {pole} above match point {match_point}")]
    PoleAboveMatchPoint { pole: f64, match_point: f64 },
    #[error(transparent)]
    Derivative(#[from] DerivativeError),
}

impl Categorized for MatchError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSettings { .. } | Self::OutsideTable { .. } => {
                ErrorCategory::Configuration
            }
            Self::NonFiniteValue { .. }
            | Self::DegenerateSlope { .. }
            | Self::PoleAboveMatchPoint { .. } => ErrorCategory::NumericalFailure,
            Self::Derivative(source) => source.category(),
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::InvalidSettings { .. } => "CONFIG.MATCH_SETTINGS",
            Self::OutsideTable { .. } => "CONFIG.MATCH_POINT",
            Self::NonFiniteValue { .. } => "NUMERIC.MATCH_VALUE",
            Self::DegenerateSlope { .. } => "NUMERIC.MATCH_DEGENERATE",
            Self::PoleAboveMatchPoint { .. } => "NUMERIC.MATCH_POLE",
            Self::Derivative(source) => source.placeholder(),
        }
    }
}

impl From<MatchError> for KpolError {
    fn from(error: MatchError) -> Self {
        classify(error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RationalTail {
    a: f64,
    b: f64,
}

impl RationalTail {
    pub fn fit<G>(function: G, match_point: f64, step: f64) -> Result<Self, MatchError>
    where
        G: Fn(f64) -> f64,
    {
        if !match_point.is_finite() || !step.is_finite() || step <= 0.0 {
            return Err(MatchError::InvalidSettings { match_point, step });
        }

        let y = function(match_point);
        if !y.is_finite() {
            return Err(MatchError::NonFiniteValue {
                match_point,
                value: y,
            });
        }
        let slope = central_derivative(&function, match_point, step)?.value;
        if slope == 0.0 || (y / slope).is_infinite() {
            return Err(MatchError::DegenerateSlope { match_point });
        }

        let ratio = y / slope;
        let tail = Self {
            a: -y * y / slope,
            b: -match_point - ratio,
        };
        if ratio > 0.0 {
            return Err(MatchError::PoleAboveMatchPoint {
                pole: tail.pole(),
                match_point,
            });
        }
        Ok(tail)
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    /// Location `s = -b` of the tail's pole.
    pub fn pole(&self) -> f64 {
        -self.b
    }

    pub fn evaluate(&self, s: f64) -> f64 {
        self.a / (s + self.b)
    }
}

/// Spline below the match point, rational tail above it.
#[derive(Debug)]
pub struct MatchedFunction {
    tail: RationalTail,
    match_point: f64,
    composed: PiecewiseFunction<f64, f64>,
}

impl MatchedFunction {
    pub fn from_spline(
        spline: CubicSpline,
        settings: MatchingSettings,
    ) -> Result<Self, MatchError> {
        let MatchingSettings {
            match_point,
            derivative_step: step,
        } = settings;
        let (front, back) = (spline.front(), spline.back());
        if !(front + step <= match_point && match_point <= back - step) {
            return Err(MatchError::OutsideTable {
                match_point,
                front,
                back,
                step,
            });
        }

        let tail = RationalTail::fit(|s| spline.evaluate(s), match_point, step)?;
        tracing::debug!(
            match_point,
            a = tail.a(),
            b = tail.b(),
            "matched rational tail"
        );

        let pieces: Vec<Piece<f64, f64>> = vec![
            Box::new(move |s: f64| spline.evaluate(s)),
            Box::new(move |s: f64| tail.evaluate(s)),
        ];
        let composed = PiecewiseFunction::new(
            pieces,
            vec![f64::NEG_INFINITY, match_point, f64::INFINITY],
        )
        .map_err(|_| MatchError::InvalidSettings { match_point, step })?;

        Ok(Self {
            tail,
            match_point,
            composed,
        })
    }

    pub fn tail(&self) -> RationalTail {
        self.tail
    }

    pub fn match_point(&self) -> f64 {
        self.match_point
    }

    /// NaN input yields NaN.
    pub fn evaluate(&self, s: f64) -> f64 {
        self.composed.evaluate(s).unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchError, MatchedFunction, MatchingSettings, RationalTail};
    use crate::numerics::interpolation::CubicSpline;

    fn assert_scalar_close(label: &str, expected: f64, actual: f64, abs_tol: f64, rel_tol: f64) {
        let abs_diff = (actual - expected).abs();
        let rel_diff = abs_diff / expected.abs().max(1.0);
        assert!(
            abs_diff <= abs_tol || rel_diff <= rel_tol,
            "{label} expected={expected:.15e} actual={actual:.15e} abs_diff={abs_diff:.15e} rel_diff={rel_diff:.15e}"
        );
    }

    fn tabulate<F: Fn(f64) -> f64>(function: F) -> CubicSpline {
        let x: Vec<f64> = (0..=160).map(|i| 0.4 + 0.01 * f64::from(i)).collect();
        let y = x.iter().map(|&s| function(s)).collect();
        CubicSpline::new(x, y).expect("table")
    }

    #[test]
    fn rational_function_recovers_its_own_parameters() {
        let tail = RationalTail::fit(|s| 1.5 / (s + 0.3), 1.0, 1.0e-2).expect("fit");
        assert_scalar_close("a", 1.5, tail.a(), 1.0e-7, 0.0);
        assert_scalar_close("b", 0.3, tail.b(), 1.0e-7, 0.0);
        assert_scalar_close("pole", -0.3, tail.pole(), 1.0e-7, 0.0);
    }

    #[test]
    fn matched_spline_is_continuous_and_follows_tail() {
        let spline = tabulate(|s| 1.5 / (s + 0.3));
        let below = spline.evaluate(0.77);
        let matched =
            MatchedFunction::from_spline(spline, MatchingSettings::default()).expect("matched");

        assert_eq!(matched.evaluate(0.77), below);
        assert_scalar_close("a", 1.5, matched.tail().a(), 1.0e-4, 0.0);
        assert_scalar_close("b", 0.3, matched.tail().b(), 1.0e-4, 0.0);

        let seam = matched.match_point();
        let jump = matched.evaluate(seam + 1.0e-9) - matched.evaluate(seam);
        assert!(jump.abs() < 1.0e-7, "jump={jump}");
        assert_scalar_close("tail", 1.5 / 50.3, matched.evaluate(50.0), 1.0e-5, 0.0);
        assert!(matched.evaluate(f64::NAN).is_nan());
    }

    #[test]
    fn flat_function_is_a_degenerate_fit() {
        let error = RationalTail::fit(|_s| 2.0, 1.0, 1.0e-2).expect_err("flat");
        assert_eq!(error, MatchError::DegenerateSlope { match_point: 1.0 });
    }

    #[test]
    fn rising_function_puts_the_pole_above_the_seam() {
        let error = RationalTail::fit(|s| s, 1.0, 1.0e-2).expect_err("rising");
        assert!(matches!(error, MatchError::PoleAboveMatchPoint { .. }));
    }

    #[test]
    fn match_point_must_leave_room_for_the_derivative() {
        let spline = tabulate(|s| 1.0 / s);
        let settings = MatchingSettings {
            match_point: 1.995,
            ..MatchingSettings::default()
        };
        let error = MatchedFunction::from_spline(spline, settings).expect_err("outside");
        assert!(matches!(error, MatchError::OutsideTable { .. }));
    }
}
