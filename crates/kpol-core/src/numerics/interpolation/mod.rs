pub mod complex;
pub mod cubic;

pub use complex::{ComplexInterpolant, sample, sample_along};
pub use cubic::CubicSpline;

use crate::domain::{Categorized, ErrorCategory, KpolError, classify};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    #[error("interpolation requires at least 2 samples, got {actual}")]
    TooFewPoints { actual: usize },
    #[error("interpolation input length mismatch: x={x}, {field}={actual}")]
    LengthMismatch {
        field: &'static str,
        x: usize,
        actual: usize,
    },
    #[error(
        "interpolation abscissae must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasing {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("interpolation sample '{field}' must be finite, index {index} got {value}")]
    NonFiniteSample {
        field: &'static str,
        index: usize,
        value: f64,
    },
}

impl Categorized for InterpolationError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::NonFiniteSample { .. } => ErrorCategory::NumericalFailure,
            _ => ErrorCategory::Configuration,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::TooFewPoints { .. } => "CONFIG.INTERPOLATION_POINTS",
            Self::LengthMismatch { .. } => "CONFIG.INTERPOLATION_LENGTH",
            Self::NonIncreasing { .. } => "CONFIG.INTERPOLATION_ORDER",
            Self::NonFiniteSample { .. } => "NUMERIC.INTERPOLATION_SAMPLE",
        }
    }
}

impl From<InterpolationError> for KpolError {
    fn from(error: InterpolationError) -> Self {
        classify(error)
    }
}

pub(crate) fn validate_samples(
    x: &[f64],
    ordinates: &[(&'static str, &[f64])],
) -> Result<(), InterpolationError> {
    if x.len() < 2 {
        return Err(InterpolationError::TooFewPoints { actual: x.len() });
    }

    for &(field, values) in ordinates {
        if values.len() != x.len() {
            return Err(InterpolationError::LengthMismatch {
                field,
                x: x.len(),
                actual: values.len(),
            });
        }
    }

    for (index, window) in x.windows(2).enumerate() {
        if window[1].partial_cmp(&window[0]) != Some(std::cmp::Ordering::Greater) {
            return Err(InterpolationError::NonIncreasing {
                index: index + 1,
                previous: window[0],
                current: window[1],
            });
        }
    }

    let fields = std::iter::once(("x", x)).chain(ordinates.iter().copied());
    for (field, values) in fields {
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InterpolationError::NonFiniteSample {
                field,
                index,
                value,
            });
        }
    }

    Ok(())
}
