pub mod magnitude;
pub mod matching;
pub mod partial_wave;

pub use magnitude::{AmplitudeMagnitude, AmplitudeTable, MatchedAmplitude};
pub use matching::{MatchError, MatchedFunction, MatchingSettings, RationalTail};
pub use partial_wave::{BasisFunctions, Channel, PartialWaveCombination, SubtractionConstants};

use crate::domain::{Categorized, ErrorCategory, KpolError, classify};
use crate::numerics::interpolation::InterpolationError;
use crate::numerics::quadrature::QuadratureError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmplitudeError {
    #[error("amplitude channel is only defined for indices 1..=4, got {index}")]
    UnknownChannel { index: u32 },
    #[error(
        "tabulation from threshold {threshold} to {s_max} with step {step} needs a finite step > 0 and at least two points"
    )]
    InvalidTabulation { threshold: f64, s_max: f64, step: f64 },
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
    #[error(transparent)]
    Matching(#[from] MatchError),
    #[error(transparent)]
    Quadrature(#[from] QuadratureError),
}

impl Categorized for AmplitudeError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownChannel { .. } => ErrorCategory::Domain,
            Self::InvalidTabulation { .. } => ErrorCategory::Configuration,
            Self::Interpolation(source) => source.category(),
            Self::Matching(source) => source.category(),
            Self::Quadrature(source) => source.category(),
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::UnknownChannel { .. } => "DOMAIN.AMPLITUDE_CHANNEL",
            Self::InvalidTabulation { .. } => "CONFIG.AMPLITUDE_TABULATION",
            Self::Interpolation(source) => source.placeholder(),
            Self::Matching(source) => source.placeholder(),
            Self::Quadrature(source) => source.placeholder(),
        }
    }
}

impl From<AmplitudeError> for KpolError {
    fn from(error: AmplitudeError) -> Self {
        classify(error)
    }
}

#[cfg(test)]
mod tests {
    use super::{AmplitudeError, MatchError};
    use crate::domain::{ErrorCategory, KpolError};

    #[test]
    fn nested_errors_keep_their_category() {
        let error = KpolError::from(AmplitudeError::Matching(MatchError::DegenerateSlope {
            match_point: 1.0,
        }));
        assert_eq!(error.category(), ErrorCategory::NumericalFailure);
        assert_eq!(error.placeholder(), "NUMERIC.MATCH_DEGENERATE");

        let error = KpolError::from(AmplitudeError::UnknownChannel { index: 7 });
        assert_eq!(error.category(), ErrorCategory::Domain);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [DOMAIN.AMPLITUDE_CHANNEL] amplitude channel is only defined for indices 1..=4, got 7"
        );
    }
}
