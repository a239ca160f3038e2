pub mod discontinuity;
pub mod integral;

pub use discontinuity::{Discontinuity, DiscontinuityModel, IntermediateKaon};
pub use integral::{Cutoff, DispersiveIntegral, ErrorMode, IntegralSettings, SubtractionOrder};

use crate::domain::{Categorized, ErrorCategory, KpolError, classify};
use crate::numerics::quadrature::QuadratureError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispersionError {
    #[error("subtraction order must be 1 or 2, got {order}")]
    UnsupportedSubtractionOrder { order: u32 },
    #[error("error mode must be 0 (central), 1 (lower) or 2 (upper), got {mode}")]
    UnknownErrorMode { mode: u8 },
    #[error("subtraction point {subtraction_point} must lie below the threshold {threshold}")]
    SubtractionPointNotBelowThreshold {
        subtraction_point: f64,
        threshold: f64,
    },
    #[error("charged threshold {charged} and neutral threshold {neutral} differ")]
    ThresholdMismatch { charged: f64, neutral: f64 },
    #[error("rescaling factor must be finite and > 0, got {multiply}")]
    InvalidMultiplier { multiply: f64 },
    #[error("cutoff {cutoff} must be finite and above the threshold {threshold}")]
    InvalidCutoff { cutoff: f64, threshold: f64 },
    #[error("two subtractions have no closed-form remainder for the finite cutoff {cutoff}")]
    FiniteCutoffWithTwoSubtractions { cutoff: f64 },
    #[error("dispersion integral requested at non-finite s={s}")]
    NonFiniteEnergy { s: f64 },
    #[error("s={s} is not below the cutoff {cutoff}")]
    AboveCutoff { s: f64, cutoff: f64 },
    #[error(transparent)]
    QuadratureSettings(#[from] QuadratureError),
    #[error("dispersion integral at s={s} failed: {source}")]
    Quadrature {
        s: f64,
        #[source]
        source: QuadratureError,
    },
}

impl Categorized for DispersionError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedSubtractionOrder { .. }
            | Self::UnknownErrorMode { .. }
            | Self::SubtractionPointNotBelowThreshold { .. }
            | Self::ThresholdMismatch { .. }
            | Self::InvalidMultiplier { .. }
            | Self::InvalidCutoff { .. }
            | Self::FiniteCutoffWithTwoSubtractions { .. } => ErrorCategory::Configuration,
            Self::NonFiniteEnergy { .. } | Self::AboveCutoff { .. } => ErrorCategory::Domain,
            Self::QuadratureSettings(source) | Self::Quadrature { source, .. } => {
                source.category()
            }
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::UnsupportedSubtractionOrder { .. } => "CONFIG.SUBTRACTION_ORDER",
            Self::UnknownErrorMode { .. } => "CONFIG.ERROR_MODE",
            Self::SubtractionPointNotBelowThreshold { .. } => "CONFIG.SUBTRACTION_POINT",
            Self::ThresholdMismatch { .. } => "CONFIG.THRESHOLD_MISMATCH",
            Self::InvalidMultiplier { .. } => "CONFIG.MULTIPLY",
            Self::InvalidCutoff { .. } => "CONFIG.CUTOFF",
            Self::FiniteCutoffWithTwoSubtractions { .. } => "CONFIG.CUTOFF_SUBTRACTIONS",
            Self::NonFiniteEnergy { .. } => "DOMAIN.ENERGY",
            Self::AboveCutoff { .. } => "DOMAIN.ABOVE_CUTOFF",
            Self::QuadratureSettings(source) | Self::Quadrature { source, .. } => {
                source.placeholder()
            }
        }
    }
}

impl From<DispersionError> for KpolError {
    fn from(error: DispersionError) -> Self {
        classify(error)
    }
}
