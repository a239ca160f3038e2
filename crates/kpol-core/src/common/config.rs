use super::masses::MassTable;
use crate::amplitude::matching::MatchingSettings;
use crate::amplitude::partial_wave::SubtractionConstants;
use crate::dispersion::integral::{Cutoff, IntegralSettings};
use crate::domain::{Categorized, ErrorCategory, KpolError, classify};
use crate::numerics::contour::IntegrationStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispersionSettings {
    pub masses: MassTable,
    pub integral: IntegralSettings,
    pub matching: MatchingSettings,
    pub partial_wave_strategy: IntegrationStrategy,
    pub subtraction_constants: SubtractionConstants,
    /// Number of subtractions, 1 or 2.
    pub subtractions: u32,
    /// 0 central, 1 lower, 2 upper.
    pub error_mode: u8,
    /// Subtraction point; `None` selects `m_K^2`.
    pub subtraction_point: Option<f64>,
    pub cutoff: Cutoff,
}

impl Default for DispersionSettings {
    fn default() -> Self {
        Self {
            masses: MassTable::default(),
            integral: IntegralSettings::default(),
            matching: MatchingSettings::default(),
            partial_wave_strategy: IntegrationStrategy::default(),
            subtraction_constants: SubtractionConstants::default(),
            subtractions: 1,
            error_mode: 0,
            subtraction_point: None,
            cutoff: Cutoff::Unbounded,
        }
    }
}

impl DispersionSettings {
    pub fn subtraction_point(&self) -> f64 {
        self.subtraction_point
            .unwrap_or_else(|| self.masses.kaon_squared())
    }

    /// Checks the values that can be judged without building any object.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some((field, value)) = self.masses.invalid_entry() {
            return Err(SettingsError::Invalid {
                field: format!("masses.{field}"),
                value: value.to_string(),
            });
        }
        if !self.integral.multiply.is_finite() || self.integral.multiply <= 0.0 {
            return Err(SettingsError::invalid("integral.multiply", self.integral.multiply));
        }
        if self.integral.quadrature.validate().is_err() {
            return Err(SettingsError::Invalid {
                field: "integral.quadrature".to_string(),
                value: format!("{:?}", self.integral.quadrature),
            });
        }
        if !self.matching.match_point.is_finite() {
            return Err(SettingsError::invalid(
                "matching.matchPoint",
                self.matching.match_point,
            ));
        }
        if !self.matching.derivative_step.is_finite() || self.matching.derivative_step <= 0.0 {
            return Err(SettingsError::invalid(
                "matching.derivativeStep",
                self.matching.derivative_step,
            ));
        }
        if let IntegrationStrategy::GaussLegendre { nodes: 0 } = self.partial_wave_strategy {
            return Err(SettingsError::invalid("partialWaveStrategy.nodes", 0));
        }
        if !(1..=2).contains(&self.subtractions) {
            return Err(SettingsError::invalid("subtractions", self.subtractions));
        }
        if self.error_mode > 2 {
            return Err(SettingsError::invalid("errorMode", self.error_mode));
        }
        let threshold = self.masses.kaon_pion_threshold();
        let subtraction_point = self.subtraction_point();
        if !subtraction_point.is_finite() || subtraction_point >= threshold {
            return Err(SettingsError::invalid("subtractionPoint", subtraction_point));
        }
        if let Cutoff::Finite(limit) = self.cutoff {
            if !limit.is_finite() || limit <= threshold || self.subtractions == 2 {
                return Err(SettingsError::invalid("cutoff", limit));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting {field}={value}")]
    Invalid { field: String, value: String },
}

impl SettingsError {
    fn invalid(field: &str, value: impl ToString) -> Self {
        Self::Invalid {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

impl Categorized for SettingsError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::Read { .. } => "CONFIG.SETTINGS_READ",
            Self::Parse { .. } => "CONFIG.SETTINGS_PARSE",
            Self::Invalid { .. } => "CONFIG.SETTINGS_VALUE",
        }
    }
}

impl From<SettingsError> for KpolError {
    fn from(error: SettingsError) -> Self {
        classify(error)
    }
}

pub fn load_dispersion_settings(path: &Path) -> Result<DispersionSettings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: DispersionSettings =
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    settings.validate()?;
    Ok(settings)
}
