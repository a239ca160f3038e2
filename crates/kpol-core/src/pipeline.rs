use crate::amplitude::{
    AmplitudeTable, Channel, MatchedAmplitude, PartialWaveCombination,
};
use crate::common::config::DispersionSettings;
use crate::dispersion::{
    DiscontinuityModel, DispersiveIntegral, ErrorMode, IntermediateKaon, SubtractionOrder,
};
use crate::domain::KpolResult;
use num_complex::Complex64;
use std::sync::Arc;

pub type MatchedDiscontinuity = DiscontinuityModel<Arc<MatchedAmplitude>>;

#[derive(Debug)]
pub struct DispersionPipeline {
    settings: DispersionSettings,
    integral: DispersiveIntegral<MatchedDiscontinuity>,
}

impl DispersionPipeline {
    /// `charged` and `neutral` tabulate the amplitudes with a charged and a
    /// neutral kaon in the `K pi` intermediate state. Uncertainty tails are
    /// only required by the lower and upper error modes.
    pub fn new(
        settings: DispersionSettings,
        charged: &AmplitudeTable,
        neutral: &AmplitudeTable,
    ) -> KpolResult<Self> {
        let span = tracing::info_span!(
            "dispersion_pipeline",
            subtractions = settings.subtractions,
            error_mode = settings.error_mode
        );
        let _guard = span.enter();

        settings.validate()?;
        let order = SubtractionOrder::try_from(settings.subtractions)?;
        let mode = ErrorMode::try_from(settings.error_mode)?;

        let charged = Arc::new(MatchedAmplitude::new(charged, settings.matching)?);
        let neutral = Arc::new(MatchedAmplitude::new(neutral, settings.matching)?);
        if mode != ErrorMode::Central {
            charged.check_uncertainty()?;
            neutral.check_uncertainty()?;
        }
        let discontinuity = |kaon| {
            DiscontinuityModel::new(
                Arc::clone(&charged),
                Arc::clone(&neutral),
                kaon,
                settings.masses,
            )
        };

        let integral = DispersiveIntegral::new(
            discontinuity(IntermediateKaon::Charged),
            discontinuity(IntermediateKaon::Neutral),
            order,
            mode,
            settings.subtraction_point(),
            settings.integral,
        )?
        .with_cutoff(settings.cutoff)?;
        tracing::info!(
            threshold = integral.threshold(),
            subtraction_point = integral.subtraction_point(),
            "dispersion pipeline ready"
        );

        Ok(Self { settings, integral })
    }

    /// Tabulates both intermediate states from a partial-wave combination
    /// on `[threshold, s_max)` and builds the pipeline on them.
    pub fn from_partial_waves(
        settings: DispersionSettings,
        combination: &PartialWaveCombination,
        channels: (Channel, Channel),
        s_max: f64,
        step: f64,
    ) -> KpolResult<Self> {
        let (charged_channel, neutral_channel) = channels;
        let charged = combination.tabulate(charged_channel, s_max, step)?;
        let neutral = combination.tabulate(neutral_channel, s_max, step)?;
        Self::new(settings, &charged, &neutral)
    }

    pub fn settings(&self) -> &DispersionSettings {
        &self.settings
    }

    pub fn integral(&self) -> &DispersiveIntegral<MatchedDiscontinuity> {
        &self.integral
    }

    pub fn evaluate(&self, s: f64) -> KpolResult<Complex64> {
        Ok(self.integral.evaluate(s)?)
    }

    /// Stops at the first point that fails.
    pub fn evaluate_grid(&self, grid: &[f64]) -> KpolResult<Vec<Complex64>> {
        let span = tracing::info_span!("dispersion_grid", points = grid.len());
        let _guard = span.enter();

        grid.iter().map(|&s| self.evaluate(s)).collect()
    }
}
