use super::AmplitudeError;
use super::matching::{MatchedFunction, MatchingSettings};
use crate::numerics::interpolation::CubicSpline;
use num_complex::Complex64;
use std::sync::Arc;

/// Magnitude `|A(s)|` of a coupled-channel amplitude and its uncertainty.
pub trait AmplitudeMagnitude: Send + Sync {
    fn value(&self, s: f64) -> f64;

    fn uncertainty(&self, s: f64) -> f64;
}

impl<T: AmplitudeMagnitude + ?Sized> AmplitudeMagnitude for Arc<T> {
    fn value(&self, s: f64) -> f64 {
        (**self).value(s)
    }

    fn uncertainty(&self, s: f64) -> f64 {
        (**self).uncertainty(s)
    }
}

/// Tabulated complex amplitude on an ascending `s` grid, optionally with
/// uncertainties of the real and imaginary parts.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeTable {
    s: Vec<f64>,
    real: Vec<f64>,
    imag: Vec<f64>,
    uncertainties: Option<(Vec<f64>, Vec<f64>)>,
}

impl AmplitudeTable {
    pub fn new(s: Vec<f64>, real: Vec<f64>, imag: Vec<f64>) -> Result<Self, AmplitudeError> {
        crate::numerics::interpolation::validate_samples(
            &s,
            &[("real", real.as_slice()), ("imag", imag.as_slice())],
        )?;
        Ok(Self {
            s,
            real,
            imag,
            uncertainties: None,
        })
    }

    pub fn from_values(s: Vec<f64>, values: &[Complex64]) -> Result<Self, AmplitudeError> {
        let real = values.iter().map(|value| value.re).collect();
        let imag = values.iter().map(|value| value.im).collect();
        Self::new(s, real, imag)
    }

    pub fn with_uncertainties(
        mut self,
        real_uncertainty: Vec<f64>,
        imag_uncertainty: Vec<f64>,
    ) -> Result<Self, AmplitudeError> {
        crate::numerics::interpolation::validate_samples(
            &self.s,
            &[
                ("realUncertainty", real_uncertainty.as_slice()),
                ("imagUncertainty", imag_uncertainty.as_slice()),
            ],
        )?;
        self.uncertainties = Some((real_uncertainty, imag_uncertainty));
        Ok(self)
    }

    pub fn s(&self) -> &[f64] {
        &self.s
    }

    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    pub fn has_uncertainties(&self) -> bool {
        self.uncertainties.is_some()
    }

    pub fn values(&self) -> Vec<Complex64> {
        self.real
            .iter()
            .zip(&self.imag)
            .map(|(&re, &im)| Complex64::new(re, im))
            .collect()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.real
            .iter()
            .zip(&self.imag)
            .map(|(re, im)| re.hypot(*im))
            .collect()
    }

    /// Linear propagation `sqrt((Re dRe/|A|)^2 + (Im dIm/|A|)^2)`; where
    /// `|A| = 0` the bound `sqrt(dRe^2 + dIm^2)` is used.
    pub fn magnitude_uncertainties(&self) -> Option<Vec<f64>> {
        let (real_uncertainty, imag_uncertainty) = self.uncertainties.as_ref()?;
        let magnitudes = self.magnitudes();
        let propagated = (0..self.s.len())
            .map(|index| {
                let magnitude = magnitudes[index];
                let (d_re, d_im) = (real_uncertainty[index], imag_uncertainty[index]);
                if magnitude == 0.0 {
                    return d_re.hypot(d_im);
                }
                (self.real[index] * d_re / magnitude).hypot(self.imag[index] * d_im / magnitude)
            })
            .collect();
        Some(propagated)
    }
}

/// `|A|` from a cubic spline of the table, continued by a rational tail above
/// the match point. Without tabulated uncertainties the uncertainty is zero.
///
/// A failed uncertainty fit does not fail construction: the central value
/// stays usable and `check_uncertainty` reports the fit error.
#[derive(Debug)]
pub struct MatchedAmplitude {
    magnitude: MatchedFunction,
    uncertainty: Option<Result<MatchedFunction, AmplitudeError>>,
}

impl MatchedAmplitude {
    pub fn new(table: &AmplitudeTable, settings: MatchingSettings) -> Result<Self, AmplitudeError> {
        let spline = CubicSpline::new(table.s.clone(), table.magnitudes())?;
        let magnitude = MatchedFunction::from_spline(spline, settings)?;

        let uncertainty = table.magnitude_uncertainties().map(|values| {
            let fitted = CubicSpline::new(table.s.clone(), values)
                .map_err(AmplitudeError::from)
                .and_then(|spline| {
                    MatchedFunction::from_spline(spline, settings).map_err(AmplitudeError::from)
                });
            if let Err(error) = &fitted {
                tracing::warn!(%error, "uncertainty tail unavailable; only the central value can be evaluated");
            }
            fitted
        });

        Ok(Self {
            magnitude,
            uncertainty,
        })
    }

    pub fn magnitude(&self) -> &MatchedFunction {
        &self.magnitude
    }

    pub fn uncertainty_function(&self) -> Option<&MatchedFunction> {
        self.uncertainty.as_ref().and_then(|fitted| fitted.as_ref().ok())
    }

    /// Fails with the fit error when tabulated uncertainties could not be
    /// continued above the match point.
    pub fn check_uncertainty(&self) -> Result<(), AmplitudeError> {
        match &self.uncertainty {
            Some(Err(error)) => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

impl AmplitudeMagnitude for MatchedAmplitude {
    fn value(&self, s: f64) -> f64 {
        self.magnitude.evaluate(s)
    }

    fn uncertainty(&self, s: f64) -> f64 {
        match &self.uncertainty {
            None => 0.0,
            Some(Ok(function)) => function.evaluate(s),
            Some(Err(_)) => f64::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AmplitudeMagnitude, AmplitudeTable, MatchedAmplitude};
    use crate::amplitude::AmplitudeError;
    use crate::amplitude::matching::{MatchError, MatchingSettings};
    use num_complex::Complex64;

    fn grid() -> Vec<f64> {
        (0..=160).map(|i| 0.4 + 0.01 * f64::from(i)).collect()
    }

    fn table() -> AmplitudeTable {
        let s = grid();
        let values: Vec<Complex64> = s
            .iter()
            .map(|&x| Complex64::from_polar(1.5 / (x + 0.3), 0.4 * x))
            .collect();
        AmplitudeTable::from_values(s, &values).expect("table")
    }

    #[test]
    fn magnitude_follows_table_and_tail() {
        let amplitude = MatchedAmplitude::new(&table(), MatchingSettings::default()).expect("matched");
        for s in [0.5, 0.9, 1.0, 1.4, 3.0] {
            let expected = 1.5 / (s + 0.3);
            assert!((amplitude.value(s) - expected).abs() < 1.0e-5, "s={s}");
        }
        assert_eq!(amplitude.uncertainty(1.2), 0.0);
        assert!(amplitude.uncertainty_function().is_none());
    }

    #[test]
    fn uncertainties_propagate_to_the_magnitude() {
        let base = table();
        let real_uncertainty: Vec<f64> = base.s().iter().map(|s| 0.1 / (s + 0.3)).collect();
        let imag_uncertainty = real_uncertainty.clone();
        let with_errors = base
            .with_uncertainties(real_uncertainty, imag_uncertainty)
            .expect("uncertainties");

        // dRe = dIm = d gives d|A| = d.
        let propagated = with_errors.magnitude_uncertainties().expect("propagated");
        for (index, &s) in with_errors.s().iter().enumerate() {
            assert!((propagated[index] - 0.1 / (s + 0.3)).abs() < 1.0e-14);
        }

        let amplitude =
            MatchedAmplitude::new(&with_errors, MatchingSettings::default()).expect("matched");
        assert!((amplitude.uncertainty(0.8) - 0.1 / 1.1).abs() < 1.0e-6);
        assert!((amplitude.uncertainty(4.0) - 0.1 / 4.3).abs() < 1.0e-5);
    }

    #[test]
    fn rising_uncertainty_keeps_the_central_value() {
        let base = table();
        let rising: Vec<f64> = base.s().iter().map(|s| 0.05 * s).collect();
        let with_errors = base
            .with_uncertainties(rising.clone(), rising)
            .expect("uncertainties");

        let amplitude =
            MatchedAmplitude::new(&with_errors, MatchingSettings::default()).expect("matched");
        assert!((amplitude.value(1.4) - 1.5 / 1.7).abs() < 1.0e-5);
        assert!(amplitude.uncertainty_function().is_none());
        assert!(amplitude.uncertainty(1.4).is_nan());
        assert!(matches!(
            amplitude.check_uncertainty(),
            Err(AmplitudeError::Matching(MatchError::PoleAboveMatchPoint { .. }))
        ));
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let error = AmplitudeTable::new(vec![0.0, 1.0], vec![1.0, 2.0], vec![1.0])
            .expect_err("short imaginary column");
        assert!(matches!(error, AmplitudeError::Interpolation(_)));
    }
}
