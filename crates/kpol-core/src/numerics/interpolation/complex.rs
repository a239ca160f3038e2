use super::{CubicSpline, InterpolationError};
use num_complex::Complex64;

/// Complex data interpolated by two independent cubic splines over one set of
/// abscissae. Outside `[front, back]` each part is clamped to its boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexInterpolant {
    real: CubicSpline,
    imag: CubicSpline,
}

impl ComplexInterpolant {
    pub fn new(x: Vec<f64>, real: Vec<f64>, imag: Vec<f64>) -> Result<Self, InterpolationError> {
        super::validate_samples(&x, &[("real", real.as_slice()), ("imag", imag.as_slice())])?;
        Ok(Self {
            real: CubicSpline::new(x.clone(), real)?,
            imag: CubicSpline::new(x, imag)?,
        })
    }

    pub fn from_values(x: Vec<f64>, values: &[Complex64]) -> Result<Self, InterpolationError> {
        let real = values.iter().map(|value| value.re).collect();
        let imag = values.iter().map(|value| value.im).collect();
        Self::new(x, real, imag)
    }

    /// Builds the interpolant from `|z| e^{i arg z}` samples.
    pub fn from_polar(
        x: Vec<f64>,
        magnitude: &[f64],
        phase: &[f64],
    ) -> Result<Self, InterpolationError> {
        if phase.len() != magnitude.len() {
            return Err(InterpolationError::LengthMismatch {
                field: "phase",
                x: magnitude.len(),
                actual: phase.len(),
            });
        }
        let values: Vec<Complex64> = magnitude
            .iter()
            .zip(phase)
            .map(|(&norm, &arg)| Complex64::from_polar(norm, arg))
            .collect();
        Self::from_values(x, &values)
    }

    pub fn evaluate(&self, x: f64) -> Complex64 {
        Complex64::new(self.real.evaluate(x), self.imag.evaluate(x))
    }

    pub fn front(&self) -> f64 {
        self.real.front()
    }

    pub fn back(&self) -> f64 {
        self.real.back()
    }

    pub fn real_part(&self) -> &CubicSpline {
        &self.real
    }

    pub fn imag_part(&self) -> &CubicSpline {
        &self.imag
    }
}

/// Interpolates `curve` through the points `(t_k, curve(t_k))`.
///
/// `abscissae` must be ascending with at least two entries; the result is
/// defined at both end points.
pub fn sample<C>(curve: C, abscissae: &[f64]) -> Result<ComplexInterpolant, InterpolationError>
where
    C: Fn(f64) -> Complex64,
{
    let values: Vec<Complex64> = abscissae.iter().map(|&t| curve(t)).collect();
    ComplexInterpolant::from_values(abscissae.to_vec(), &values)
}

/// Interpolates `function` along `curve`, i.e. through `(t_k, function(curve(t_k)))`.
pub fn sample_along<F, C>(
    function: F,
    curve: C,
    abscissae: &[f64],
) -> Result<ComplexInterpolant, InterpolationError>
where
    F: Fn(Complex64) -> Complex64,
    C: Fn(f64) -> Complex64,
{
    sample(|t| function(curve(t)), abscissae)
}
