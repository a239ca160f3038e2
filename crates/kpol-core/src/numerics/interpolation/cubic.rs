use super::{InterpolationError, validate_samples};

/// Natural cubic spline through `(x_i, y_i)`.
///
/// Evaluation outside `[front, back]` returns the boundary sample instead of
/// extrapolating the end polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    second_derivatives: Vec<f64>,
}

impl CubicSpline {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, InterpolationError> {
        validate_samples(&x, &[("y", y.as_slice())])?;
        let second_derivatives = natural_second_derivatives(&x, &y);
        Ok(Self {
            x,
            y,
            second_derivatives,
        })
    }

    pub fn front(&self) -> f64 {
        self.x[0]
    }

    pub fn back(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    pub fn abscissae(&self) -> &[f64] {
        &self.x
    }

    pub fn ordinates(&self) -> &[f64] {
        &self.y
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let last = self.x.len() - 1;
        if x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[last] {
            return self.y[last];
        }

        let hi = self.x.partition_point(|&knot| knot < x).clamp(1, last);
        let lo = hi - 1;
        let width = self.x[hi] - self.x[lo];
        let a = (self.x[hi] - x) / width;
        let b = (x - self.x[lo]) / width;

        a * self.y[lo]
            + b * self.y[hi]
            + (width * width / 6.0)
                * ((a * a - 1.0) * a * self.second_derivatives[lo]
                    + (b * b - 1.0) * b * self.second_derivatives[hi])
    }
}

/// Second derivatives with `y''(front) = y''(back) = 0`, solved with the
/// Thomas algorithm on the interior tridiagonal system.
fn natural_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut second = vec![0.0; n];
    if n < 3 {
        return second;
    }

    let interior = n - 2;
    let mut diagonal = vec![0.0; interior];
    let mut upper = vec![0.0; interior];
    let mut rhs = vec![0.0; interior];

    for row in 0..interior {
        let i = row + 1;
        let h_left = x[i] - x[i - 1];
        let h_right = x[i + 1] - x[i];
        diagonal[row] = 2.0 * (h_left + h_right);
        upper[row] = h_right;
        rhs[row] = 6.0 * ((y[i + 1] - y[i]) / h_right - (y[i] - y[i - 1]) / h_left);
    }

    for row in 1..interior {
        let lower = x[row + 1] - x[row];
        let factor = lower / diagonal[row - 1];
        diagonal[row] -= factor * upper[row - 1];
        rhs[row] -= factor * rhs[row - 1];
    }

    second[interior] = rhs[interior - 1] / diagonal[interior - 1];
    for row in (0..interior - 1).rev() {
        second[row + 1] = (rhs[row] - upper[row] * second[row + 2]) / diagonal[row];
    }

    second
}

#[cfg(test)]
mod tests {
    use super::CubicSpline;
    use crate::numerics::interpolation::InterpolationError;

    fn assert_scalar_close(label: &str, expected: f64, actual: f64, abs_tol: f64, rel_tol: f64) {
        let abs_diff = (actual - expected).abs();
        let rel_diff = abs_diff / expected.abs().max(1.0);
        assert!(
            abs_diff <= abs_tol || rel_diff <= rel_tol,
            "{label} expected={expected:.15e} actual={actual:.15e} abs_diff={abs_diff:.15e} rel_diff={rel_diff:.15e}"
        );
    }

    #[test]
    fn spline_reproduces_knots_and_clamps_outside() {
        let x: Vec<f64> = (0..20).map(|i| 0.1 * f64::from(i)).collect();
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let spline = CubicSpline::new(x.clone(), y.clone()).expect("spline");

        for (&xi, &yi) in x.iter().zip(&y) {
            assert_scalar_close("knot", yi, spline.evaluate(xi), 1.0e-12, 0.0);
        }
        assert_eq!(spline.evaluate(-5.0), y[0]);
        assert_eq!(spline.evaluate(10.0), y[19]);
        assert_eq!(spline.evaluate(spline.back()), y[19]);
    }

    #[test]
    fn spline_is_accurate_between_knots() {
        let x: Vec<f64> = (0..41).map(|i| 0.05 * f64::from(i)).collect();
        let y: Vec<f64> = x.iter().map(|v| (-v).exp()).collect();
        let spline = CubicSpline::new(x, y).expect("spline");
        for x in [0.37_f64, 0.81, 1.234, 1.6] {
            assert_scalar_close("interior", (-x).exp(), spline.evaluate(x), 1.0e-6, 0.0);
        }
    }

    #[test]
    fn natural_spline_reproduces_straight_lines_exactly() {
        let spline = CubicSpline::new(vec![0.0, 1.0, 3.0, 4.5], vec![1.0, 3.0, 7.0, 10.0])
            .expect("line");
        assert_scalar_close("line", 5.0, spline.evaluate(2.0), 1.0e-14, 0.0);

        let two_points = CubicSpline::new(vec![0.0, 2.0], vec![1.0, 5.0]).expect("two points");
        assert_scalar_close("two points", 3.0, two_points.evaluate(1.0), 1.0e-14, 0.0);
    }

    #[test]
    fn rejects_invalid_samples() {
        assert_eq!(
            CubicSpline::new(vec![1.0], vec![2.0]),
            Err(InterpolationError::TooFewPoints { actual: 1 })
        );
        assert_eq!(
            CubicSpline::new(vec![0.0, 1.0, 1.0], vec![0.0, 1.0, 2.0]),
            Err(InterpolationError::NonIncreasing {
                index: 2,
                previous: 1.0,
                current: 1.0,
            })
        );
        assert!(matches!(
            CubicSpline::new(vec![0.0, 1.0], vec![0.0]),
            Err(InterpolationError::LengthMismatch { .. })
        ));
    }
}
