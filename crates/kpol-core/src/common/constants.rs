pub const PI: f64 = std::f64::consts::PI;
pub const TWO_PI: f64 = 2.0 * PI;
pub const FINE_STRUCTURE: f64 = 1.0 / 137.035_999_084_f64;

/// `e^2 = 4 pi alpha` in natural units.
pub const ELEMENTARY_CHARGE_SQUARED: f64 = 4.0 * PI * FINE_STRUCTURE;

/// Normalization of the two-photon discontinuity, `1 / (4 pi e^2 * 72)`.
pub const DISCONTINUITY_NORMALIZATION: f64 = 1.0 / (4.0 * PI * ELEMENTARY_CHARGE_SQUARED * 72.0);

pub fn elementary_charge() -> f64 {
    ELEMENTARY_CHARGE_SQUARED.sqrt()
}
