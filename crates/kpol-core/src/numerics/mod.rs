pub mod contour;
pub mod derivative;
pub mod interpolation;
pub mod piecewise;
pub mod quadrature;

pub use contour::{
    ContourIntegral, IntegrationStrategy, complex_integration, curve_derivative, imag_parts,
    integrate_along, integrate_curve, real_parts,
};
pub use derivative::{DerivativeError, DerivativeEstimate, central_derivative};
pub use interpolation::{
    ComplexInterpolant, CubicSpline, InterpolationError, sample, sample_along,
};
pub use piecewise::{Piece, PiecewiseCurve, PiecewiseError, PiecewiseFunction};
pub use quadrature::{
    AdaptiveGaussKronrod, AdaptiveSettings, GaussLegendre, IntegrationRange, Quadrature,
    QuadratureError, QuadratureValue,
};
