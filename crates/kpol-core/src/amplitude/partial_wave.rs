use super::AmplitudeError;
use super::magnitude::AmplitudeTable;
use crate::common::masses::{MassTable, kallen};
use crate::numerics::contour::{IntegrationStrategy, complex_integration};
use crate::numerics::interpolation::ComplexInterpolant;
use crate::numerics::quadrature::IntegrationRange;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubtractionConstants {
    pub a0: f64,
    pub a12: f64,
    pub b0: f64,
    pub b12: f64,
}

impl Default for SubtractionConstants {
    fn default() -> Self {
        Self {
            a0: 0.9,
            a12: 1.0,
            b0: -0.4,
            b12: 2.7,
        }
    }
}

/// Final-state charges of `gamma K -> K pi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// `K^- pi^0`
    ChargedKaonNeutralPion,
    /// `K^0 pi^-`
    NeutralKaonChargedPion,
    /// `K^0 pi^0`
    NeutralKaonNeutralPion,
    /// `K^- pi^+`
    ChargedKaonChargedPion,
}

impl Channel {
    pub const ALL: [Self; 4] = [
        Self::ChargedKaonNeutralPion,
        Self::NeutralKaonChargedPion,
        Self::NeutralKaonNeutralPion,
        Self::ChargedKaonChargedPion,
    ];

    pub const fn index(self) -> u32 {
        match self {
            Self::ChargedKaonNeutralPion => 1,
            Self::NeutralKaonChargedPion => 2,
            Self::NeutralKaonNeutralPion => 3,
            Self::ChargedKaonChargedPion => 4,
        }
    }
}

impl TryFrom<u32> for Channel {
    type Error = AmplitudeError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.index() == index)
            .ok_or(AmplitudeError::UnknownChannel { index })
    }
}

/// The eight tabulated basis functions.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisFunctions {
    pub f0_a: ComplexInterpolant,
    pub f0_b: ComplexInterpolant,
    pub f0_c: ComplexInterpolant,
    pub f12_a: ComplexInterpolant,
    pub f12_b: ComplexInterpolant,
    pub f12_c: ComplexInterpolant,
    pub g0: ComplexInterpolant,
    pub g_plus: ComplexInterpolant,
}

#[derive(Debug, Clone)]
pub struct PartialWaveCombination {
    basis: BasisFunctions,
    constants: SubtractionConstants,
    masses: MassTable,
    strategy: IntegrationStrategy,
}

impl PartialWaveCombination {
    pub fn new(
        basis: BasisFunctions,
        constants: SubtractionConstants,
        masses: MassTable,
        strategy: IntegrationStrategy,
    ) -> Self {
        Self {
            basis,
            constants,
            masses,
            strategy,
        }
    }

    pub fn constants(&self) -> SubtractionConstants {
        self.constants
    }

    /// `a0 f0_a + b0 f0_b + f0_c`; `f12` follows the same pattern.
    pub fn f0(&self, s: f64) -> Complex64 {
        let basis = &self.basis;
        self.constants.a0 * basis.f0_a.evaluate(s)
            + self.constants.b0 * basis.f0_b.evaluate(s)
            + basis.f0_c.evaluate(s)
    }

    pub fn f12(&self, s: f64) -> Complex64 {
        let basis = &self.basis;
        self.constants.a12 * basis.f12_a.evaluate(s)
            + self.constants.b12 * basis.f12_b.evaluate(s)
            + basis.f12_c.evaluate(s)
    }

    pub fn g_plus(&self, s: f64) -> Complex64 {
        self.basis.g_plus.evaluate(s)
    }

    pub fn g0(&self, s: f64) -> Complex64 {
        self.basis.g0.evaluate(s)
    }

    /// Momentum transfer `t(s, z)` at scattering-angle cosine `z`.
    pub fn t(&self, s: f64, z: f64) -> f64 {
        let kaon_squared = self.masses.kaon_squared();
        let pion_squared = self.masses.pion_squared();
        let delta = kaon_squared * (kaon_squared - pion_squared);
        let lambda = kallen(s, 0.0, kaon_squared).max(0.0).sqrt()
            * kallen(s, pion_squared, kaon_squared).max(0.0).sqrt();
        0.5 * (3.0 * self.masses.symmetric_point() - s + (lambda * z - delta) / s)
    }

    pub fn u(&self, s: f64, z: f64) -> f64 {
        3.0 * self.masses.symmetric_point() - s - self.t(s, z)
    }

    /// Channel amplitude `F(s) + Fhat(s)` above the `K pi` threshold.
    pub fn amplitude(&self, channel: Channel, s: f64) -> Result<Complex64, AmplitudeError> {
        let (direct, projected): (Complex64, Box<dyn Fn(f64, f64) -> Complex64 + '_>) =
            match channel {
                Channel::ChargedKaonNeutralPion => (
                    self.f12(s) - self.f0(s),
                    Box::new(|t: f64, u: f64| {
                        self.g_plus(t) - self.g0(t) + self.f12(u) - self.f0(u)
                    }),
                ),
                Channel::NeutralKaonChargedPion => (
                    -SQRT_2 * (self.f12(s) - self.f0(s)),
                    Box::new(|t: f64, u: f64| SQRT_2 * (self.g0(t) + self.f12(u) + self.f0(u))),
                ),
                Channel::NeutralKaonNeutralPion => (
                    self.f12(s) + self.f0(s),
                    Box::new(|t: f64, u: f64| {
                        self.g_plus(t) + self.g0(t) + self.f12(u) + self.f0(u)
                    }),
                ),
                Channel::ChargedKaonChargedPion => (
                    SQRT_2 * (self.f12(s) + self.f0(s)),
                    Box::new(|t: f64, u: f64| SQRT_2 * (self.g0(t) - self.f12(u) + self.f0(u))),
                ),
            };

        let integrand = |z: f64| 0.75 * (1.0 - z * z) * projected(self.t(s, z), self.u(s, z));
        let crossed = complex_integration(
            integrand,
            IntegrationRange::finite(-1.0, 1.0),
            self.strategy,
        )?;
        Ok(direct + crossed)
    }

    /// Tabulates `channel` on `threshold + k * step < s_max`.
    pub fn tabulate(
        &self,
        channel: Channel,
        s_max: f64,
        step: f64,
    ) -> Result<AmplitudeTable, AmplitudeError> {
        let threshold = self.masses.kaon_pion_threshold();
        if !step.is_finite() || step <= 0.0 || !s_max.is_finite() || s_max <= threshold + step {
            return Err(AmplitudeError::InvalidTabulation {
                threshold,
                s_max,
                step,
            });
        }

        let grid: Vec<f64> = (0_u32..)
            .map(|k| threshold + f64::from(k) * step)
            .take_while(|&s| s < s_max)
            .collect();
        let values = grid
            .iter()
            .map(|&s| self.amplitude(channel, s))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            channel = channel.index(),
            points = grid.len(),
            s_max,
            "tabulated partial-wave amplitude"
        );
        AmplitudeTable::from_values(grid, &values)
    }
}

#[cfg(test)]
mod tests {
    use super::{BasisFunctions, Channel, PartialWaveCombination, SubtractionConstants};
    use crate::amplitude::AmplitudeError;
    use crate::common::masses::MassTable;
    use crate::numerics::contour::IntegrationStrategy;
    use crate::numerics::interpolation::ComplexInterpolant;
    use num_complex::Complex64;
    use std::f64::consts::SQRT_2;

    fn constant(value: Complex64) -> ComplexInterpolant {
        ComplexInterpolant::new(
            vec![-1.0, 0.0, 1.0, 3.0],
            vec![value.re; 4],
            vec![value.im; 4],
        )
        .expect("constant basis function")
    }

    fn combination(strategy: IntegrationStrategy) -> PartialWaveCombination {
        let basis = BasisFunctions {
            f0_a: constant(Complex64::new(1.0, 0.0)),
            f0_b: constant(Complex64::new(0.0, 1.0)),
            f0_c: constant(Complex64::new(0.5, 0.0)),
            f12_a: constant(Complex64::new(2.0, 0.0)),
            f12_b: constant(Complex64::new(-1.0, 0.0)),
            f12_c: constant(Complex64::new(0.0, 1.0)),
            g0: constant(Complex64::new(0.0, -2.0)),
            g_plus: constant(Complex64::new(3.0, 0.0)),
        };
        PartialWaveCombination::new(
            basis,
            SubtractionConstants::default(),
            MassTable::default(),
            strategy,
        )
    }

    #[test]
    fn isospin_amplitudes_are_linear_in_subtraction_constants() {
        let combination = combination(IntegrationStrategy::default());
        assert!((combination.f0(0.7) - Complex64::new(1.4, -0.4)).norm() < 1.0e-14);
        assert!((combination.f12(0.7) - Complex64::new(-0.7, 1.0)).norm() < 1.0e-14);
    }

    #[test]
    fn channel_amplitudes_add_the_angular_projection() {
        // The projection weight 3/4 (1 - z^2) integrates to one on [-1, 1].
        let expected = [
            (Channel::ChargedKaonNeutralPion, Complex64::new(-1.2, 4.8)),
            (Channel::NeutralKaonChargedPion, SQRT_2 * Complex64::new(2.8, -2.8)),
            (Channel::NeutralKaonNeutralPion, Complex64::new(4.4, -0.8)),
            (Channel::ChargedKaonChargedPion, SQRT_2 * Complex64::new(2.8, -2.8)),
        ];
        for strategy in [IntegrationStrategy::default(), IntegrationStrategy::gauss_legendre()] {
            let combination = combination(strategy);
            for (channel, value) in expected {
                let actual = combination.amplitude(channel, 0.8).expect("amplitude");
                assert!((actual - value).norm() < 1.0e-10, "{channel:?}: {actual}");
            }
        }
    }

    #[test]
    fn mandelstam_variables_sum_to_the_mass_shell() {
        let combination = combination(IntegrationStrategy::default());
        let masses = MassTable::default();
        let total = 2.0 * masses.kaon_squared() + masses.pion_squared();
        for z in [-1.0, -0.3, 0.0, 0.8] {
            let s = 0.9;
            let sum = s + combination.t(s, z) + combination.u(s, z);
            assert!((sum - total).abs() < 1.0e-14, "z={z} sum={sum}");
        }
    }

    #[test]
    fn unknown_channel_index_is_a_domain_error() {
        assert_eq!(Channel::try_from(3_u32), Ok(Channel::NeutralKaonNeutralPion));
        assert_eq!(
            Channel::try_from(5_u32),
            Err(AmplitudeError::UnknownChannel { index: 5 })
        );
        for channel in Channel::ALL {
            assert_eq!(Channel::try_from(channel.index()), Ok(channel));
        }
    }

    #[test]
    fn tabulation_starts_at_threshold() {
        let combination = combination(IntegrationStrategy::default());
        let table = combination
            .tabulate(Channel::NeutralKaonNeutralPion, 0.5, 0.01)
            .expect("table");
        let threshold = MassTable::default().kaon_pion_threshold();
        assert_eq!(table.len(), 10);
        assert_eq!(table.s()[0], threshold);
        assert!(
            table
                .values()
                .iter()
                .all(|value| (value - Complex64::new(4.4, -0.8)).norm() < 1.0e-10)
        );

        let error = combination
            .tabulate(Channel::NeutralKaonNeutralPion, threshold, 0.01)
            .expect_err("empty range");
        assert!(matches!(error, AmplitudeError::InvalidTabulation { .. }));
    }
}
