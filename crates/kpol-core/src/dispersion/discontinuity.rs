//! Two-photon discontinuity of the kaon amplitude across the `K pi` cut.
//!
//! ```text
//! Disc(s)  = K lambda(s, m_pi^2, m_K^2)^{3/2} / s^2 |A(s)|^2
//! dDisc(s) = K lambda(s, m_pi^2, m_K^2)^{3/2} / s^2 2 |A(s)| d|A(s)|
//! ```
//!
//! with `K = 1 / (4 pi e^2 72)`. Both vanish below the threshold.

use crate::amplitude::AmplitudeMagnitude;
use crate::common::constants::DISCONTINUITY_NORMALIZATION;
use crate::common::masses::{MassTable, kallen};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Imaginary part on the cut together with its uncertainty.
pub trait Discontinuity: Send + Sync {
    /// Lower end `s_th` of the cut.
    fn threshold(&self) -> f64;

    fn value(&self, s: f64) -> f64;

    fn uncertainty(&self, s: f64) -> f64;
}

impl<T: Discontinuity + ?Sized> Discontinuity for Arc<T> {
    fn threshold(&self) -> f64 {
        (**self).threshold()
    }

    fn value(&self, s: f64) -> f64 {
        (**self).value(s)
    }

    fn uncertainty(&self, s: f64) -> f64 {
        (**self).uncertainty(s)
    }
}

/// Charge of the kaon in the `K pi` intermediate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntermediateKaon {
    #[default]
    Charged,
    Neutral,
}

#[derive(Debug, Clone)]
pub struct DiscontinuityModel<A> {
    charged: A,
    neutral: A,
    kaon: IntermediateKaon,
    masses: MassTable,
    threshold: f64,
}

impl<A: AmplitudeMagnitude> DiscontinuityModel<A> {
    pub fn new(charged: A, neutral: A, kaon: IntermediateKaon, masses: MassTable) -> Self {
        Self {
            charged,
            neutral,
            kaon,
            threshold: masses.kaon_pion_threshold(),
            masses,
        }
    }

    pub fn kaon(&self) -> IntermediateKaon {
        self.kaon
    }

    pub fn masses(&self) -> MassTable {
        self.masses
    }

    fn amplitude(&self) -> &A {
        match self.kaon {
            IntermediateKaon::Charged => &self.charged,
            IntermediateKaon::Neutral => &self.neutral,
        }
    }

    /// `K lambda^{3/2} / s^2`; `lambda` is clamped at zero so rounding at the
    /// threshold cannot produce NaN.
    pub fn phase_space(&self, s: f64) -> f64 {
        let lambda = kallen(s, self.masses.pion_squared(), self.masses.kaon_squared()).max(0.0);
        DISCONTINUITY_NORMALIZATION * lambda.powf(1.5) / (s * s)
    }
}

impl<A: AmplitudeMagnitude> Discontinuity for DiscontinuityModel<A> {
    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn value(&self, s: f64) -> f64 {
        if s < self.threshold {
            return 0.0;
        }
        let magnitude = self.amplitude().value(s);
        self.phase_space(s) * magnitude * magnitude
    }

    fn uncertainty(&self, s: f64) -> f64 {
        if s < self.threshold {
            return 0.0;
        }
        let amplitude = self.amplitude();
        self.phase_space(s) * 2.0 * amplitude.value(s) * amplitude.uncertainty(s)
    }
}
