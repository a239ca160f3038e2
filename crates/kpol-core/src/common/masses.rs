use serde::{Deserialize, Serialize};

/// Pion and kaon masses in GeV.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MassTable {
    pub pion: f64,
    pub kaon: f64,
}

impl Default for MassTable {
    fn default() -> Self {
        Self {
            pion: 0.139_570_18,
            kaon: 0.496,
        }
    }
}

impl MassTable {
    pub fn pion_squared(&self) -> f64 {
        self.pion * self.pion
    }

    pub fn kaon_squared(&self) -> f64 {
        self.kaon * self.kaon
    }

    /// Kaon-pion threshold `(m_pi + m_K)^2`.
    pub fn kaon_pion_threshold(&self) -> f64 {
        let sum = self.pion + self.kaon;
        sum * sum
    }

    /// Symmetric point `s0 = (2 m_K^2 + m_pi^2) / 3` of the `gamma K -> K pi` amplitude.
    pub fn symmetric_point(&self) -> f64 {
        (2.0 * self.kaon_squared() + self.pion_squared()) / 3.0
    }

    pub(crate) fn invalid_entry(&self) -> Option<(&'static str, f64)> {
        [("pion", self.pion), ("kaon", self.kaon)]
        .into_iter()
        .find(|(_, mass)| !mass.is_finite() || *mass <= 0.0)
    }
}

/// Källén triangle function `lambda(a, b, c)`.
pub fn kallen(a: f64, b: f64, c: f64) -> f64 {
    a * a + b * b + c * c - 2.0 * (a * b + b * c + a * c)
}

#[cfg(test)]
mod tests {
    use super::{MassTable, kallen};

    #[test]
    fn default_threshold_matches_physical_masses() {
        let masses = MassTable::default();
        let threshold = masses.kaon_pion_threshold();
        assert!((threshold - 0.403_949_453_7).abs() < 1.0e-9, "threshold={threshold}");
        assert!(masses.kaon_squared() < threshold);
    }

    #[test]
    fn kallen_vanishes_at_two_body_threshold() {
        let masses = MassTable::default();
        let value = kallen(
            masses.kaon_pion_threshold(),
            masses.pion_squared(),
            masses.kaon_squared(),
        );
        assert!(value.abs() < 1.0e-14, "lambda={value}");
        assert_eq!(kallen(4.0, 0.0, 0.0), 16.0);
    }

    #[test]
    fn invalid_entry_reports_first_non_positive_mass() {
        let masses = MassTable {
            kaon: 0.0,
            ..MassTable::default()
        };
        assert_eq!(masses.invalid_entry(), Some(("kaon", 0.0)));
        assert_eq!(MassTable::default().invalid_entry(), None);
    }
}
