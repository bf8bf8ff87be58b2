use serde::{Deserialize, Serialize};

/// Fusion weights for the hybrid score, applied before renormalization.
///
/// When a signal is unavailable for a pair, its weight is dropped and the
/// remaining weights are rescaled to sum to 1 — a missing signal never
/// counts as zero inside an un-rescaled sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridWeights {
    pub semantic: f64,
    pub form: f64,
    pub orthography: f64,
    pub sound: f64,
    pub skeleton: f64,
    /// Multiplicative boost for same-language-family pairs (0.0 disables).
    pub family_boost: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            semantic: 0.5,
            form: 0.2,
            orthography: 0.1,
            sound: 0.1,
            skeleton: 0.1,
            family_boost: 0.05,
        }
    }
}

impl HybridWeights {
    /// Sum of the five signal weights (excludes the family boost).
    pub fn signal_sum(&self) -> f64 {
        self.semantic + self.form + self.orthography + self.sound + self.skeleton
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sum_to_one() {
        let w = HybridWeights::default();
        assert!((w.signal_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn serde_default_fills_missing_fields() {
        let w: HybridWeights = serde_json::from_str("{\"semantic\": 0.9}").unwrap();
        assert_eq!(w.semantic, 0.9);
        assert_eq!(w.form, 0.2);
    }
}
