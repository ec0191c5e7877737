use crate::alphabet::nuc::Nuc;
use crate::qc::qc_config::QcRulesConfigMissingData;
use crate::qc::qc_status::{qc_status_from_score, QcStatus};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Serialize;

/// Result of the `missingData` rule: scores how many `N`s the query carries beyond the
/// configured `score_bias` allowance (spec §4 QC rules).
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcResultMissingData {
  pub score: f64,
  pub status: QcStatus,
  pub total_missing: usize,
}

/// `score = max(0, (totalMissing − scoreBias) × 100 / missingDataThreshold)`. Unlike most other
/// rules this is not capped at 100 — a sequence can be arbitrarily far over threshold.
pub fn rule_missing_data(nucleotide_composition: &IndexMap<Nuc, usize>, config: &QcRulesConfigMissingData) -> Option<QcResultMissingData> {
  if !config.enabled {
    return None;
  }

  let total_missing = nucleotide_composition.get(&Nuc::N).copied().unwrap_or(0);
  let score = (0.0_f64).max((total_missing as f64 - config.score_bias) * 100.0 / config.missing_data_threshold);

  Some(QcResultMissingData {
    score,
    status: qc_status_from_score(score),
    total_missing,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn config() -> QcRulesConfigMissingData {
    QcRulesConfigMissingData {
      enabled: true,
      missing_data_threshold: 1500.0,
      score_bias: 300.0,
    }
  }

  #[test]
  fn scores_zero_below_the_bias() {
    let mut composition = IndexMap::new();
    composition.insert(Nuc::N, 100);
    let result = rule_missing_data(&composition, &config()).unwrap();
    assert_eq!(result.score, 0.0);
  }

  #[test]
  fn scores_proportionally_above_the_bias() {
    let mut composition = IndexMap::new();
    composition.insert(Nuc::N, 1800);
    let result = rule_missing_data(&composition, &config()).unwrap();
    assert_eq!(result.score, (1800.0 - 300.0) * 100.0 / 1500.0);
  }

  #[test]
  fn is_disabled_when_config_says_so() {
    let composition = IndexMap::new();
    let mut cfg = config();
    cfg.enabled = false;
    assert!(rule_missing_data(&composition, &cfg).is_none());
  }
}
