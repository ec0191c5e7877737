use crate::qc::qc_config::QcRulesConfigPrivateMutations;
use crate::qc::qc_status::{qc_status_from_score, QcStatus};
use schemars::JsonSchema;
use serde::Serialize;

/// Result of the `privateMutations` rule: scores how many mutations the query carries that its
/// nearest tree node doesn't (spec §4.L, §4 QC rules). Counts substitutions, deletions and
/// insertions together.
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcResultPrivateMutations {
  pub score: f64,
  pub status: QcStatus,
  pub total: usize,
  pub excess: f64,
}

/// `score = max(0, total − typical) × 100 / cutoff`. Not capped at 100.
pub fn rule_private_mutations(
  num_substitutions: usize,
  num_deletions: usize,
  num_insertions: usize,
  config: &QcRulesConfigPrivateMutations,
) -> Option<QcResultPrivateMutations> {
  if !config.enabled {
    return None;
  }

  let total = num_substitutions + num_deletions + num_insertions;
  let excess = (0.0_f64).max(total as f64 - config.typical);
  let score = excess * 100.0 / config.cutoff;

  Some(QcResultPrivateMutations {
    score,
    status: qc_status_from_score(score),
    total,
    excess,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn config() -> QcRulesConfigPrivateMutations {
    QcRulesConfigPrivateMutations {
      enabled: true,
      typical: 5.0,
      cutoff: 25.0,
    }
  }

  #[test]
  fn scores_zero_at_or_below_typical() {
    let result = rule_private_mutations(3, 2, 0, &config()).unwrap();
    assert_eq!(result.total, 5);
    assert_eq!(result.score, 0.0);
  }

  #[test]
  fn scores_proportionally_above_typical() {
    let result = rule_private_mutations(20, 5, 5, &config()).unwrap();
    assert_eq!(result.total, 30);
    assert_eq!(result.score, (30.0 - 5.0) * 100.0 / 25.0);
  }
}
