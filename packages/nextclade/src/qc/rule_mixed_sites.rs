use crate::alphabet::nuc::Nuc;
use crate::qc::qc_config::QcRulesConfigMixedSites;
use crate::qc::qc_status::{qc_status_from_score, QcStatus};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Serialize;

/// Result of the `mixedSites` rule: scores the total count of ambiguous (non-`ACGTN`, non-gap)
/// nucleotide letters in the query (spec §4 QC rules).
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcResultMixedSites {
  pub score: f64,
  pub status: QcStatus,
  pub total_mixed_sites: usize,
}

/// `score = max(0, 100 × totalMixedSites / mixedSitesThreshold)`. Not capped at 100.
pub fn rule_mixed_sites(nucleotide_composition: &IndexMap<Nuc, usize>, config: &QcRulesConfigMixedSites) -> Option<QcResultMixedSites> {
  if !config.enabled {
    return None;
  }

  let total_mixed_sites: usize = nucleotide_composition
    .iter()
    .filter(|(&nuc, _)| !matches!(nuc, Nuc::A | Nuc::C | Nuc::G | Nuc::T | Nuc::N | Nuc::Gap))
    .map(|(_, &count)| count)
    .sum();

  let score = (0.0_f64).max(100.0 * total_mixed_sites as f64 / config.mixed_sites_threshold);

  Some(QcResultMixedSites {
    score,
    status: qc_status_from_score(score),
    total_mixed_sites,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn config() -> QcRulesConfigMixedSites {
    QcRulesConfigMixedSites {
      enabled: true,
      mixed_sites_threshold: 10.0,
    }
  }

  #[test]
  fn counts_only_ambiguous_letters() {
    let mut composition = IndexMap::new();
    composition.insert(Nuc::A, 100);
    composition.insert(Nuc::N, 5);
    composition.insert(Nuc::Gap, 3);
    composition.insert(Nuc::R, 2);
    composition.insert(Nuc::Y, 1);
    let result = rule_mixed_sites(&composition, &config()).unwrap();
    assert_eq!(result.total_mixed_sites, 3);
  }

  #[test]
  fn scores_proportionally_to_threshold() {
    let mut composition = IndexMap::new();
    composition.insert(Nuc::R, 5);
    let result = rule_mixed_sites(&composition, &config()).unwrap();
    assert_eq!(result.score, 50.0);
  }
}
