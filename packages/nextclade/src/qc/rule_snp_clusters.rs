use crate::qc::qc_config::QcRulesConfigSnpClusters;
use crate::qc::qc_status::{qc_status_from_score, QcStatus};
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::VecDeque;

/// A run of reference positions, in ascending order, carrying more mutations than expected by
/// chance in a window of `window_size` (spec §4 QC rules).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredSnp {
  pub start: usize,
  pub end: usize,
  pub number_of_snps: usize,
}

/// Slides a window of `window_size` reference positions over `positions` (must be sorted
/// ascending) and records a cluster wherever more than `cluster_cut_off` mutated positions fall
/// within one window. Adjacent/overlapping clusters are merged into one, matching the original
/// rule's "keeps extending while the window keeps triggering" behavior.
pub fn find_snp_clusters(positions: &[usize], window_size: usize, cluster_cut_off: usize) -> Vec<ClusteredSnp> {
  let mut clusters: Vec<ClusteredSnp> = Vec::new();
  let mut window: VecDeque<usize> = VecDeque::new();

  for &pos in positions {
    window.push_back(pos);
    while let Some(&front) = window.front() {
      if pos - front > window_size {
        window.pop_front();
      } else {
        break;
      }
    }

    if window.len() > cluster_cut_off {
      let start = *window.front().unwrap();
      let end = pos + 1;
      let number_of_snps = window.len();

      let merges_into_previous = clusters.last().is_some_and(|last| start <= last.end);
      if merges_into_previous {
        let last = clusters.last_mut().unwrap();
        last.end = end;
        last.number_of_snps = last.number_of_snps.max(number_of_snps);
      } else {
        clusters.push(ClusteredSnp { start, end, number_of_snps });
      }
    }
  }

  clusters
}

/// Result of the `snpClusters` rule.
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcResultSnpClusters {
  pub score: f64,
  pub status: QcStatus,
  pub total_snps: usize,
  pub clusters: Vec<ClusteredSnp>,
}

/// `score = max(0, totalClusters × scoreWeight)`. `positions` must be sorted ascending.
pub fn rule_snp_clusters(positions: &[usize], config: &QcRulesConfigSnpClusters) -> Option<QcResultSnpClusters> {
  if !config.enabled {
    return None;
  }

  let clusters = find_snp_clusters(positions, config.window_size, config.cluster_cut_off);
  let score = (0.0_f64).max(clusters.len() as f64 * config.score_weight);

  Some(QcResultSnpClusters {
    score,
    status: qc_status_from_score(score),
    total_snps: positions.len(),
    clusters,
  })
}
