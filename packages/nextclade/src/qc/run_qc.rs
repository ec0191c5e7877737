use crate::alphabet::nuc::Nuc;
use crate::analyze::aa_changes::PeptideInternal;
use crate::qc::qc_config::QcConfig;
use crate::qc::qc_status::{qc_status_from_score, QcStatus};
use crate::qc::rule_frame_shifts::{rule_frame_shifts, QcFrameShiftLocation, QcResultFrameShifts};
use crate::qc::rule_missing_data::{rule_missing_data, QcResultMissingData};
use crate::qc::rule_mixed_sites::{rule_mixed_sites, QcResultMixedSites};
use crate::qc::rule_private_mutations::{rule_private_mutations, QcResultPrivateMutations};
use crate::qc::rule_snp_clusters::{rule_snp_clusters, QcResultSnpClusters};
use crate::qc::rule_stop_codons::{find_stop_codons, rule_stop_codons, QcResultStopCodons};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Serialize;

/// Every input the QC rules need about one analyzed query, gathered in one place so
/// [`run_qc`] can stay a pure function of its arguments (spec §4's "QC" step of the per-sequence
/// control flow).
pub struct QcInputs<'a> {
  pub nucleotide_composition: &'a IndexMap<Nuc, usize>,
  pub private_substitution_positions: &'a [usize],
  pub num_private_substitutions: usize,
  pub num_private_deletions: usize,
  pub num_private_insertions: usize,
  pub query_peptides: &'a [PeptideInternal],
  pub frame_shifts: &'a [QcFrameShiftLocation],
}

/// Aggregate QC result for one query (spec §3/§6 `AnalysisResult.qc`). Every sub-result is
/// `None` when its rule was disabled in the dataset's `qc.json`.
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcResult {
  pub missing_data: Option<QcResultMissingData>,
  pub mixed_sites: Option<QcResultMixedSites>,
  pub private_mutations: Option<QcResultPrivateMutations>,
  pub snp_clusters: Option<QcResultSnpClusters>,
  pub frame_shifts: Option<QcResultFrameShifts>,
  pub stop_codons: Option<QcResultStopCodons>,
  pub overall_score: f64,
  pub overall_status: QcStatus,
}

/// Runs every enabled QC rule and aggregates the result (spec §4 QC aggregation):
/// `overallScore = sqrt(Σ ruleScore²)` over every enabled rule, bucketed into [`QcStatus`] the
/// same way each individual rule is.
pub fn run_qc(inputs: &QcInputs<'_>, config: &QcConfig) -> QcResult {
  let missing_data = config.missing_data.as_ref().and_then(|c| rule_missing_data(inputs.nucleotide_composition, c));
  let mixed_sites = config.mixed_sites.as_ref().and_then(|c| rule_mixed_sites(inputs.nucleotide_composition, c));
  let private_mutations = config.private_mutations.as_ref().and_then(|c| {
    rule_private_mutations(
      inputs.num_private_substitutions,
      inputs.num_private_deletions,
      inputs.num_private_insertions,
      c,
    )
  });
  let snp_clusters = config
    .snp_clusters
    .as_ref()
    .and_then(|c| rule_snp_clusters(inputs.private_substitution_positions, c));
  let frame_shifts = config.frame_shifts.as_ref().and_then(|c| rule_frame_shifts(inputs.frame_shifts, c));
  let stop_codons = config.stop_codons.as_ref().and_then(|c| {
    let found = find_stop_codons(inputs.query_peptides);
    rule_stop_codons(&found, c)
  });

  let scores = [
    missing_data.as_ref().map(|r| r.score),
    mixed_sites.as_ref().map(|r| r.score),
    private_mutations.as_ref().map(|r| r.score),
    snp_clusters.as_ref().map(|r| r.score),
    frame_shifts.as_ref().map(|r| r.score),
    stop_codons.as_ref().map(|r| r.score),
  ];

  let sum_of_squares: f64 = scores.iter().flatten().map(|s| s * s).sum();
  let overall_score = sum_of_squares.sqrt();

  QcResult {
    missing_data,
    mixed_sites,
    private_mutations,
    snp_clusters,
    frame_shifts,
    stop_codons,
    overall_score,
    overall_status: qc_status_from_score(overall_score),
  }
}
