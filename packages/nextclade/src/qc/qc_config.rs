use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Configuration for the `missingData` rule (spec §6 QC config JSON, §4 rule `missingData`).
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcRulesConfigMissingData {
  pub enabled: bool,
  pub missing_data_threshold: f64,
  pub score_bias: f64,
}

/// Configuration for the `mixedSites` rule.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcRulesConfigMixedSites {
  pub enabled: bool,
  pub mixed_sites_threshold: f64,
}

/// Configuration for the `privateMutations` rule.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcRulesConfigPrivateMutations {
  pub enabled: bool,
  pub typical: f64,
  pub cutoff: f64,
}

/// Configuration for the `snpClusters` rule.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcRulesConfigSnpClusters {
  pub enabled: bool,
  pub window_size: usize,
  pub cluster_cut_off: usize,
  pub score_weight: f64,
}

/// Configuration for the `frameShifts` rule. `ignored_frame_shifts` names frame shifts (by gene
/// and 1-based codon range, formatted the same way as the corresponding QC result field) known
/// in advance to be real biology rather than alignment artefacts, so they're excluded from
/// scoring.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcRulesConfigFrameShifts {
  pub enabled: bool,
  #[serde(default)]
  pub ignored_frame_shifts: Vec<String>,
}

/// Configuration for the `stopCodons` rule. `ignored_stop_codons` names gene/codon pairs known
/// to be legitimate premature stops, excluded from scoring the same way as `ignored_frame_shifts`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcRuleStopCodonLocationConfig {
  pub gene_name: String,
  pub codon: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcRulesConfigStopCodons {
  pub enabled: bool,
  #[serde(default)]
  pub ignored_stop_codons: Vec<QcRuleStopCodonLocationConfig>,
}

/// Top-level QC configuration (spec §6 QC config JSON), loaded from the dataset's
/// `qc.json`. Every sub-rule is optional and independently disableable: a rule absent from the
/// file, or present with `enabled: false`, contributes nothing to the aggregate score.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcConfig {
  pub missing_data: Option<QcRulesConfigMissingData>,
  pub mixed_sites: Option<QcRulesConfigMixedSites>,
  pub private_mutations: Option<QcRulesConfigPrivateMutations>,
  pub snp_clusters: Option<QcRulesConfigSnpClusters>,
  pub frame_shifts: Option<QcRulesConfigFrameShifts>,
  pub stop_codons: Option<QcRulesConfigStopCodons>,
}
