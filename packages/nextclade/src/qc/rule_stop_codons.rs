use crate::alphabet::aa::Aa;
use crate::analyze::aa_changes::PeptideInternal;
use crate::qc::qc_config::QcRulesConfigStopCodons;
use crate::qc::qc_status::{qc_status_from_score, QcStatus};
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::HashSet;

/// A premature (non-terminal) stop codon found in a translated query peptide.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopCodonLocation {
  pub gene_name: String,
  pub codon: usize,
}

/// Scans every translated gene for `Aa::Stop` codons that aren't the peptide's final residue
/// (spec §4 QC rules): a stop codon mid-sequence means the gene was likely disrupted.
pub fn find_stop_codons(query_peptides: &[PeptideInternal]) -> Vec<StopCodonLocation> {
  let mut result = Vec::new();

  for peptide in query_peptides {
    let last_codon = peptide.seq.len().saturating_sub(1);
    for (codon, &aa) in peptide.seq.iter().enumerate() {
      if aa == Aa::Stop && codon != last_codon {
        result.push(StopCodonLocation {
          gene_name: peptide.name.clone(),
          codon,
        });
      }
    }
  }

  result
}

/// Result of the `stopCodons` rule.
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcResultStopCodons {
  pub score: f64,
  pub status: QcStatus,
  pub stop_codons: Vec<StopCodonLocation>,
}

/// Binary rule: any unignored premature stop codon scores the maximum 100, otherwise 0.
pub fn rule_stop_codons(stop_codons: &[StopCodonLocation], config: &QcRulesConfigStopCodons) -> Option<QcResultStopCodons> {
  if !config.enabled {
    return None;
  }

  let ignored: HashSet<(String, usize)> = config
    .ignored_stop_codons
    .iter()
    .map(|c| (c.gene_name.clone(), c.codon))
    .collect();

  let stop_codons: Vec<StopCodonLocation> = stop_codons
    .iter()
    .filter(|s| !ignored.contains(&(s.gene_name.clone(), s.codon)))
    .cloned()
    .collect();

  let score = if stop_codons.is_empty() { 0.0 } else { 100.0 };

  Some(QcResultStopCodons {
    score,
    status: qc_status_from_score(score),
    stop_codons,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn peptide(name: &str, seq: Vec<Aa>) -> PeptideInternal {
    PeptideInternal { name: name.to_owned(), seq }
  }

  #[test]
  fn ignores_a_terminal_stop_codon() {
    let peptides = vec![peptide("ORF1", vec![Aa::M, Aa::A, Aa::Stop])];
    assert!(find_stop_codons(&peptides).is_empty());
  }

  #[test]
  fn flags_a_premature_stop_codon() {
    let peptides = vec![peptide("ORF1", vec![Aa::M, Aa::Stop, Aa::A])];
    let found = find_stop_codons(&peptides);
    assert_eq!(found, vec![StopCodonLocation { gene_name: "ORF1".to_owned(), codon: 1 }]);
  }

  #[test]
  fn scores_binary() {
    let config = QcRulesConfigStopCodons { enabled: true, ignored_stop_codons: vec![] };
    let found = vec![StopCodonLocation { gene_name: "ORF1".to_owned(), codon: 1 }];
    assert_eq!(rule_stop_codons(&found, &config).unwrap().score, 100.0);
    assert_eq!(rule_stop_codons(&[], &config).unwrap().score, 0.0);
  }

  #[test]
  fn excludes_ignored_stop_codons_from_scoring() {
    let config = QcRulesConfigStopCodons {
      enabled: true,
      ignored_stop_codons: vec![crate::qc::qc_config::QcRuleStopCodonLocationConfig {
        gene_name: "ORF1".to_owned(),
        codon: 1,
      }],
    };
    let found = vec![StopCodonLocation { gene_name: "ORF1".to_owned(), codon: 1 }];
    let result = rule_stop_codons(&found, &config).unwrap();
    assert!(result.stop_codons.is_empty());
    assert_eq!(result.score, 0.0);
  }
}
