use crate::qc::qc_config::QcRulesConfigFrameShifts;
use crate::qc::qc_status::{qc_status_from_score, QcStatus};
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::HashSet;

/// A frame-shifted range detected in one gene (spec §4.E), named for QC reporting and for
/// matching against `ignored_frame_shifts`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcFrameShiftLocation {
  pub gene_name: String,
  pub codon_range: String,
}

/// Result of the `frameShifts` rule.
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcResultFrameShifts {
  pub score: f64,
  pub status: QcStatus,
  pub frame_shifts: Vec<QcFrameShiftLocation>,
}

/// Binary rule: any unignored frame shift scores the maximum 100, otherwise 0.
pub fn rule_frame_shifts(frame_shifts: &[QcFrameShiftLocation], config: &QcRulesConfigFrameShifts) -> Option<QcResultFrameShifts> {
  if !config.enabled {
    return None;
  }

  let ignored: HashSet<&String> = config.ignored_frame_shifts.iter().collect();
  let frame_shifts: Vec<QcFrameShiftLocation> = frame_shifts
    .iter()
    .filter(|fs| {
      let key = format!("{}:{}", fs.gene_name, fs.codon_range);
      !ignored.contains(&key)
    })
    .cloned()
    .collect();

  let score = if frame_shifts.is_empty() { 0.0 } else { 100.0 };

  Some(QcResultFrameShifts {
    score,
    status: qc_status_from_score(score),
    frame_shifts,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn location(gene: &str, range: &str) -> QcFrameShiftLocation {
    QcFrameShiftLocation {
      gene_name: gene.to_owned(),
      codon_range: range.to_owned(),
    }
  }

  #[test]
  fn scores_binary() {
    let config = QcRulesConfigFrameShifts { enabled: true, ignored_frame_shifts: vec![] };
    assert_eq!(rule_frame_shifts(&[location("ORF1", "10-20")], &config).unwrap().score, 100.0);
    assert_eq!(rule_frame_shifts(&[], &config).unwrap().score, 0.0);
  }

  #[test]
  fn excludes_ignored_frame_shifts() {
    let config = QcRulesConfigFrameShifts {
      enabled: true,
      ignored_frame_shifts: vec!["ORF1:10-20".to_owned()],
    };
    let result = rule_frame_shifts(&[location("ORF1", "10-20")], &config).unwrap();
    assert!(result.frame_shifts.is_empty());
    assert_eq!(result.score, 0.0);
  }
}
