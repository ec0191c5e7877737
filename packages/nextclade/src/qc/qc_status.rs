use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coarse quality bucket assigned from a numeric QC score (spec §9 Open Question, resolved):
/// `good` below 30, `mediocre` below 100, `bad` otherwise. Applied both per-rule and to the
/// aggregate score.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QcStatus {
  Good,
  Mediocre,
  Bad,
}

pub fn qc_status_from_score(score: f64) -> QcStatus {
  if score < 30.0 {
    QcStatus::Good
  } else if score < 100.0 {
    QcStatus::Mediocre
  } else {
    QcStatus::Bad
  }
}
