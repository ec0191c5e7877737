use crate::make_error;
use eyre::Report;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, JsonSchema)]
pub enum GeneStrand {
  #[serde(rename = "+")]
  Forward,
  #[serde(rename = "-")]
  Reverse,
}

/// A coding region of the reference genome, in zero-based half-open reference coordinates.
///
/// Invariants (enforced by [`Gene::new`]): `0 <= start < end <= ref_length`,
/// `length == end - start`, `length % 3 == 0`, `frame == start % 3`.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gene {
  pub name: String,
  pub start: usize,
  pub end: usize,
  pub strand: GeneStrand,
  pub frame: usize,
  pub length: usize,
}

impl Gene {
  pub fn new(name: impl Into<String>, start: usize, end: usize, strand: GeneStrand, ref_length: usize) -> Result<Self, Report> {
    let name = name.into();

    if name.is_empty() {
      return make_error!("Gene map: empty gene names are not allowed");
    }
    if start >= end || end > ref_length {
      return make_error!("Gene '{name}': range is invalid: ({start}, {end})");
    }

    let length = end - start;
    if length % 3 != 0 {
      return make_error!("Gene '{name}': length {length} is not divisible by 3. Start: {start}, end: {end}");
    }

    let frame = start % 3;

    Ok(Self {
      name,
      start,
      end,
      strand,
      frame,
      length,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn builds_a_valid_gene() {
    let gene = Gene::new("ORF1", 3, 30, GeneStrand::Forward, 100).unwrap();
    assert_eq!(gene.length, 27);
    assert_eq!(gene.frame, 0);
  }

  #[rstest]
  fn rejects_length_not_divisible_by_three() {
    assert!(Gene::new("ORF1", 0, 10, GeneStrand::Forward, 100).is_err());
  }

  #[rstest]
  fn rejects_inverted_range() {
    assert!(Gene::new("ORF1", 10, 5, GeneStrand::Forward, 100).is_err());
  }

  #[rstest]
  fn rejects_range_past_reference_end() {
    assert!(Gene::new("ORF1", 0, 9, GeneStrand::Forward, 6).is_err());
  }
}
