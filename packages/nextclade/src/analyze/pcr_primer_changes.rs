use crate::alphabet::nuc::{nuc_letters_match, Nuc};
use crate::analyze::find_nuc_changes::NucleotideSubstitution;
use crate::coord::range::Range;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single ambiguous base within a primer's oligonucleotide, at a position within `range`
/// (spec §4.I supplement point 1).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NucleotideLocation {
  pub pos: usize,
  pub nuc: Nuc,
}

/// A PCR primer loaded from the primer CSV, located against the reference genome.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PcrPrimer {
  pub name: String,
  pub target: String,
  pub source: String,
  pub root_oligonuc: Vec<Nuc>,
  pub primer_oligonuc: Vec<Nuc>,
  pub range: Range,
  pub non_acgts: Vec<NucleotideLocation>,
}

/// A primer whose binding site was disrupted by one or more substitutions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PcrPrimerChange {
  pub primer: PcrPrimer,
  pub substitutions: Vec<NucleotideSubstitution>,
}

/// Whether `mutation` should be reported against `primer`: it must fall within the primer's
/// binding range, and must not be absorbed by an ambiguous base the primer already tolerates
/// at that position (spec §4.I supplement point 1).
fn should_report_primer_mutation(mutation: &NucleotideSubstitution, primer: &PcrPrimer) -> bool {
  if !primer.range.contains(mutation.pos) {
    return false;
  }

  let allowed = primer
    .non_acgts
    .iter()
    .any(|non_acgt| mutation.pos == non_acgt.pos && nuc_letters_match(non_acgt.nuc, mutation.query_nuc));

  !allowed
}

/// Attaches to each substitution the list of primers it disrupts, in place.
pub fn add_primer_changes_in_place(substitutions: &mut [NucleotideSubstitution], primers: &[PcrPrimer]) {
  for mutation in substitutions.iter_mut() {
    for primer in primers {
      if should_report_primer_mutation(mutation, primer) {
        mutation.pcr_primers_changed.push(primer.clone());
      }
    }
  }
}

/// Groups substitutions by the primer they disrupt (spec §4.I supplement point 1).
pub fn get_pcr_primer_changes(substitutions: &[NucleotideSubstitution], primers: &[PcrPrimer]) -> Vec<PcrPrimerChange> {
  let mut result = Vec::new();

  for primer in primers {
    let substitutions_selected: Vec<NucleotideSubstitution> = substitutions
      .iter()
      .filter(|mutation| should_report_primer_mutation(mutation, primer))
      .cloned()
      .collect();

    if !substitutions_selected.is_empty() {
      result.push(PcrPrimerChange {
        primer: primer.clone(),
        substitutions: substitutions_selected,
      });
    }
  }

  result
}
