use crate::analyze::aa_changes::{AminoacidDeletion, AminoacidSubstitution};
use crate::analyze::find_nuc_changes::{NucleotideDeletion, NucleotideSubstitution};

/// Cross-links nucleotide and amino-acid changes in place (spec §4.I): for each nucleotide
/// substitution, attaches every amino-acid change whose `codon_nuc_range` contains the
/// substitution's position; for each nucleotide deletion, attaches every amino-acid change
/// whose `codon_nuc_range` intersects the deletion's range. The relation is stored on both
/// sides, but only one level deep: the amino-acid changes embedded on a nucleotide change (and
/// vice versa) carry empty link fields of their own, so the cross-link is finite.
pub fn link_nuc_and_aa_changes_in_place(
  nuc_substitutions: &mut [NucleotideSubstitution],
  nuc_deletions: &mut [NucleotideDeletion],
  aa_substitutions: &mut [AminoacidSubstitution],
  aa_deletions: &mut [AminoacidDeletion],
) {
  for nuc_sub in nuc_substitutions.iter_mut() {
    for aa_sub in aa_substitutions.iter() {
      if aa_sub.codon_nuc_range.contains(nuc_sub.pos) {
        nuc_sub.aa_substitutions.push(bare_aa_substitution(aa_sub));
      }
    }
    for aa_del in aa_deletions.iter() {
      if aa_del.codon_nuc_range.contains(nuc_sub.pos) {
        nuc_sub.aa_deletions.push(bare_aa_deletion(aa_del));
      }
    }
  }

  for nuc_del in nuc_deletions.iter_mut() {
    let nuc_del_range = nuc_del.range();
    for aa_sub in aa_substitutions.iter() {
      if aa_sub.codon_nuc_range.intersects(&nuc_del_range) {
        nuc_del.aa_substitutions.push(bare_aa_substitution(aa_sub));
      }
    }
    for aa_del in aa_deletions.iter() {
      if aa_del.codon_nuc_range.intersects(&nuc_del_range) {
        nuc_del.aa_deletions.push(bare_aa_deletion(aa_del));
      }
    }
  }

  for aa_sub in aa_substitutions.iter_mut() {
    for nuc_sub in nuc_substitutions.iter() {
      if aa_sub.codon_nuc_range.contains(nuc_sub.pos) {
        aa_sub.nuc_substitutions.push(bare_nuc_substitution(nuc_sub));
      }
    }
    for nuc_del in nuc_deletions.iter() {
      if aa_sub.codon_nuc_range.intersects(&nuc_del.range()) {
        aa_sub.nuc_deletions.push(bare_nuc_deletion(nuc_del));
      }
    }
  }

  for aa_del in aa_deletions.iter_mut() {
    for nuc_sub in nuc_substitutions.iter() {
      if aa_del.codon_nuc_range.contains(nuc_sub.pos) {
        aa_del.nuc_substitutions.push(bare_nuc_substitution(nuc_sub));
      }
    }
    for nuc_del in nuc_deletions.iter() {
      if aa_del.codon_nuc_range.intersects(&nuc_del.range()) {
        aa_del.nuc_deletions.push(bare_nuc_deletion(nuc_del));
      }
    }
  }
}

/// Clones an amino-acid substitution with its own link fields cleared, for embedding on the
/// nucleotide side without recursing.
fn bare_aa_substitution(aa_sub: &AminoacidSubstitution) -> AminoacidSubstitution {
  let mut bare = aa_sub.clone();
  bare.nuc_substitutions.clear();
  bare.nuc_deletions.clear();
  bare
}

fn bare_aa_deletion(aa_del: &AminoacidDeletion) -> AminoacidDeletion {
  let mut bare = aa_del.clone();
  bare.nuc_substitutions.clear();
  bare.nuc_deletions.clear();
  bare
}

fn bare_nuc_substitution(nuc_sub: &NucleotideSubstitution) -> NucleotideSubstitution {
  let mut bare = nuc_sub.clone();
  bare.aa_substitutions.clear();
  bare.aa_deletions.clear();
  bare
}

fn bare_nuc_deletion(nuc_del: &NucleotideDeletion) -> NucleotideDeletion {
  let mut bare = nuc_del.clone();
  bare.aa_substitutions.clear();
  bare.aa_deletions.clear();
  bare
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::aa::Aa;
  use crate::alphabet::nuc::Nuc;
  use crate::coord::range::Range;
  use pretty_assertions::assert_eq;

  fn make_nuc_substitution(pos: usize) -> NucleotideSubstitution {
    NucleotideSubstitution {
      ref_nuc: Nuc::A,
      pos,
      query_nuc: Nuc::T,
      pcr_primers_changed: Vec::new(),
      aa_substitutions: Vec::new(),
      aa_deletions: Vec::new(),
    }
  }

  fn make_nuc_deletion(start: usize, length: usize) -> NucleotideDeletion {
    NucleotideDeletion {
      start,
      length,
      aa_substitutions: Vec::new(),
      aa_deletions: Vec::new(),
    }
  }

  fn make_aa_substitution(codon_nuc_range: Range) -> AminoacidSubstitution {
    AminoacidSubstitution {
      gene: "ORF1".to_owned(),
      ref_aa: Aa::A,
      codon: codon_nuc_range.begin / 3,
      query_aa: Aa::P,
      codon_nuc_range,
      ref_context: Vec::new(),
      query_context: Vec::new(),
      context_nuc_range: codon_nuc_range,
      nuc_substitutions: Vec::new(),
      nuc_deletions: Vec::new(),
    }
  }

  #[test]
  fn links_a_substitution_whose_codon_contains_the_nuc_position() {
    let mut nuc_substitutions = vec![make_nuc_substitution(4)];
    let mut nuc_deletions = Vec::new();
    let mut aa_substitutions = vec![make_aa_substitution(Range::new(3, 6))];
    let mut aa_deletions = Vec::new();

    link_nuc_and_aa_changes_in_place(
      &mut nuc_substitutions,
      &mut nuc_deletions,
      &mut aa_substitutions,
      &mut aa_deletions,
    );

    assert_eq!(nuc_substitutions[0].aa_substitutions.len(), 1);
    assert_eq!(nuc_substitutions[0].aa_substitutions[0].codon, 1);
    assert_eq!(aa_substitutions[0].nuc_substitutions.len(), 1);
    assert_eq!(aa_substitutions[0].nuc_substitutions[0].pos, 4);
    // the cross-link is one level deep only
    assert!(aa_substitutions[0].nuc_substitutions[0].aa_substitutions.is_empty());
    assert!(nuc_substitutions[0].aa_substitutions[0].nuc_substitutions.is_empty());
  }

  #[test]
  fn links_a_deletion_intersecting_the_codon_range() {
    let mut nuc_substitutions = Vec::new();
    let mut nuc_deletions = vec![make_nuc_deletion(4, 2)];
    let mut aa_substitutions = vec![make_aa_substitution(Range::new(3, 6))];
    let mut aa_deletions = Vec::new();

    link_nuc_and_aa_changes_in_place(
      &mut nuc_substitutions,
      &mut nuc_deletions,
      &mut aa_substitutions,
      &mut aa_deletions,
    );

    assert_eq!(nuc_deletions[0].aa_substitutions.len(), 1);
    assert_eq!(aa_substitutions[0].nuc_deletions.len(), 1);
  }

  #[test]
  fn does_not_link_unrelated_positions() {
    let mut nuc_substitutions = vec![make_nuc_substitution(100)];
    let mut nuc_deletions = Vec::new();
    let mut aa_substitutions = vec![make_aa_substitution(Range::new(3, 6))];
    let mut aa_deletions = Vec::new();

    link_nuc_and_aa_changes_in_place(
      &mut nuc_substitutions,
      &mut nuc_deletions,
      &mut aa_substitutions,
      &mut aa_deletions,
    );

    assert!(nuc_substitutions[0].aa_substitutions.is_empty());
    assert!(aa_substitutions[0].nuc_substitutions.is_empty());
  }
}
