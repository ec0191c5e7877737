use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::{reverse_complement_in_place, Nuc};
use crate::coord::range::Range;
use crate::gene::gene::{Gene, GeneStrand};

/// "Alignment to reference": for each alignment position, the reference position it maps to.
/// Positions that fall on a reference gap (an insertion relative to the reference) map to the
/// index of the preceding non-gap reference position (or `0` if the alignment starts with gaps).
fn make_aln_to_ref_map(aligned_ref: &[Nuc]) -> Vec<usize> {
  let mut map = Vec::with_capacity(aligned_ref.len());
  let mut ref_pos = 0;

  for nuc in aligned_ref {
    if nuc.is_gap() {
      map.push(map.last().copied().unwrap_or(0));
    } else {
      map.push(ref_pos);
      ref_pos += 1;
    }
  }

  map
}

/// "Reference to alignment": for each reference position, the alignment position it was placed
/// at. Length equals the un-gapped reference length (spec §4.D).
fn make_ref_to_aln_map(aligned_ref: &[Nuc]) -> Vec<usize> {
  aligned_ref
    .iter()
    .enumerate()
    .filter(|(_, nuc)| !nuc.is_gap())
    .map(|(aln_pos, _)| aln_pos)
    .collect()
}

/// Converts positions and ranges between alignment coordinates (including gaps introduced by
/// H's insertion stripping) and reference coordinates.
#[derive(Clone, Debug)]
pub struct CoordMap {
  aln_to_ref_table: Vec<usize>,
  ref_to_aln_table: Vec<usize>,
}

impl CoordMap {
  /// Built from the aligned reference sequence before insertions (gaps in the reference) are
  /// stripped out.
  pub fn new(aligned_ref: &[Nuc]) -> Self {
    Self {
      aln_to_ref_table: make_aln_to_ref_map(aligned_ref),
      ref_to_aln_table: make_ref_to_aln_map(aligned_ref),
    }
  }

  pub fn aln_to_ref_position(&self, aln: usize) -> usize {
    self.aln_to_ref_table[aln]
  }

  pub fn ref_to_aln_position(&self, reff: usize) -> usize {
    self.ref_to_aln_table[reff]
  }

  pub fn aln_to_ref_range(&self, aln_range: &Range) -> Range {
    Range::new(
      self.aln_to_ref_table[aln_range.begin],
      self.aln_to_ref_table[aln_range.end - 1] + 1,
    )
  }

  pub fn ref_to_aln_range(&self, ref_range: &Range) -> Range {
    Range::new(
      self.ref_to_aln_table[ref_range.begin],
      self.ref_to_aln_table[ref_range.end - 1] + 1,
    )
  }

  /// Converts a position relative to the start of `gene` (in gene-local, always-forward-strand
  /// coordinates) into an absolute alignment position.
  pub fn feature_ref_to_aln_position(&self, gene: &Gene, ref_pos_rel: usize) -> usize {
    let ref_pos = match gene.strand {
      GeneStrand::Reverse => gene.end - 1 - ref_pos_rel,
      GeneStrand::Forward => gene.start + ref_pos_rel,
    };
    self.ref_to_aln_position(ref_pos)
  }

  /// Extracts the nucleotide sequence of `gene` out of a full aligned query sequence, reverse
  /// complementing it first if the gene lives on the minus strand (spec §9's resolved
  /// direction: always reverse-complement minus-strand genes, never conditionally).
  pub fn extract_gene(&self, full_aln_seq: &[Nuc], gene: &Gene) -> Vec<Nuc> {
    let ref_range = Range::new(gene.start, gene.end);
    let aln_range = self.ref_to_aln_range(&ref_range);
    let mut nucs = full_aln_seq[std::ops::Range::from(aln_range)].to_vec();

    if gene.strand == GeneStrand::Reverse {
      reverse_complement_in_place(&mut nucs);
    }

    nucs
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::to_nuc_seq;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn maps_positions_with_reference_gaps() {
    // Alignment has an insertion (ref gap) at position 2.
    let aligned_ref = to_nuc_seq("AC-GT").unwrap();
    let coord_map = CoordMap::new(&aligned_ref);

    assert_eq!(coord_map.aln_to_ref_position(0), 0);
    assert_eq!(coord_map.aln_to_ref_position(1), 1);
    assert_eq!(coord_map.aln_to_ref_position(2), 1); // insertion maps back to preceding ref pos
    assert_eq!(coord_map.aln_to_ref_position(3), 2);
    assert_eq!(coord_map.aln_to_ref_position(4), 3);

    assert_eq!(coord_map.ref_to_aln_position(0), 0);
    assert_eq!(coord_map.ref_to_aln_position(1), 1);
    assert_eq!(coord_map.ref_to_aln_position(2), 3);
    assert_eq!(coord_map.ref_to_aln_position(3), 4);
  }

  #[rstest]
  fn is_identity_when_there_are_no_gaps() {
    let aligned_ref = to_nuc_seq("ACGT").unwrap();
    let coord_map = CoordMap::new(&aligned_ref);
    for i in 0..4 {
      assert_eq!(coord_map.aln_to_ref_position(i), i);
      assert_eq!(coord_map.ref_to_aln_position(i), i);
    }
  }

  #[rstest]
  fn extracts_minus_strand_gene_reverse_complemented() {
    use crate::gene::gene::{Gene, GeneStrand};

    let aligned_ref = to_nuc_seq("ATGCGTACGT").unwrap();
    let coord_map = CoordMap::new(&aligned_ref);
    let gene = Gene::new("ORF1", 0, 6, GeneStrand::Reverse, 10).unwrap();

    let extracted = coord_map.extract_gene(&aligned_ref, &gene);
    assert_eq!(crate::alphabet::nuc::from_nuc_seq(&extracted), "ACGCAT");
  }
}
