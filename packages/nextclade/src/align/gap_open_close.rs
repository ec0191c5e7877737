use crate::align::params::AlignPairwiseParams;
use crate::gene::gene_map::GeneMap;

/// Builds the per-reference-position gap-open cost vector (spec §4.C): positions that fall on
/// a codon boundary of one of the selected genes are cheaper to open a gap at
/// (`penalty_gap_open_in_frame`) than positions elsewhere (`penalty_gap_open_out_of_frame`),
/// so that affine gap placement during alignment respects gene codon boundaries.
pub fn build_gap_open_close(ref_length: usize, gene_map: &GeneMap, params: &AlignPairwiseParams) -> Vec<i32> {
  // Penalties are stored as positive magnitudes (spec §3's ordering constraint reads
  // naturally that way); negate them here since `score_matrix` treats this vector as an
  // additive term and opening a gap must cost score, not reward it.
  let mut gap_open_close = vec![-params.penalty_gap_open_out_of_frame; ref_length + 2];

  for gene in gene_map.iter() {
    let mut i = gene.start;
    while i <= gene.end && i < gap_open_close.len() {
      gap_open_close[i] = -params.penalty_gap_open_in_frame;
      i += 3;
    }
  }

  gap_open_close
}
