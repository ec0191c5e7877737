use crate::align::align::align_with_band;
use crate::align::score_matrix::ScoreParams;
use crate::alphabet::aa::{aa_letters_match, Aa};
use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::Nuc;
use crate::analyze::aa_changes::PeptideInternal;
use crate::coord::coord_map::CoordMap;
use crate::coord::range::Range;
use crate::error::NextalignError;
use crate::gene::gene::{Gene, GeneStrand};
use crate::strip::strip_insertions::strip_insertions;
use crate::translate::count_gaps::count_gaps;
use crate::translate::extract_gene::protect_first_codon;
use crate::translate::frame_shift_detector::{detect_frame_shifts, FrameShiftRange};
use crate::translate::translate::translate;

/// Sets every non-gap nucleotide inside a frame-shifted region to `N` (spec §4.E supplement:
/// the frame-shifted span is unreliable, so neither the later translation nor the nucleotide
/// change caller should read meaning into its exact letters).
fn mask_nuc_frame_shifts_in_place(seq: &mut [Nuc], frame_shifts: &[FrameShiftRange]) {
  for shift in frame_shifts {
    for nuc in &mut seq[shift.begin..shift.end] {
      if !nuc.is_gap() {
        *nuc = Nuc::N;
      }
    }
  }
}

/// Marks every peptide position whose codon falls (even partially) inside a frame-shifted
/// nucleotide range as the ambiguous amino acid `X`, since the underlying codon is unreliable.
fn mask_peptide_frame_shifts_in_place(peptide: &mut [Aa], gene_local_frame_shifts: &[FrameShiftRange]) {
  for (codon, aa) in peptide.iter_mut().enumerate() {
    let codon_range = Range::new(codon * 3, codon * 3 + 3);
    if gene_local_frame_shifts.iter().any(|fs| codon_range.intersects(&Range::new(fs.begin, fs.end))) && !aa.is_gap() {
      *aa = Aa::X;
    }
  }
}

/// Translates the reference copy of one gene (spec §4.F), run once per gene rather than once
/// per query sequence.
pub fn translate_ref_gene(
  aligned_ref: &[Nuc],
  gene: &Gene,
  coord_map: &CoordMap,
  translate_past_stop: bool,
) -> Result<PeptideInternal, NextalignError> {
  let mut ref_gene = coord_map.extract_gene(aligned_ref, gene);
  protect_first_codon(&mut ref_gene);
  let ref_gene_stripped: Vec<Nuc> = ref_gene.iter().copied().filter(|n| !n.is_gap()).collect();

  let seq = translate(&ref_gene_stripped, translate_past_stop).map_err(|_| NextalignError::GeneExtractionFailed {
    gene_name: gene.name.clone(),
    reason: "reference gene length is not divisible by 3 after gap stripping".to_owned(),
  })?;

  Ok(PeptideInternal {
    name: gene.name.clone(),
    seq,
  })
}

/// Maps a gene-local range (0-based, in the gene's own forward-reading coordinate system, as
/// produced by [`detect_frame_shifts`] over the gene-local aligned sequences) back into
/// whole-genome alignment coordinates, undoing the reverse-complementation `CoordMap::extract_gene`
/// applies for minus-strand genes.
fn gene_local_to_alignment_range(gene: &Gene, coord_map: &CoordMap, local_range: Range) -> Range {
  let ref_range = Range::new(gene.start, gene.end);
  let aln_range = coord_map.ref_to_aln_range(&ref_range);

  match gene.strand {
    GeneStrand::Forward => Range::new(aln_range.begin + local_range.begin, aln_range.begin + local_range.end),
    GeneStrand::Reverse => Range::new(aln_range.end - local_range.end, aln_range.end - local_range.begin),
  }
}

pub struct GeneTranslationResult {
  pub query_peptide: PeptideInternal,
  /// Frame-shifted ranges detected for this gene, already converted to whole-alignment
  /// coordinates (spec §3 `FrameShiftRange`).
  pub frame_shifts: Vec<Range>,
  pub insertions: Vec<crate::strip::strip_insertions::Insertion<Aa>>,
  pub peptide_alignment_score: i32,
}

/// Extracts, frame-shift-masks, translates and peptide-aligns one gene of one query sequence
/// (spec §4's per-gene control flow: F, E, F(mask), G). `ref_peptide` is the already-translated
/// reference peptide for this gene (see [`translate_ref_gene`]), computed once and shared
/// across all queries.
#[allow(clippy::too_many_arguments)]
pub fn translate_gene(
  aligned_query: &[Nuc],
  aligned_ref: &[Nuc],
  gene: &Gene,
  coord_map: &CoordMap,
  ref_peptide: &PeptideInternal,
  gap_open_close_aa: &[i32],
  score_params_aa: &ScoreParams,
  translate_past_stop: bool,
) -> Result<GeneTranslationResult, NextalignError> {
  let mut ref_gene = coord_map.extract_gene(aligned_ref, gene);
  let mut query_gene = coord_map.extract_gene(aligned_query, gene);

  let ref_gap_counts = count_gaps(&ref_gene);
  let query_gap_counts = count_gaps(&query_gene);

  if query_gene.is_empty() || query_gap_counts.total() >= query_gene.len() {
    return Err(NextalignError::GeneExtractionFailed {
      gene_name: gene.name.clone(),
      reason: "the gene consists entirely of gaps in this sequence".to_owned(),
    });
  }

  // NOTE: `+ 3` is slack to tolerate a handful of extra indels beyond what the gap counts predict.
  let band_width = (query_gap_counts.internal.max(ref_gap_counts.internal) / 3 + 3) as i32;
  let shift = query_gap_counts.leading as i32 + band_width / 2;

  protect_first_codon(&mut ref_gene);
  protect_first_codon(&mut query_gene);

  // Frame shifts must be detected before gaps introduced by alignment are stripped away.
  let gene_local_frame_shifts = detect_frame_shifts(&ref_gene, &query_gene);
  mask_nuc_frame_shifts_in_place(&mut query_gene, &gene_local_frame_shifts);

  let query_gene_stripped: Vec<Nuc> = query_gene.iter().copied().filter(|n| !n.is_gap()).collect();

  let query_peptide_raw = translate(&query_gene_stripped, translate_past_stop).map_err(|_| NextalignError::GeneExtractionFailed {
    gene_name: gene.name.clone(),
    reason: "query gene length is not divisible by 3 after frame-shift masking and gap stripping".to_owned(),
  })?;

  let peptide_alignment = align_with_band(
    &query_peptide_raw,
    &ref_peptide.seq,
    gap_open_close_aa,
    score_params_aa,
    band_width,
    shift,
    aa_letters_match,
  );

  let stripped = strip_insertions(&peptide_alignment.reff, &peptide_alignment.qry);
  let mut query_peptide_final = stripped.query_stripped;
  mask_peptide_frame_shifts_in_place(&mut query_peptide_final, &gene_local_frame_shifts);

  let frame_shifts = gene_local_frame_shifts
    .iter()
    .map(|fs| gene_local_to_alignment_range(gene, coord_map, Range::new(fs.begin, fs.end)))
    .collect();

  Ok(GeneTranslationResult {
    query_peptide: PeptideInternal {
      name: gene.name.clone(),
      seq: query_peptide_final,
    },
    frame_shifts,
    insertions: stripped.insertions,
    peptide_alignment_score: peptide_alignment.score,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::to_nuc_seq;
  use pretty_assertions::assert_eq;

  fn score_params() -> ScoreParams {
    ScoreParams {
      gap_extend: 0,
      score_match: 3,
      penalty_mismatch: 1,
    }
  }

  #[test]
  fn translates_a_gene_with_no_indels() {
    let aligned_ref = to_nuc_seq("ATGCGTACGTAA").unwrap();
    let aligned_query = aligned_ref.clone();
    let coord_map = CoordMap::new(&aligned_ref);
    let gene = Gene::new("ORF1", 0, 12, GeneStrand::Forward, 12).unwrap();

    let ref_peptide = translate_ref_gene(&aligned_ref, &gene, &coord_map, false).unwrap();
    let gap_open_close_aa = vec![-8; ref_peptide.seq.len() + 2];

    let result = translate_gene(
      &aligned_query,
      &aligned_ref,
      &gene,
      &coord_map,
      &ref_peptide,
      &gap_open_close_aa,
      &score_params(),
      false,
    )
    .unwrap();

    assert_eq!(result.query_peptide.seq, ref_peptide.seq);
    assert!(result.frame_shifts.is_empty());
  }

  #[test]
  fn fails_when_the_query_gene_is_entirely_gaps() {
    let aligned_ref = to_nuc_seq("ATGCGTACGTAA").unwrap();
    let aligned_query = to_nuc_seq("------------").unwrap();
    let coord_map = CoordMap::new(&aligned_ref);
    let gene = Gene::new("ORF1", 0, 12, GeneStrand::Forward, 12).unwrap();

    let ref_peptide = translate_ref_gene(&aligned_ref, &gene, &coord_map, false).unwrap();
    let gap_open_close_aa = vec![-8; ref_peptide.seq.len() + 2];

    let result = translate_gene(
      &aligned_query,
      &aligned_ref,
      &gene,
      &coord_map,
      &ref_peptide,
      &gap_open_close_aa,
      &score_params(),
      false,
    );

    assert!(matches!(result, Err(NextalignError::GeneExtractionFailed { .. })));
  }
}
