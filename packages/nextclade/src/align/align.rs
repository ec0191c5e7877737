use crate::align::backtrace::back_trace;
use crate::align::params::SeedParameters;
use crate::align::score_matrix::{score_matrix, ScoreParams};
use crate::align::seed_alignment::seed_alignment;
use crate::alphabet::letter::Letter;
use crate::error::NextalignError;

/// A complete pairwise alignment of a query against a reference (spec §3 `Alignment<L>`).
/// Invariant: `ref.len() == qry.len()`.
#[derive(Clone, Debug)]
pub struct Alignment<L> {
  pub reff: Vec<L>,
  pub qry: Vec<L>,
  pub score: i32,
}

/// Banded, seeded, affine-gap Needleman-Wunsch alignment of `query` against `reff` (spec
/// §4.B). Generic over the letter alphabet: used both for the nucleotide alignment and, with
/// amino-acid scoring and gene-derived parameters, for the per-gene peptide alignment (§4.G).
#[allow(clippy::too_many_arguments)]
pub fn align<L: Letter<L>>(
  query: &[L],
  reff: &[L],
  gap_open_close: &[i32],
  min_length: usize,
  max_indel: usize,
  max_band_area: usize,
  seed_params: &SeedParameters,
  score_params: &ScoreParams,
  letters_match: impl Fn(L, L) -> bool,
) -> Result<Alignment<L>, NextalignError> {
  if query.len() < min_length {
    return Err(NextalignError::SequenceTooShort {
      length: query.len(),
      min_length,
    });
  }

  let seed = seed_alignment(query, reff, seed_params)?;

  if seed.band_width < 0 || seed.band_width as usize > max_indel {
    return Err(NextalignError::BadSeedMatches {
      reason: format!("band width {} exceeds the maximum allowed indel length {max_indel}", seed.band_width),
    });
  }

  let band_area = (2 * seed.band_width as usize + 1) * (reff.len() + 1);
  if band_area > max_band_area {
    return Err(NextalignError::BadSeedMatches {
      reason: format!("alignment band area {band_area} exceeds the configured maximum {max_band_area}"),
    });
  }

  let forward_trace = score_matrix(query, reff, gap_open_close, seed.band_width, seed.mean_shift, score_params, letters_match);

  let result = back_trace(query, reff, &forward_trace.scores, &forward_trace.paths, seed.mean_shift);

  Ok(Alignment {
    reff: result.reff,
    qry: result.query,
    score: result.alignment_score,
  })
}

/// Banded Needleman-Wunsch alignment with an externally supplied band width and mean shift,
/// bypassing seed search (spec §4.G): the peptide aligner derives its band geometry from the
/// nucleotide alignment's own gap counts rather than re-seeding on the (much shorter) peptide.
pub fn align_with_band<L: Letter<L>>(
  query: &[L],
  reff: &[L],
  gap_open_close: &[i32],
  score_params: &ScoreParams,
  band_width: i32,
  mean_shift: i32,
  letters_match: impl Fn(L, L) -> bool,
) -> Alignment<L> {
  let forward_trace = score_matrix(query, reff, gap_open_close, band_width, mean_shift, score_params, letters_match);
  let result = back_trace(query, reff, &forward_trace.scores, &forward_trace.paths, mean_shift);

  Alignment {
    reff: result.reff,
    qry: result.query,
    score: result.alignment_score,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::{from_nuc_seq, lookup_nuc_match_score, nuc_letters_match, to_nuc_seq, NucScores};
  use pretty_assertions::assert_eq;

  fn default_score_params() -> ScoreParams {
    ScoreParams {
      gap_extend: 0,
      score_match: 3,
      penalty_mismatch: 1,
    }
  }

  #[test]
  fn aligns_identical_sequences_without_gaps() {
    let reff = to_nuc_seq("ACGTACGTACGTACGTACGTACGTACGT").unwrap();
    let query = reff.clone();
    let gap_open_close = vec![-8; reff.len() + 2];
    let seed_params = SeedParameters::nuc_defaults();
    let score_params = default_score_params();

    let aln = align(
      &query,
      &reff,
      &gap_open_close,
      10,
      400,
      500_000_000,
      &seed_params,
      &score_params,
      nuc_letters_match,
    )
    .unwrap();

    assert_eq!(from_nuc_seq(&aln.reff), from_nuc_seq(&reff));
    assert_eq!(from_nuc_seq(&aln.qry), from_nuc_seq(&reff));
  }

  #[test]
  fn rejects_sequences_shorter_than_minimal_length() {
    let reff = to_nuc_seq("ACGTACGTACGTACGTACGTACGTACGT").unwrap();
    let query = to_nuc_seq("ACGT").unwrap();
    let gap_open_close = vec![-8; reff.len() + 2];
    let seed_params = SeedParameters::nuc_defaults();
    let score_params = default_score_params();

    let result = align(
      &query,
      &reff,
      &gap_open_close,
      10,
      400,
      500_000_000,
      &seed_params,
      &score_params,
      nuc_letters_match,
    );

    assert!(matches!(result, Err(NextalignError::SequenceTooShort { .. })));
  }

  #[test]
  fn aligns_a_single_deletion() {
    let reff = to_nuc_seq(&"ACGTACGATCGATGACTACGATCATGCATCA".repeat(3)).unwrap();
    let mut query = reff.clone();
    query.remove(20);
    let gap_open_close = vec![-8; reff.len() + 2];
    let seed_params = SeedParameters::nuc_defaults();
    let score_params = default_score_params();
    let scores = NucScores {
      score_match: 3,
      penalty_mismatch: 1,
    };

    let aln = align(
      &query,
      &reff,
      &gap_open_close,
      10,
      400,
      500_000_000,
      &seed_params,
      &score_params,
      |a, b| lookup_nuc_match_score(a, b, &scores) > 0,
    )
    .unwrap();

    assert_eq!(aln.reff.len(), aln.qry.len());
  }

  #[test]
  fn aligns_with_an_explicit_band_and_shift() {
    let reff = to_nuc_seq("ACGTACGATCGATGACTACGATCATGCATCA").unwrap();
    let query = reff.clone();
    let gap_open_close = vec![-8; reff.len() + 2];
    let score_params = default_score_params();

    let aln = align_with_band(&query, &reff, &gap_open_close, &score_params, 5, 0, nuc_letters_match);

    assert_eq!(from_nuc_seq(&aln.reff), from_nuc_seq(&reff));
    assert_eq!(from_nuc_seq(&aln.qry), from_nuc_seq(&reff));
  }
}
