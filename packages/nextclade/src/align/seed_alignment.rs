use crate::align::params::SeedParameters;
use crate::alphabet::letter::Letter;
use crate::error::NextalignError;

/// Output of the seed-matching step (spec §3 `SeedAlignment`): placement and width of the band
/// within which the forward-fill / backtrace steps search for the optimal alignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SeedAlignment {
  pub mean_shift: i32,
  pub band_width: i32,
}

fn round(x: f64) -> i32 {
  x.round() as i32
}

/// `true` for the letter that marks a position as unsuitable to anchor a seed on: `N` for
/// nucleotides, `X` for amino acids. Letters report this through [`Letter::is_unknown`].
fn is_bad_letter<L: Letter<L>>(letter: L) -> bool {
  letter.is_unknown()
}

/// Query positions at least `seed_length` letters past the most recent bad (ambiguous) letter,
/// spaced `seed_length` apart, candidates for anchoring a seed.
fn map_to_good_positions<L: Letter<L>>(query: &[L], seed_length: usize) -> Vec<usize> {
  let mut good_positions = Vec::new();
  let mut distance_to_last_bad_pos: i64 = 0;

  for (i, &letter) in query.iter().enumerate() {
    if is_bad_letter(letter) {
      distance_to_last_bad_pos = -1;
    } else if distance_to_last_bad_pos > seed_length as i64 {
      good_positions.push(i - seed_length);
    }
    distance_to_last_bad_pos += 1;
  }

  good_positions
}

struct SeedMatch {
  shift: i32,
  score: i32,
}

/// Hamming-scores `kmer` against every window of `ref` starting at `start_pos`, returning the
/// best-scoring shift. Stops scanning a window early once it can no longer beat
/// `allowed_mismatches`, and stops scanning entirely on a perfect match.
fn seed_match<L: Letter<L>>(kmer: &[L], reff: &[L], start_pos: i32, allowed_mismatches: usize) -> SeedMatch {
  let ref_size = reff.len() as i32;
  let kmer_size = kmer.len() as i32;

  let mut max_score = 0;
  let mut max_shift = -1;

  let mut shift = start_pos;
  while shift < ref_size - kmer_size {
    let mut score = 0;
    for pos in 0..kmer_size {
      if kmer[pos as usize] == reff[(shift + pos) as usize] {
        score += 1;
      }
      if score + allowed_mismatches as i32 < pos {
        break;
      }
    }
    if score > max_score {
      max_score = score;
      max_shift = shift;
      if score == kmer_size {
        break;
      }
    }
    shift += 1;
  }

  SeedMatch {
    shift: max_shift,
    score: max_score,
  }
}

/// Finds the shift and width of the band the forward-fill step should search (spec §4.B step
/// 1). Generic over the letter alphabet so it serves both the nucleotide and peptide aligners.
pub fn seed_alignment<L: Letter<L>>(query: &[L], reff: &[L], seed_params: &SeedParameters) -> Result<SeedAlignment, NextalignError> {
  let ref_size = reff.len() as i32;
  let query_size = query.len() as i32;
  let seed_length = seed_params.seed_length;
  let allowed_mismatches = seed_params.mismatches_allowed;

  // Naive fallback for sequences too short to carry `2*seed_length` of band: skip seed search
  // entirely and center the band on the length difference between query and reference. Without
  // this, any query shorter than roughly `seed_length` (e.g. the short literal sequences in
  // end-to-end tests) would find fewer than two seeds and fail with `NoSeedMatches` even though
  // a short, ungapped or lightly-gapped alignment is perfectly representable in-band.
  let naive_band_width = round((ref_size + query_size) as f64 * 0.5) - 3;
  if naive_band_width < 2 * seed_length as i32 {
    return Ok(SeedAlignment {
      mean_shift: round((ref_size - query_size) as f64 * 0.5),
      band_width: naive_band_width,
    });
  }

  let n_seeds = seed_params.min_seeds.max(round(ref_size as f64 / seed_params.seed_spacing.max(1) as f64));
  let margin = round(ref_size as f64 / 300.0).min(30).max(0) as usize;

  let good_positions = map_to_good_positions(query, seed_length);
  let n_good_positions = good_positions.len();

  let mut seed_shifts = Vec::new();
  let mut start_pos = 0;

  if n_good_positions > 2 * margin + 1 && n_seeds > 1 {
    let seed_cover = (n_good_positions - 2 * margin) as f64;
    let kmer_spacing = (seed_cover - 1.0) / (n_seeds as f64 - 1.0);

    for ni in 0..n_seeds {
      let good_idx = round(margin as f64 + kmer_spacing * ni as f64);
      let good_idx = good_idx.clamp(0, n_good_positions as i32 - 1) as usize;
      let q_pos = good_positions[good_idx];

      let kmer_end = (q_pos + seed_length).min(query.len());
      if q_pos >= kmer_end {
        continue;
      }
      let kmer = &query[q_pos..kmer_end];

      let found = seed_match(kmer, reff, start_pos, allowed_mismatches);
      if found.score >= seed_length as i32 - allowed_mismatches as i32 {
        seed_shifts.push(found.shift - q_pos as i32);
        start_pos = found.shift;
      }
    }
  }

  if seed_shifts.len() < 2 {
    return Err(NextalignError::NoSeedMatches);
  }

  let min_shift = *seed_shifts.iter().min().unwrap();
  let max_shift = *seed_shifts.iter().max().unwrap();

  let mut mean_shift = round(0.5 * (min_shift + max_shift) as f64);
  let band_width = max_shift - min_shift + 9;

  if band_width < 2 * seed_length as i32 {
    mean_shift = round(0.5 * (ref_size - query_size) as f64);
  }

  Ok(SeedAlignment { mean_shift, band_width })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::to_nuc_seq;
  use pretty_assertions::assert_eq;

  #[test]
  fn finds_a_band_for_a_near_identical_sequence() {
    let reff = to_nuc_seq(&"ACGT".repeat(200)).unwrap();
    let query = reff.clone();
    let params = SeedParameters::nuc_defaults();

    let result = seed_alignment(&query, &reff, &params).unwrap();
    assert_eq!(result.mean_shift, 0);
  }

  #[test]
  fn fails_with_no_seed_matches_on_unrelated_sequences() {
    let reff = to_nuc_seq(&"ACGT".repeat(200)).unwrap();
    let query = to_nuc_seq(&"N".repeat(100)).unwrap();
    let params = SeedParameters::nuc_defaults();

    let result = seed_alignment(&query, &reff, &params);
    assert!(result.is_err());
  }
}
