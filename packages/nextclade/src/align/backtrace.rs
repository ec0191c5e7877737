use crate::align::band_2d::Band2d;
use crate::align::score_matrix::{MATCH, QRY_GAP_EXTEND, QRY_GAP_MATRIX, REF_GAP_EXTEND, REF_GAP_MATRIX};
use crate::alphabet::letter::Letter;

pub struct AlignmentResult<L> {
  pub query: Vec<L>,
  pub reff: Vec<L>,
  pub alignment_score: i32,
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum BacktraceMode {
  Best,
  InRefGap,
  InQryGap,
}

/// Walks the `paths` bitmask matrix back from the best-scoring band cell to produce the final
/// gapped alignment (spec §4.B step 3).
pub fn back_trace<L: Letter<L>>(query: &[L], reff: &[L], scores: &Band2d<i32>, paths: &Band2d<i32>, mean_shift: i32) -> AlignmentResult<L> {
  let row_length = scores.num_cols() as i32;
  let scores_size = scores.num_rows() as i32;
  let query_size = query.len() as i32;
  let ref_size = reff.len() as i32;
  let band_width = (scores_size - 1) / 2;

  let index_to_shift = |si: i32| si - band_width + mean_shift;

  let mut last_index_by_shift = vec![0_i32; scores_size as usize];
  let mut last_score_by_shift = vec![0_i32; scores_size as usize];

  let mut si = 0;
  let mut best_score = 0;
  for i in 0..scores_size {
    let shift = index_to_shift(i);
    let last_index = (row_length - 1).min(query_size + shift);
    last_index_by_shift[i as usize] = last_index;
    last_score_by_shift[i as usize] = *scores.get(i as usize, last_index as usize);
    if last_score_by_shift[i as usize] > best_score {
      best_score = last_score_by_shift[i as usize];
      si = i;
    }
  }

  let shift = index_to_shift(si);
  let mut r_pos = last_index_by_shift[si as usize] - 1;
  let mut q_pos = r_pos - shift;

  let mut aln_query: Vec<L> = Vec::with_capacity((row_length + 3 * band_width) as usize);
  let mut aln_ref: Vec<L> = Vec::with_capacity((row_length + 3 * band_width) as usize);

  if r_pos < ref_size - 1 {
    for ii in (r_pos + 1..ref_size).rev() {
      aln_query.push(L::GAP);
      aln_ref.push(reff[ii as usize]);
    }
  } else if q_pos < query_size - 1 {
    for ii in (q_pos + 1..query_size).rev() {
      aln_query.push(query[ii as usize]);
      aln_ref.push(L::GAP);
    }
  }

  let mut mode = BacktraceMode::Best;
  let mut si = si;

  while r_pos >= 0 && q_pos >= 0 {
    let origin = *paths.get(si as usize, (r_pos + 1) as usize);

    if origin & MATCH != 0 && mode == BacktraceMode::Best {
      aln_query.push(query[q_pos as usize]);
      aln_ref.push(reff[r_pos as usize]);
      q_pos -= 1;
      r_pos -= 1;
    } else if (origin & REF_GAP_MATRIX != 0 && mode == BacktraceMode::Best) || mode == BacktraceMode::InRefGap {
      aln_query.push(query[q_pos as usize]);
      aln_ref.push(L::GAP);
      q_pos -= 1;
      si += 1;
      mode = if origin & REF_GAP_EXTEND != 0 {
        BacktraceMode::InRefGap
      } else {
        BacktraceMode::Best
      };
    } else if (origin & QRY_GAP_MATRIX != 0 && mode == BacktraceMode::Best) || mode == BacktraceMode::InQryGap {
      aln_query.push(L::GAP);
      aln_ref.push(reff[r_pos as usize]);
      r_pos -= 1;
      si -= 1;
      mode = if origin & QRY_GAP_EXTEND != 0 {
        BacktraceMode::InQryGap
      } else {
        BacktraceMode::Best
      };
    } else {
      break;
    }
  }

  if r_pos >= 0 {
    for ii in (0..=r_pos).rev() {
      aln_query.push(L::GAP);
      aln_ref.push(reff[ii as usize]);
    }
  } else if q_pos >= 0 {
    for ii in (0..=q_pos).rev() {
      aln_query.push(query[ii as usize]);
      aln_ref.push(L::GAP);
    }
  }

  aln_query.reverse();
  aln_ref.reverse();

  AlignmentResult {
    query: aln_query,
    reff: aln_ref,
    alignment_score: best_score,
  }
}
