use crate::align::band_2d::Band2d;

pub const MATCH: i32 = 1 << 0;
pub const REF_GAP_MATRIX: i32 = 1 << 1;
pub const QRY_GAP_MATRIX: i32 = 1 << 2;
pub const REF_GAP_EXTEND: i32 = 1 << 3;
pub const QRY_GAP_EXTEND: i32 = 1 << 4;
pub const END_OF_SEQUENCE: i32 = -1;

pub struct ForwardTrace {
  pub scores: Band2d<i32>,
  pub paths: Band2d<i32>,
}

#[derive(Copy, Clone, Debug)]
pub struct ScoreParams {
  pub gap_extend: i32,
  pub score_match: i32,
  pub penalty_mismatch: i32,
}

/// Forward-fills the `scores`/`paths` band matrices (spec §4.B step 2). `letters_match`
/// decides whether a pair of letters score as a match or mismatch (IUPAC-aware).
pub fn score_matrix<L: Copy + Eq>(
  query: &[L],
  reff: &[L],
  gap_open_close: &[i32],
  band_width: i32,
  mean_shift: i32,
  params: &ScoreParams,
  letters_match: impl Fn(L, L) -> bool,
) -> ForwardTrace {
  let query_size = query.len() as i32;
  let ref_size = reff.len() as i32;
  let n_rows = (band_width * 2 + 1) as usize;
  let n_cols = (ref_size + 1) as usize;

  let mut paths: Band2d<i32> = Band2d::new(n_rows, n_cols);
  let mut scores: Band2d<i32> = Band2d::new(n_rows, n_cols);
  let mut qry_gaps = vec![0_i32; n_rows];

  let gap_extend = params.gap_extend;
  let gap_open = gap_open_close[0];
  let no_align = -(params.score_match + params.penalty_mismatch) * ref_size.max(1);

  for si in (band_width as usize + 1..n_rows).rev() {
    paths.set(si, 0, QRY_GAP_MATRIX);
  }
  paths.set(band_width as usize, 0, MATCH);
  qry_gaps[band_width as usize] = gap_open;
  for si in (0..band_width as usize).rev() {
    paths.set(si, 0, REF_GAP_MATRIX);
    qry_gaps[si] = gap_open;
  }

  for ri in 0..ref_size as usize {
    let mut q_pos = ri as i32 - (band_width + mean_shift);
    let mut ref_gaps = gap_open_close[ri];

    for si in (0..n_rows).rev() {
      let mut tmp_path = 0;
      let score;
      let origin;

      if q_pos < 0 {
        score = 0;
        tmp_path += QRY_GAP_EXTEND;
        ref_gaps = gap_open_close[ri];
        origin = QRY_GAP_MATRIX;
      } else if q_pos < query_size {
        let q_pos_u = q_pos as usize;
        let tmp_match = if letters_match(query[q_pos_u], reff[ri]) {
          params.score_match
        } else {
          -params.penalty_mismatch
        };
        let mut best_score = scores.get(si, ri) + tmp_match;
        let mut best_origin = MATCH;

        if si < n_rows - 1 {
          let r_gap_extend = ref_gaps + gap_extend;
          let r_gap_open = scores.get(si + 1, ri + 1) + gap_open_close[ri + 1];
          let tmp_score = if r_gap_extend > r_gap_open {
            tmp_path += REF_GAP_EXTEND;
            r_gap_extend
          } else {
            r_gap_open
          };
          ref_gaps = tmp_score;
          if best_score < tmp_score {
            best_score = tmp_score;
            best_origin = REF_GAP_MATRIX;
          }
        } else {
          ref_gaps = no_align;
        }

        if si > 0 {
          let q_gap_extend = qry_gaps[si - 1] + gap_extend;
          let q_gap_open = scores.get(si - 1, ri) + gap_open_close[ri];
          let tmp_score = if q_gap_extend > q_gap_open {
            tmp_path += QRY_GAP_EXTEND;
            q_gap_extend
          } else {
            q_gap_open
          };
          qry_gaps[si] = tmp_score;
          if best_score < tmp_score {
            best_score = tmp_score;
            best_origin = QRY_GAP_MATRIX;
          }
        } else {
          qry_gaps[si] = no_align;
        }

        score = best_score;
        origin = best_origin;
      } else {
        score = END_OF_SEQUENCE;
        origin = END_OF_SEQUENCE;
      }

      tmp_path += origin;
      paths.set(si, ri + 1, tmp_path);
      scores.set(si, ri + 1, score);
      q_pos += 1;
    }
  }

  ForwardTrace { scores, paths }
}
