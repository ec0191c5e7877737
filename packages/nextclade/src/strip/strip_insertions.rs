use crate::alphabet::letter::Letter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A run of query letters with no counterpart in the reference (spec §3 `Insertion<L>`).
/// `pos` is the reference coordinate immediately preceding the insertion.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insertion<L> {
  pub pos: usize,
  pub len: usize,
  pub ins: Vec<L>,
}

pub struct StripInsertionsResult<L> {
  pub query_stripped: Vec<L>,
  pub insertions: Vec<Insertion<L>>,
}

/// Removes query letters that sit opposite a reference gap (query insertions relative to the
/// reference), collecting them as [`Insertion`]s (spec §4.H). `aligned_ref` and `aligned_query`
/// must have equal length. Invariant: `result.query_stripped.len() <= aligned_ref`'s
/// non-gap length (== the un-gapped reference length).
pub fn strip_insertions<L: Letter<L>>(aligned_ref: &[L], aligned_query: &[L]) -> StripInsertionsResult<L> {
  assert_eq!(aligned_ref.len(), aligned_query.len());

  let mut query_stripped = Vec::with_capacity(aligned_ref.len());
  let mut insertions = Vec::new();

  let mut current_insertion: Vec<L> = Vec::new();
  let mut insertion_start = 0;
  let mut ref_pos = 0;

  for i in 0..aligned_ref.len() {
    if aligned_ref[i].is_gap() {
      if current_insertion.is_empty() {
        insertion_start = ref_pos;
      }
      current_insertion.push(aligned_query[i]);
    } else {
      query_stripped.push(aligned_query[i]);
      ref_pos += 1;

      if !current_insertion.is_empty() {
        insertions.push(Insertion {
          pos: insertion_start,
          len: current_insertion.len(),
          ins: std::mem::take(&mut current_insertion),
        });
      }
    }
  }

  if !current_insertion.is_empty() {
    insertions.push(Insertion {
      pos: insertion_start,
      len: current_insertion.len(),
      ins: current_insertion,
    });
  }

  StripInsertionsResult {
    query_stripped,
    insertions,
  }
}
