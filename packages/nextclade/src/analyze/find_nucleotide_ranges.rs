use crate::alphabet::letter::Letter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A maximal run of one repeated letter satisfying a predicate (spec §3 `NucleotideRange`,
/// generalized here over the letter alphabet so it also serves amino-acid ranges). Half-open
/// `[begin, end)`, `end == begin + length`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRange<L> {
  pub begin: usize,
  pub end: usize,
  pub length: usize,
  pub character: L,
}

/// Finds maximal contiguous runs of one repeated letter value for which `pred` holds (spec
/// §4.I). Used for `missing` (`character == N`) and `nonACGTN` (`character` not in
/// `{A,C,G,T,N,GAP}`) ranges. A run never spans two different letters even if both satisfy
/// `pred` — e.g. an `R` immediately followed by a `Y` is two length-1 ranges, not one of length 2.
pub fn find_character_ranges<L: Letter<L>>(seq: &[L], pred: impl Fn(L) -> bool) -> Vec<CharacterRange<L>> {
  let mut ranges = Vec::new();
  let mut i = 0;

  while i < seq.len() {
    if pred(seq[i]) {
      let character = seq[i];
      let begin = i;
      while i < seq.len() && seq[i] == character {
        i += 1;
      }
      ranges.push(CharacterRange {
        begin,
        end: i,
        length: i - begin,
        character,
      });
    } else {
      i += 1;
    }
  }

  ranges
}
