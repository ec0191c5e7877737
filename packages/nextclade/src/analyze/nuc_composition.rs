use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::Nuc;
use indexmap::IndexMap;

/// Counts occurrences of each nucleotide letter in an aligned query (spec §4.I
/// `get_nucleotide_composition`). Backed by an `IndexMap` so callers that serialize this map
/// get a stable, first-seen iteration order rather than one shuffled by a hash.
pub fn get_nucleotide_composition(aligned_query: &[Nuc]) -> IndexMap<Nuc, usize> {
  let mut composition = IndexMap::new();
  for &nuc in aligned_query {
    *composition.entry(nuc).or_insert(0) += 1;
  }
  composition
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::to_nuc_seq;
  use pretty_assertions::assert_eq;

  #[test]
  fn counts_each_letter() {
    let seq = to_nuc_seq("AACGT").unwrap();
    let composition = get_nucleotide_composition(&seq);
    assert_eq!(composition.get(&Nuc::A), Some(&2));
    assert_eq!(composition.get(&Nuc::C), Some(&1));
    assert_eq!(composition.get(&Nuc::G), Some(&1));
    assert_eq!(composition.get(&Nuc::T), Some(&1));
    assert_eq!(composition.get(&Nuc::N), None);
  }
}
