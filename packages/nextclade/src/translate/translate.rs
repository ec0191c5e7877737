use crate::alphabet::aa::{decode_codon, Aa};
use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::Nuc;
use crate::error::NextalignError;

/// Translates a nucleotide sequence into a peptide, one codon at a time (spec §4.F).
///
/// `translate_past_stop` controls what happens at the first non-ambiguous in-frame stop codon:
/// when `false` (the default, see `AlignPairwiseParams::no_translate_past_stop`), translation
/// halts there and the returned peptide is truncated at that codon; when `true`, translation
/// continues to the end of the sequence.
pub fn translate(nuc_seq: &[Nuc], translate_past_stop: bool) -> Result<Vec<Aa>, NextalignError> {
  if nuc_seq.len() % 3 != 0 {
    return Err(NextalignError::GeneExtractionFailed {
      gene_name: String::new(),
      reason: format!("nucleotide sequence length {} is not divisible by 3", nuc_seq.len()),
    });
  }

  let mut peptide = Vec::with_capacity(nuc_seq.len() / 3);
  for codon in nuc_seq.chunks_exact(3) {
    let aa = decode_codon([codon[0], codon[1], codon[2]]);
    let is_unambiguous_stop = aa == Aa::Stop;
    peptide.push(aa);
    if is_unambiguous_stop && !translate_past_stop {
      break;
    }
  }

  Ok(peptide)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::aa::from_aa_seq;
  use crate::alphabet::nuc::to_nuc_seq;
  use pretty_assertions::assert_eq;

  #[test]
  fn translates_a_simple_sequence() {
    let nucs = to_nuc_seq("ATGCGTTAA").unwrap();
    let peptide = translate(&nucs, false).unwrap();
    assert_eq!(from_aa_seq(&peptide), "MR*");
  }

  #[test]
  fn truncates_at_first_stop_by_default() {
    let nucs = to_nuc_seq("ATGTAACGT").unwrap();
    let peptide = translate(&nucs, false).unwrap();
    assert_eq!(from_aa_seq(&peptide), "M*");
  }

  #[test]
  fn continues_past_stop_when_requested() {
    let nucs = to_nuc_seq("ATGTAACGT").unwrap();
    let peptide = translate(&nucs, true).unwrap();
    assert_eq!(from_aa_seq(&peptide), "M*R");
  }

  #[test]
  fn rejects_length_not_divisible_by_three() {
    let nucs = to_nuc_seq("ATGC").unwrap();
    assert!(translate(&nucs, false).is_err());
  }
}
