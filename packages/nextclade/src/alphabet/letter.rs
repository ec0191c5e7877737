use eyre::Report;

/// Common interface for the byte-sized letter alphabets used throughout the pipeline
/// (nucleotides and amino acids). Both alphabets are closed, totally ordered enumerations
/// with a dedicated `GAP` variant.
pub trait Letter<L>: Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Send + Sync
where
  L: Letter<L>,
{
  const GAP: L;
  const SIZE: usize;

  fn is_gap(&self) -> bool {
    *self == Self::GAP
  }

  fn is_unknown(&self) -> bool;

  fn from_char(c: char) -> Result<L, Report>;

  fn to_char(self) -> char;

  /// Index of this letter into its alphabet, used to index match/score tables.
  fn as_usize(self) -> usize;
}

/// Parses a string into a sequence of letters, validating every character.
pub fn parse_sequence<L: Letter<L>>(s: &str) -> Result<Vec<L>, Report> {
  s.chars().map(L::from_char).collect()
}

pub fn sequence_to_string<L: Letter<L>>(seq: &[L]) -> String {
  seq.iter().map(|&l| l.to_char()).collect()
}
