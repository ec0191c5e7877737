use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::Nuc;
use crate::make_error;
use derive_more::Display;
use eyre::Report;
use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The 20 canonical amino acids, ambiguity codes `B`, `J`, `Z`, `X`, the rare codon-table
/// residues `O`, `U`, the translation `STOP` and `GAP` (spec §3).
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize, Deserialize, JsonSchema)]
pub enum Aa {
  A = 0,
  R = 1,
  N = 2,
  D = 3,
  C = 4,
  Q = 5,
  E = 6,
  G = 7,
  H = 8,
  I = 9,
  L = 10,
  K = 11,
  M = 12,
  F = 13,
  P = 14,
  S = 15,
  T = 16,
  W = 17,
  Y = 18,
  V = 19,
  B = 20,
  J = 21,
  Z = 22,
  X = 23,
  O = 24,
  U = 25,
  Stop = 26,
  Gap = 27,
}

pub const AA_ALPHABET_SIZE: usize = 28;

impl Letter<Aa> for Aa {
  const GAP: Aa = Aa::Gap;
  const SIZE: usize = AA_ALPHABET_SIZE;

  fn is_unknown(&self) -> bool {
    *self == Aa::X
  }

  fn from_char(c: char) -> Result<Aa, Report> {
    match c.to_ascii_uppercase() {
      'A' => Ok(Aa::A),
      'R' => Ok(Aa::R),
      'N' => Ok(Aa::N),
      'D' => Ok(Aa::D),
      'C' => Ok(Aa::C),
      'Q' => Ok(Aa::Q),
      'E' => Ok(Aa::E),
      'G' => Ok(Aa::G),
      'H' => Ok(Aa::H),
      'I' => Ok(Aa::I),
      'L' => Ok(Aa::L),
      'K' => Ok(Aa::K),
      'M' => Ok(Aa::M),
      'F' => Ok(Aa::F),
      'P' => Ok(Aa::P),
      'S' => Ok(Aa::S),
      'T' => Ok(Aa::T),
      'W' => Ok(Aa::W),
      'Y' => Ok(Aa::Y),
      'V' => Ok(Aa::V),
      'B' => Ok(Aa::B),
      'J' => Ok(Aa::J),
      'Z' => Ok(Aa::Z),
      'X' => Ok(Aa::X),
      'O' => Ok(Aa::O),
      'U' => Ok(Aa::U),
      '*' => Ok(Aa::Stop),
      '-' | '.' => Ok(Aa::Gap),
      _ => make_error!("Invalid amino acid letter: '{c}'"),
    }
  }

  fn to_char(self) -> char {
    match self {
      Aa::A => 'A',
      Aa::R => 'R',
      Aa::N => 'N',
      Aa::D => 'D',
      Aa::C => 'C',
      Aa::Q => 'Q',
      Aa::E => 'E',
      Aa::G => 'G',
      Aa::H => 'H',
      Aa::I => 'I',
      Aa::L => 'L',
      Aa::K => 'K',
      Aa::M => 'M',
      Aa::F => 'F',
      Aa::P => 'P',
      Aa::S => 'S',
      Aa::T => 'T',
      Aa::W => 'W',
      Aa::Y => 'Y',
      Aa::V => 'V',
      Aa::B => 'B',
      Aa::J => 'J',
      Aa::Z => 'Z',
      Aa::X => 'X',
      Aa::O => 'O',
      Aa::U => 'U',
      Aa::Stop => '*',
      Aa::Gap => '-',
    }
  }

  #[inline]
  fn as_usize(self) -> usize {
    self as u8 as usize
  }
}

impl Aa {
  #[inline]
  pub fn is_gap(self) -> bool {
    self == Aa::Gap
  }
}

pub fn to_aa_seq(s: &str) -> Result<Vec<Aa>, Report> {
  crate::alphabet::letter::parse_sequence(s)
}

pub fn from_aa_seq(seq: &[Aa]) -> String {
  crate::alphabet::letter::sequence_to_string(seq)
}

/// `true` when two amino acids are interchangeable for scoring purposes: identical, or either
/// side is the ambiguous `X` (anything matches `X`), mirroring nucleotide ambiguity matching.
pub fn aa_letters_match(a: Aa, b: Aa) -> bool {
  if a == b {
    return true;
  }
  if a == Aa::Gap || b == Aa::Gap {
    return false;
  }
  a == Aa::X || b == Aa::X
}

#[derive(Copy, Clone, Debug)]
pub struct AaScores {
  pub score_match: i32,
  pub penalty_mismatch: i32,
}

#[inline]
pub fn lookup_aa_match_score(a: Aa, b: Aa, scores: &AaScores) -> i32 {
  if aa_letters_match(a, b) {
    scores.score_match
  } else {
    -scores.penalty_mismatch
  }
}

/// Decodes one codon into an amino acid (spec §4.A).
///
/// `(GAP,GAP,GAP)` decodes to `GAP`. Ambiguous codons are resolved by expanding every IUPAC
/// base into its set of canonical nucleotides, taking the Cartesian product, decoding each
/// concrete codon, and returning the unique amino acid if all resolutions agree, else `X`.
pub fn decode_codon(codon: [Nuc; 3]) -> Aa {
  if codon.iter().all(|n| n.is_gap()) {
    return Aa::Gap;
  }
  if codon.iter().any(|n| n.is_gap()) {
    // A codon that is partially gapped never determines a unique amino acid.
    return Aa::X;
  }

  let resolutions = codon[0]
    .resolve()
    .iter()
    .cartesian_product(codon[1].resolve().iter())
    .cartesian_product(codon[2].resolve().iter())
    .map(|((a, b), c)| decode_exact_codon(*a, *b, *c))
    .unique()
    .collect_vec();

  match resolutions.as_slice() {
    [single] => *single,
    _ => Aa::X,
  }
}

fn decode_exact_codon(a: Nuc, b: Nuc, c: Nuc) -> Aa {
  use Nuc::{A, C, G, T};
  match (a, b, c) {
    (T, T, T) | (T, T, C) => Aa::F,
    (T, T, A) | (T, T, G) | (C, T, T) | (C, T, C) | (C, T, A) | (C, T, G) => Aa::L,
    (A, T, T) | (A, T, C) | (A, T, A) => Aa::I,
    (A, T, G) => Aa::M,
    (G, T, T) | (G, T, C) | (G, T, A) | (G, T, G) => Aa::V,
    (T, C, T) | (T, C, C) | (T, C, A) | (T, C, G) | (A, G, T) | (A, G, C) => Aa::S,
    (C, C, T) | (C, C, C) | (C, C, A) | (C, C, G) => Aa::P,
    (A, C, T) | (A, C, C) | (A, C, A) | (A, C, G) => Aa::T,
    (G, C, T) | (G, C, C) | (G, C, A) | (G, C, G) => Aa::A,
    (T, A, T) | (T, A, C) => Aa::Y,
    (T, A, A) | (T, A, G) | (T, G, A) => Aa::Stop,
    (C, A, T) | (C, A, C) => Aa::H,
    (C, A, A) | (C, A, G) => Aa::Q,
    (A, A, T) | (A, A, C) => Aa::N,
    (A, A, A) | (A, A, G) => Aa::K,
    (G, A, T) | (G, A, C) => Aa::D,
    (G, A, A) | (G, A, G) => Aa::E,
    (T, G, T) | (T, G, C) => Aa::C,
    (T, G, G) => Aa::W,
    (C, G, T) | (C, G, C) | (C, G, A) | (C, G, G) | (A, G, A) | (A, G, G) => Aa::R,
    (G, G, T) | (G, G, C) | (G, G, A) | (G, G, G) => Aa::G,
    _ => Aa::X,
  }
}
