use crate::alphabet::letter::Letter;
use crate::make_error;
use derive_more::Display;
use eyre::Report;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The 15 IUPAC nucleotide ambiguity codes plus the alignment gap.
///
/// Ordered the way the original implementation lays out its match table
/// (`U, T, A, W, C, Y, M, H, G, K, R, D, S, B, V, N, GAP`), so that `as_usize()` can be used
/// directly as an index into [`NUC_MATCH_TABLE`].
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize, Deserialize, JsonSchema)]
pub enum Nuc {
  U = 0,
  T = 1,
  A = 2,
  W = 3,
  C = 4,
  Y = 5,
  M = 6,
  H = 7,
  G = 8,
  K = 9,
  R = 10,
  D = 11,
  S = 12,
  B = 13,
  V = 14,
  N = 15,
  Gap = 16,
}

pub const NUC_ALPHABET_SIZE: usize = 17;

impl Letter<Nuc> for Nuc {
  const GAP: Nuc = Nuc::Gap;
  const SIZE: usize = NUC_ALPHABET_SIZE;

  fn is_unknown(&self) -> bool {
    *self == Nuc::N
  }

  fn from_char(c: char) -> Result<Nuc, Report> {
    match c.to_ascii_uppercase() {
      'U' => Ok(Nuc::U),
      'T' => Ok(Nuc::T),
      'A' => Ok(Nuc::A),
      'W' => Ok(Nuc::W),
      'C' => Ok(Nuc::C),
      'Y' => Ok(Nuc::Y),
      'M' => Ok(Nuc::M),
      'H' => Ok(Nuc::H),
      'G' => Ok(Nuc::G),
      'K' => Ok(Nuc::K),
      'R' => Ok(Nuc::R),
      'D' => Ok(Nuc::D),
      'S' => Ok(Nuc::S),
      'B' => Ok(Nuc::B),
      'V' => Ok(Nuc::V),
      'N' => Ok(Nuc::N),
      '-' | '.' => Ok(Nuc::Gap),
      _ => make_error!("Invalid nucleotide letter: '{c}'"),
    }
  }

  fn to_char(self) -> char {
    match self {
      Nuc::U => 'U',
      Nuc::T => 'T',
      Nuc::A => 'A',
      Nuc::W => 'W',
      Nuc::C => 'C',
      Nuc::Y => 'Y',
      Nuc::M => 'M',
      Nuc::H => 'H',
      Nuc::G => 'G',
      Nuc::K => 'K',
      Nuc::R => 'R',
      Nuc::D => 'D',
      Nuc::S => 'S',
      Nuc::B => 'B',
      Nuc::V => 'V',
      Nuc::N => 'N',
      Nuc::Gap => '-',
    }
  }

  #[inline]
  fn as_usize(self) -> usize {
    self as u8 as usize
  }
}

impl Nuc {
  #[inline]
  pub fn is_gap(self) -> bool {
    self == Nuc::Gap
  }

  #[inline]
  pub fn is_acgt(self) -> bool {
    matches!(self, Nuc::A | Nuc::C | Nuc::G | Nuc::T)
  }

  /// The set of canonical bases this IUPAC code stands for.
  pub fn resolve(self) -> &'static [Nuc] {
    match self {
      Nuc::A => &[Nuc::A],
      Nuc::C => &[Nuc::C],
      Nuc::G => &[Nuc::G],
      Nuc::T => &[Nuc::T],
      Nuc::U => &[Nuc::T],
      Nuc::R => &[Nuc::A, Nuc::G],
      Nuc::Y => &[Nuc::C, Nuc::T],
      Nuc::S => &[Nuc::C, Nuc::G],
      Nuc::W => &[Nuc::A, Nuc::T],
      Nuc::K => &[Nuc::G, Nuc::T],
      Nuc::M => &[Nuc::A, Nuc::C],
      Nuc::B => &[Nuc::C, Nuc::G, Nuc::T],
      Nuc::D => &[Nuc::A, Nuc::G, Nuc::T],
      Nuc::H => &[Nuc::A, Nuc::C, Nuc::T],
      Nuc::V => &[Nuc::A, Nuc::C, Nuc::G],
      Nuc::N => &[Nuc::A, Nuc::C, Nuc::G, Nuc::T],
      Nuc::Gap => &[],
    }
  }

  #[inline]
  pub fn complement(self) -> Nuc {
    match self {
      Nuc::A => Nuc::T,
      Nuc::T | Nuc::U => Nuc::A,
      Nuc::C => Nuc::G,
      Nuc::G => Nuc::C,
      Nuc::R => Nuc::Y,
      Nuc::Y => Nuc::R,
      Nuc::S => Nuc::S,
      Nuc::W => Nuc::W,
      Nuc::K => Nuc::M,
      Nuc::M => Nuc::K,
      Nuc::B => Nuc::V,
      Nuc::V => Nuc::B,
      Nuc::D => Nuc::H,
      Nuc::H => Nuc::D,
      Nuc::N => Nuc::N,
      Nuc::Gap => Nuc::Gap,
    }
  }
}

pub fn to_nuc_seq(s: &str) -> Result<Vec<Nuc>, Report> {
  crate::alphabet::letter::parse_sequence(s)
}

pub fn from_nuc_seq(seq: &[Nuc]) -> String {
  crate::alphabet::letter::sequence_to_string(seq)
}

pub fn reverse_complement(seq: &[Nuc]) -> Vec<Nuc> {
  seq.iter().rev().map(|n| n.complement()).collect()
}

pub fn reverse_complement_in_place(seq: &mut [Nuc]) {
  seq.reverse();
  for n in seq.iter_mut() {
    *n = n.complement();
  }
}

/// `NUC_MATCH_TABLE[a][b] == true` iff the IUPAC sets of `a` and `b` intersect (spec §4.A):
/// every ambiguity code matches any canonical base it could stand for, `N` matches everything,
/// and `GAP` matches only itself and `N`.
pub fn nuc_letters_match(a: Nuc, b: Nuc) -> bool {
  if a == Nuc::Gap || b == Nuc::Gap {
    return a == b || a == Nuc::N || b == Nuc::N;
  }
  a.resolve().iter().any(|x| b.resolve().contains(x))
}

#[derive(Copy, Clone, Debug)]
pub struct NucScores {
  pub score_match: i32,
  pub penalty_mismatch: i32,
}

#[inline]
pub fn lookup_nuc_match_score(a: Nuc, b: Nuc, scores: &NucScores) -> i32 {
  if nuc_letters_match(a, b) {
    scores.score_match
  } else {
    -scores.penalty_mismatch
  }
}
