use clap::{Parser, ValueEnum};
use optfield::optfield;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(ValueEnum, Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum GapAlignmentSide {
  Left,
  Right,
}

// NOTE: `optfield` generates a struct with the same fields wrapped in `Option`, plus a
// `.merge_opt(&opt)` method that overwrites `self`'s fields with any `Some` value from `opt`.
// Used to merge built-in defaults < dataset `virus_properties.json` < explicit CLI flags.

/// Alignment scoring and banding parameters (spec §3 `AlignmentParameters` + `SeedParameters`,
/// nucleotide side).
#[allow(clippy::struct_excessive_bools)]
#[optfield(pub AlignPairwiseParamsOptional, attrs, doc, field_attrs, field_doc, merge_fn = pub)]
#[derive(Parser, Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_align_pairwise_params"))]
pub struct AlignPairwiseParams {
  /// Minimum length of nucleotide sequence to consider for alignment.
  #[clap(long, default_value_t = 100)]
  pub min_length: usize,

  /// Penalty for extending a gap in alignment.
  #[clap(long, default_value_t = 0)]
  pub penalty_gap_extend: i32,

  /// Penalty for opening a gap in alignment.
  #[clap(long, default_value_t = 6)]
  pub penalty_gap_open: i32,

  /// As `--penalty-gap-open`, but for gaps opening at the start of a codon.
  #[clap(long, default_value_t = 7)]
  pub penalty_gap_open_in_frame: i32,

  /// As `--penalty-gap-open`, but for gaps opening in the body of a codon.
  #[clap(long, default_value_t = 8)]
  pub penalty_gap_open_out_of_frame: i32,

  /// Penalty for aligned letters that differ in state.
  #[clap(long, default_value_t = 1)]
  pub penalty_mismatch: i32,

  /// Score for aligned letters that match.
  #[clap(long, default_value_t = 3)]
  pub score_match: i32,

  /// Maximum area of the alignment band.
  #[clap(long, default_value_t = 500_000_000)]
  pub max_band_area: usize,

  /// Maximum length of indels allowed to proceed with alignment.
  #[clap(long, default_value_t = 400)]
  pub max_indel: usize,

  /// k-mer length used in nucleotide seed matching.
  #[clap(long, default_value_t = 21)]
  pub seed_length: usize,

  /// Maximum number of mismatching nucleotides allowed for a seed to be considered a match.
  #[clap(long, default_value_t = 3)]
  pub mismatches_allowed: usize,

  /// Minimum number of seeds to search for.
  #[clap(long, default_value_t = 10)]
  pub min_seeds: i32,

  /// Minimum seed matching rate.
  #[clap(long, default_value_t = 0.3)]
  pub min_match_rate: f64,

  /// Spacing between seeds.
  #[clap(long, default_value_t = 100)]
  pub seed_spacing: i32,

  /// Retry seed matching with the reverse complement if the first attempt fails.
  #[clap(long, default_value_t = false)]
  #[clap(num_args=0..=1, default_missing_value = "true")]
  pub retry_reverse_complement: bool,

  /// Truncate amino acid sequences at the first stop codon rather than translating past it.
  #[clap(long, default_value_t = false)]
  #[clap(num_args=0..=1, default_missing_value = "true")]
  pub no_translate_past_stop: bool,

  #[clap(skip = true)]
  pub left_terminal_gaps_free: bool,

  #[clap(skip = true)]
  pub right_terminal_gaps_free: bool,

  /// Excess bandwidth for internal stripes.
  #[clap(long, default_value_t = 9)]
  pub excess_bandwidth: i32,

  /// Excess bandwidth for terminal stripes.
  #[clap(long, default_value_t = 50)]
  pub terminal_bandwidth: i32,

  /// Whether to align gaps on the left or right side if equally parsimonious.
  #[clap(long, value_enum, default_value_t = GapAlignmentSide::Right)]
  pub gap_alignment_side: GapAlignmentSide,
}

impl Default for AlignPairwiseParams {
  fn default() -> Self {
    Self {
      min_length: 100,
      penalty_gap_extend: 0,
      penalty_gap_open: 6,
      penalty_gap_open_in_frame: 7,
      penalty_gap_open_out_of_frame: 8,
      penalty_mismatch: 1,
      score_match: 3,
      max_band_area: 500_000_000,
      max_indel: 400,
      seed_length: 21,
      min_seeds: 10,
      min_match_rate: 0.3,
      seed_spacing: 100,
      mismatches_allowed: 3,
      retry_reverse_complement: false,
      no_translate_past_stop: false,
      left_terminal_gaps_free: true,
      right_terminal_gaps_free: true,
      gap_alignment_side: GapAlignmentSide::Right,
      excess_bandwidth: 9,
      terminal_bandwidth: 50,
    }
  }
}

fn validate_align_pairwise_params(params: &AlignPairwiseParams) -> Result<(), validator::ValidationError> {
  if !(params.penalty_gap_open < params.penalty_gap_open_in_frame
    && params.penalty_gap_open_in_frame < params.penalty_gap_open_out_of_frame)
  {
    return Err(validator::ValidationError::new(
      "penalty_gap_open < penalty_gap_open_in_frame < penalty_gap_open_out_of_frame must hold",
    ));
  }
  if params.score_match <= 0 || params.penalty_mismatch <= 0 || params.penalty_gap_open <= 0 {
    return Err(validator::ValidationError::new(
      "score_match, penalty_mismatch and penalty_gap_open must be positive",
    ));
  }
  if params.penalty_gap_extend < 0 {
    return Err(validator::ValidationError::new("penalty_gap_extend must not be negative"));
  }
  Ok(())
}

/// Seed search parameters (spec §3 `SeedParameters`), instantiated separately for the
/// nucleotide alignment and for each gene's peptide alignment.
#[optfield(pub SeedParametersOptional, attrs, doc, field_attrs, field_doc, merge_fn = pub)]
#[derive(Parser, Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct SeedParameters {
  #[validate(range(min = 1))]
  pub seed_length: usize,

  #[validate(range(min = 1))]
  pub min_seeds: i32,

  pub seed_spacing: i32,

  pub mismatches_allowed: usize,
}

impl Default for SeedParameters {
  fn default() -> Self {
    Self {
      seed_length: 21,
      min_seeds: 10,
      seed_spacing: 100,
      mismatches_allowed: 3,
    }
  }
}

impl SeedParameters {
  pub fn nuc_defaults() -> Self {
    Self::default()
  }

  /// Amino acid seeds are shorter and tighter spaced since peptides are much shorter than the
  /// full genome.
  pub fn aa_defaults() -> Self {
    Self {
      seed_length: 7,
      min_seeds: 5,
      seed_spacing: 20,
      mismatches_allowed: 1,
    }
  }
}
