use derive_more::Display;
use eyre::Report;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Shorthand for `return Err(eyre::eyre!(...))` with the same `format!`-style arguments as
/// `eyre!`. Used throughout the crate instead of ad-hoc `Err(eyre::eyre!(...))` calls.
#[macro_export]
macro_rules! make_error {
  ($($arg:tt)*) => {
    Err(eyre::eyre!($($arg)*))
  };
}

/// Like [`make_error`], but marks the failure as an internal invariant violation (a bug in
/// this crate rather than bad input), prefixing the message accordingly.
#[macro_export]
macro_rules! make_internal_error {
  ($($arg:tt)*) => {
    Err(eyre::eyre!("Internal error (this is a bug): {}", format!($($arg)*)))
  };
}

/// Recoverable, per-sequence failures that abort analysis of a single query sequence without
/// aborting the run (spec §7). The pipeline driver (`run/nextclade_run.rs`) catches these and
/// turns them into an `AnalysisOutcome::Error` row instead of propagating them.
#[derive(Debug, Display)]
pub enum NextalignError {
  #[display("Sequence is too short: {length} nucleotides, the minimum is {min_length}")]
  SequenceTooShort { length: usize, min_length: usize },

  #[display("Unable to find seed matches between the sequence and the reference")]
  NoSeedMatches,

  #[display("Seed matches found for the sequence are not consistent: {reason}")]
  BadSeedMatches { reason: String },

  #[display("Invalid character '{letter}' encountered at position {position}")]
  InvalidLetter { letter: char, position: usize },

  #[display("Failed to extract gene '{gene_name}': {reason}")]
  GeneExtractionFailed { gene_name: String, reason: String },

  #[display("{0}")]
  Other(Report),
}

impl std::error::Error for NextalignError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      NextalignError::Other(report) => report.chain().next().and(None),
      _ => None,
    }
  }
}

impl From<Report> for NextalignError {
  fn from(report: Report) -> Self {
    NextalignError::Other(report)
  }
}

/// Non-fatal issue raised while processing one gene of one sequence. Accumulated into
/// `AnalysisResult.warnings.in_genes` rather than failing the whole sequence (spec §7).
#[derive(Clone, Debug, Display, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[display("[{gene_name}] {message}")]
#[serde(rename_all = "camelCase")]
pub struct PeptideWarning {
  pub gene_name: String,
  pub message: String,
}
