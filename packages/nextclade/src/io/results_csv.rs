use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::Nuc;
use crate::analyze::aa_changes::{AminoacidDeletion, AminoacidSubstitution};
use crate::analyze::find_nuc_changes::{NucleotideDeletion, NucleotideSubstitution};
use crate::analyze::find_nucleotide_ranges::CharacterRange;
use crate::analyze::pcr_primer_changes::PcrPrimerChange;
use crate::io::fs::create_file_or_stdout;
use crate::run::nextclade_run_one::{AnalysisResult, GeneFrameShift};
use crate::tree::private_mutations::PrivateMutation;
use csv::WriterBuilder;
use eyre::{Report, WrapErr};
use itertools::Itertools;
use std::path::Path;

/// Column delimiter for `<prefix>.csv`/`<prefix>.tsv` (spec §6): the two formats share every
/// column, differing only in the separator.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CsvDelimiter {
  Comma,
  Tab,
}

impl CsvDelimiter {
  fn as_byte(self) -> u8 {
    match self {
      CsvDelimiter::Comma => b',',
      CsvDelimiter::Tab => b'\t',
    }
  }
}

fn format_nuc_substitution(sub: &NucleotideSubstitution) -> String {
  format!("{}{}{}", sub.ref_nuc.to_char(), sub.pos + 1, sub.query_nuc.to_char())
}

fn format_nuc_deletion(del: &NucleotideDeletion) -> String {
  if del.length == 1 {
    format!("{}", del.start + 1)
  } else {
    format!("{}-{}", del.start + 1, del.start + del.length)
  }
}

fn format_private_mutation(mutation: &PrivateMutation) -> String {
  format!("{}{}{}", mutation.ref_nuc.to_char(), mutation.pos + 1, mutation.query_nuc.to_char())
}

fn format_character_range(range: &CharacterRange<Nuc>) -> String {
  format!("{}-{}", range.begin + 1, range.end)
}

fn format_aa_substitution(sub: &AminoacidSubstitution) -> String {
  format!("{}:{}{}{}", sub.gene, sub.ref_aa.to_char(), sub.codon + 1, sub.query_aa.to_char())
}

fn format_aa_deletion(del: &AminoacidDeletion) -> String {
  format!("{}:{}{}-", del.gene, del.ref_aa.to_char(), del.codon + 1)
}

fn format_frame_shift(fs: &GeneFrameShift) -> String {
  format!("{}:{}-{}", fs.gene_name, fs.range.begin + 1, fs.range.end)
}

fn format_pcr_primer_change(change: &PcrPrimerChange) -> String {
  change.primer.name.clone()
}

/// Writes one row per analyzed sequence with every scalar field of [`AnalysisResult`] plus
/// `;`-joined lists of its mutation collections (spec §6 `<prefix>.csv`/`<prefix>.tsv`).
pub struct ResultsCsvWriter {
  writer: csv::Writer<Box<dyn std::io::Write>>,
}

const HEADER: &[&str] = &[
  "seqName",
  "clade",
  "qc.overallScore",
  "qc.overallStatus",
  "totalSubstitutions",
  "totalDeletions",
  "totalInsertions",
  "totalMissing",
  "totalNonACGTNs",
  "totalAminoacidSubstitutions",
  "totalAminoacidDeletions",
  "totalAminoacidInsertions",
  "totalFrameShifts",
  "totalPcrPrimerChanges",
  "totalPrivateMutations",
  "substitutions",
  "deletions",
  "insertions",
  "privateNucMutations",
  "missing",
  "nonACGTNs",
  "aaSubstitutions",
  "aaDeletions",
  "frameShifts",
  "pcrPrimerChanges",
  "alignmentStart",
  "alignmentEnd",
  "alignmentScore",
  "nearestNodeId",
  "missingGenes",
  "warnings",
];

impl ResultsCsvWriter {
  pub fn new(filepath: impl AsRef<Path>, delimiter: CsvDelimiter) -> Result<Self, Report> {
    let file = create_file_or_stdout(filepath)?;
    let writer = WriterBuilder::new().delimiter(delimiter.as_byte()).from_writer(file);
    let mut me = Self { writer };
    me.writer.write_record(HEADER).wrap_err("When writing the results CSV header")?;
    Ok(me)
  }

  pub fn write(&mut self, result: &AnalysisResult) -> Result<(), Report> {
    let row = [
      result.seq_name.clone(),
      result.clade.clone().unwrap_or_default(),
      format!("{:.6}", result.qc.overall_score),
      serde_json::to_value(&result.qc.overall_status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default(),
      result.total_substitutions.to_string(),
      result.total_deletions.to_string(),
      result.total_insertions.to_string(),
      result.total_missing.to_string(),
      result.total_non_acgtns.to_string(),
      result.total_aminoacid_substitutions.to_string(),
      result.total_aminoacid_deletions.to_string(),
      result.total_aminoacid_insertions.to_string(),
      result.total_frame_shifts.to_string(),
      result.total_pcr_primer_changes.to_string(),
      result.total_private_mutations.to_string(),
      result.substitutions.iter().map(format_nuc_substitution).join(";"),
      result.deletions.iter().map(format_nuc_deletion).join(";"),
      result
        .insertions
        .iter()
        .map(|ins| format!("{}:{}", ins.pos + 1, crate::alphabet::letter::sequence_to_string(&ins.ins)))
        .join(";"),
      result.private_nuc_mutations.iter().map(format_private_mutation).join(";"),
      result.missing.iter().map(format_character_range).join(";"),
      result.non_acgtns.iter().map(format_character_range).join(";"),
      result.aa_substitutions.iter().map(format_aa_substitution).join(";"),
      result.aa_deletions.iter().map(format_aa_deletion).join(";"),
      result.frame_shifts.iter().map(format_frame_shift).join(";"),
      result.pcr_primer_changes.iter().map(format_pcr_primer_change).join(";"),
      result.alignment_start.to_string(),
      result.alignment_end.to_string(),
      result.alignment_score.to_string(),
      result.nearest_node_id.to_string(),
      result.missing_genes.join(";"),
      result.warnings.iter().map(|w| w.to_string()).join(";"),
    ];

    self
      .writer
      .write_record(&row)
      .wrap_err_with(|| format!("When writing a results CSV row for '{}'", result.seq_name))
  }

  pub fn flush(&mut self) -> Result<(), Report> {
    self.writer.flush()?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::Nuc;
  use pretty_assertions::assert_eq;

  #[test]
  fn formats_a_single_nucleotide_deletion_without_a_range() {
    let del = NucleotideDeletion {
      start: 4,
      length: 1,
      aa_substitutions: Vec::new(),
      aa_deletions: Vec::new(),
    };
    assert_eq!(format_nuc_deletion(&del), "5");
  }

  #[test]
  fn formats_a_multi_nucleotide_deletion_as_a_range() {
    let del = NucleotideDeletion {
      start: 4,
      length: 3,
      aa_substitutions: Vec::new(),
      aa_deletions: Vec::new(),
    };
    assert_eq!(format_nuc_deletion(&del), "5-7");
  }

  #[test]
  fn formats_a_nucleotide_substitution() {
    let sub = NucleotideSubstitution {
      ref_nuc: Nuc::A,
      pos: 9,
      query_nuc: Nuc::T,
      pcr_primers_changed: Vec::new(),
      aa_substitutions: Vec::new(),
      aa_deletions: Vec::new(),
    };
    assert_eq!(format_nuc_substitution(&sub), "A10T");
  }
}
