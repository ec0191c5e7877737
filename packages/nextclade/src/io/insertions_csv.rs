use crate::alphabet::letter::{sequence_to_string, Letter};
use crate::io::fs::create_file_or_stdout;
use crate::run::nextclade_run_one::{AnalysisResult, GeneAminoacidInsertion};
use crate::strip::strip_insertions::Insertion;
use csv::WriterBuilder;
use eyre::{Report, WrapErr};
use itertools::Itertools;
use std::path::Path;

/// Formats one insertion as `pos:seq`, 1-based position, matching the original implementation's
/// `insertions.csv` convention.
fn format_insertion<L: Letter<L>>(insertion: &Insertion<L>) -> String {
  format!("{}:{}", insertion.pos + 1, sequence_to_string(&insertion.ins))
}

fn format_aa_insertion(insertion: &GeneAminoacidInsertion) -> String {
  format!("{}:{}:{}", insertion.gene, insertion.pos + 1, sequence_to_string(&insertion.ins))
}

/// Writes one row per analyzed sequence listing its nucleotide and amino acid insertions (spec
/// §6 `insertions.csv`), each column a `;`-joined list of `pos:seq` entries.
pub struct InsertionsCsvWriter {
  writer: csv::Writer<Box<dyn std::io::Write>>,
}

impl InsertionsCsvWriter {
  pub fn new(filepath: impl AsRef<Path>) -> Result<Self, Report> {
    let file = create_file_or_stdout(filepath)?;
    let writer = WriterBuilder::new().delimiter(b',').from_writer(file);
    let mut me = Self { writer };
    me.writer
      .write_record(["seqName", "insertions", "aaInsertions"])
      .wrap_err("When writing the insertions.csv header")?;
    Ok(me)
  }

  pub fn write(&mut self, result: &AnalysisResult) -> Result<(), Report> {
    let insertions = result.insertions.iter().map(format_insertion).join(";");
    let aa_insertions = result.aa_insertions.iter().map(format_aa_insertion).join(";");
    self
      .writer
      .write_record([result.seq_name.as_str(), insertions.as_str(), aa_insertions.as_str()])
      .wrap_err_with(|| format!("When writing an insertions.csv row for '{}'", result.seq_name))
  }

  pub fn flush(&mut self) -> Result<(), Report> {
    self.writer.flush()?;
    Ok(())
  }
}
