use crate::io::fs::create_file_or_stdout;
use csv::WriterBuilder;
use eyre::{Report, WrapErr};
use std::path::Path;

/// Writes one row per per-sequence failure (spec §6 `errors.csv`, spec §7's non-fatal,
/// per-sequence error class). `failed_genes` lists genes that could not be translated for
/// sequences that otherwise analyzed successfully; those rows carry an empty `errors` column.
pub struct ErrorsCsvWriter {
  writer: csv::Writer<Box<dyn std::io::Write>>,
}

#[derive(Clone, Debug)]
pub struct SeqGeneWarnings {
  pub seq_name: String,
  pub warnings: Vec<String>,
  pub failed_genes: Vec<String>,
}

impl ErrorsCsvWriter {
  pub fn new(filepath: impl AsRef<Path>) -> Result<Self, Report> {
    let file = create_file_or_stdout(filepath)?;
    let writer = WriterBuilder::new().delimiter(b',').from_writer(file);
    let mut me = Self { writer };
    me.writer
      .write_record(["seqName", "errors", "warnings", "failedGenes"])
      .wrap_err("When writing the errors.csv header")?;
    Ok(me)
  }

  pub fn write_error(&mut self, seq_name: &str, error: &str) -> Result<(), Report> {
    self
      .writer
      .write_record([seq_name, error, "", ""])
      .wrap_err_with(|| format!("When writing an errors.csv row for '{seq_name}'"))
  }

  pub fn write_warnings(&mut self, row: &SeqGeneWarnings) -> Result<(), Report> {
    if row.warnings.is_empty() && row.failed_genes.is_empty() {
      return Ok(());
    }
    self
      .writer
      .write_record([
        row.seq_name.as_str(),
        "",
        row.warnings.join(";").as_str(),
        row.failed_genes.join(";").as_str(),
      ])
      .wrap_err_with(|| format!("When writing an errors.csv row for '{}'", row.seq_name))
  }

  pub fn flush(&mut self) -> Result<(), Report> {
    self.writer.flush()?;
    Ok(())
  }
}
