use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::{to_nuc_seq, Nuc};
use crate::io::fs::create_file_or_stdout;
use eyre::{eyre, Report, WrapErr};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use xz2::read::XzDecoder;

/// One FASTA record as read off disk, before nucleotide parsing (spec §6 input format): `seq_name`
/// is the header line with the leading `>` stripped, `seq` is the raw concatenated sequence
/// letters with no whitespace.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FastaRecord {
  pub seq_name: String,
  pub seq: String,
  pub index: usize,
}

/// A parsed FASTA record with its sequence decoded into [`Nuc`]s, ready for the pipeline driver
/// (spec §4.M's per-sequence input).
#[derive(Clone, Debug)]
pub struct FastaRecordParsed {
  pub seq_name: String,
  pub seq: Vec<Nuc>,
  pub index: usize,
}

/// Opens a FASTA file for streaming, transparently decompressing by extension: `.gz` via
/// `flate2`, `.xz` via `xz2`, anything else read as plain text (grounded on the original
/// implementation's `makeFastaStream` extension dispatch).
fn open_decompressed(filepath: impl AsRef<Path>) -> Result<Box<dyn BufRead + Send>, Report> {
  let filepath = filepath.as_ref();
  let file = File::open(filepath).wrap_err_with(|| format!("When opening file: {filepath:#?}"))?;

  let ext = filepath.extension().and_then(|e| e.to_str());
  let reader: Box<dyn BufRead + Send> = match ext {
    Some("gz") => Box::new(BufReader::new(MultiGzDecoder::new(file))),
    Some("xz") => Box::new(BufReader::new(XzDecoder::new(file))),
    _ => Box::new(BufReader::new(file)),
  };

  Ok(reader)
}

/// Streaming FASTA reader: yields one [`FastaRecord`] at a time without materializing the whole
/// file, so the pipeline driver can start processing before the input is fully read (spec §4.M).
/// `Send` so the driver's producer thread can own it.
pub struct FastaReader {
  reader: Box<dyn BufRead + Send>,
  pending_header: Option<String>,
  index: usize,
}

impl FastaReader {
  pub fn from_path(filepath: impl AsRef<Path>) -> Result<Self, Report> {
    Ok(Self {
      reader: open_decompressed(filepath)?,
      pending_header: None,
      index: 0,
    })
  }

  pub fn from_str(content: &str) -> Self {
    Self {
      reader: Box::new(BufReader::new(std::io::Cursor::new(content.as_bytes().to_vec()))),
      pending_header: None,
      index: 0,
    }
  }

  /// Reads the next record, or `None` at end of input.
  pub fn read(&mut self) -> Result<Option<FastaRecord>, Report> {
    let mut seq_name = match self.pending_header.take() {
      Some(header) => header,
      None => match self.next_header()? {
        Some(header) => header,
        None => return Ok(None),
      },
    };
    seq_name = seq_name.trim().to_owned();

    let mut seq = String::new();
    loop {
      let mut line = String::new();
      let bytes_read = self
        .reader
        .read_line(&mut line)
        .wrap_err("When reading a line of a FASTA file")?;
      if bytes_read == 0 {
        break;
      }
      let line = line.trim_end_matches(['\n', '\r']);
      if let Some(header) = line.strip_prefix('>') {
        self.pending_header = Some(header.to_owned());
        break;
      }
      seq.push_str(line.trim());
    }

    let index = self.index;
    self.index += 1;

    Ok(Some(FastaRecord { seq_name, seq, index }))
  }

  fn next_header(&mut self) -> Result<Option<String>, Report> {
    loop {
      let mut line = String::new();
      let bytes_read = self
        .reader
        .read_line(&mut line)
        .wrap_err("When reading a line of a FASTA file")?;
      if bytes_read == 0 {
        return Ok(None);
      }
      let line = line.trim_end_matches(['\n', '\r']);
      if line.is_empty() {
        continue;
      }
      let header = line
        .strip_prefix('>')
        .ok_or_else(|| eyre!("Expected a FASTA header line starting with '>', found: '{line}'"))?;
      return Ok(Some(header.to_owned()));
    }
  }
}

impl Iterator for FastaReader {
  type Item = Result<FastaRecord, Report>;

  fn next(&mut self) -> Option<Self::Item> {
    self.read().transpose()
  }
}

/// Parses every record's sequence into [`Nuc`]s (spec §4.A). Used by callers (like the reference
/// sequence loader) that need the whole file at once rather than streamed.
pub fn parse_all(mut reader: FastaReader) -> Result<Vec<FastaRecordParsed>, Report> {
  let mut records = Vec::new();
  while let Some(record) = reader.read()? {
    let seq = to_nuc_seq(&record.seq).wrap_err_with(|| format!("When parsing sequence '{}'", record.seq_name))?;
    records.push(FastaRecordParsed {
      seq_name: record.seq_name,
      seq,
      index: record.index,
    });
  }
  Ok(records)
}

/// Reads a single-record FASTA file (the reference sequence, spec §6), erroring if it contains
/// zero or more than one record.
pub fn read_one_fasta(filepath: impl AsRef<Path>) -> Result<FastaRecordParsed, Report> {
  let filepath = filepath.as_ref();
  let reader = FastaReader::from_path(filepath)?;
  let mut records = parse_all(reader).wrap_err_with(|| format!("When reading FASTA file: {filepath:#?}"))?;
  match records.len() {
    0 => Err(eyre!("FASTA file '{filepath:#?}' contains no sequences, expected exactly one")),
    1 => Ok(records.remove(0)),
    n => Err(eyre!("FASTA file '{filepath:#?}' contains {n} sequences, expected exactly one")),
  }
}

/// Writes FASTA records one at a time to a file (or stdout when the path is `"-"`), wrapping
/// sequence lines at 80 characters to match the common FASTA convention (spec §6 outputs:
/// `aligned.fasta`, `gene.<name>.fasta`).
pub struct FastaWriter {
  writer: Box<dyn Write>,
}

const FASTA_LINE_WIDTH: usize = 80;

impl FastaWriter {
  pub fn from_path(filepath: impl AsRef<Path>) -> Result<Self, Report> {
    Ok(Self {
      writer: create_file_or_stdout(filepath)?,
    })
  }

  pub fn write<L: Letter<L>>(&mut self, seq_name: &str, seq: &[L]) -> Result<(), Report> {
    writeln!(self.writer, ">{seq_name}")?;
    for chunk in seq.chunks(FASTA_LINE_WIDTH) {
      let line: String = chunk.iter().map(|&l| l.to_char()).collect();
      writeln!(self.writer, "{line}")?;
    }
    Ok(())
  }

  pub fn flush(&mut self) -> Result<(), Report> {
    self.writer.flush()?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn reads_records_from_a_string() {
    let content = ">seq1\nACGT\n>seq2\nAC\nGT\n";
    let mut reader = FastaReader::from_str(content);

    let first = reader.read().unwrap().unwrap();
    assert_eq!(first.seq_name, "seq1");
    assert_eq!(first.seq, "ACGT");

    let second = reader.read().unwrap().unwrap();
    assert_eq!(second.seq_name, "seq2");
    assert_eq!(second.seq, "ACGT");

    assert!(reader.read().unwrap().is_none());
  }

  #[test]
  fn skips_blank_lines_between_records() {
    let content = ">seq1\nACGT\n\n>seq2\nTTTT\n";
    let mut reader = FastaReader::from_str(content);
    assert_eq!(reader.read().unwrap().unwrap().seq_name, "seq1");
    assert_eq!(reader.read().unwrap().unwrap().seq_name, "seq2");
  }

  #[test]
  fn assigns_sequential_indices() {
    let content = ">a\nAC\n>b\nGT\n>c\nAA\n";
    let reader = FastaReader::from_str(content);
    let records = parse_all(reader).unwrap();
    assert_eq!(records.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 2]);
  }

  #[test]
  fn reads_exactly_one_record() {
    let content = ">ref\nACGT\n";
    let reader = FastaReader::from_str(content);
    let parsed = parse_all(reader).unwrap();
    assert_eq!(parsed.len(), 1);
  }
}
