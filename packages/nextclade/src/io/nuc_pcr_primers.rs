use crate::alphabet::nuc::{reverse_complement, to_nuc_seq, Nuc};
use crate::analyze::pcr_primer_changes::{NucleotideLocation, PcrPrimer};
use crate::coord::range::Range;
use crate::make_error;
use eyre::{Report, WrapErr};
use regex::Regex;
use std::path::Path;

struct PcrPrimerCsvRow {
  source: String,
  target: String,
  name: String,
  primer_oligonuc: String,
}

fn is_not_acgt_char(c: char) -> bool {
  !matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T')
}

struct FindPrimerResult {
  begin: usize,
  root_oligonuc: Vec<Nuc>,
}

/// Finds the primer's binding site in the root sequence by turning every non-ACGT letter of the
/// oligonucleotide into a regex wildcard (grounded on `findPrimerInRootSeq`). Reports (via
/// `warnings`) when more than one match is found, keeping only the first.
fn find_primer_in_root_seq(name: &str, primer: &[Nuc], root_seq_str: &str, warnings: &mut Vec<String>) -> Option<FindPrimerResult> {
  let primer_str: String = primer.iter().map(|n| n.to_char()).collect();
  let mut sanitized = primer_str.clone();
  sanitized = sanitized
    .chars()
    .map(|c| if is_not_acgt_char(c) { '.' } else { c })
    .collect();

  let re = Regex::new(&sanitized).ok()?;
  let matches: Vec<_> = re.find_iter(root_seq_str).collect();

  let first = matches.first()?;

  if matches.len() > 1 {
    warnings.push(format!(
      "When parsing PCR primer CSV: When searching fragments of PCR primer \"{name}\" (oligonucleotide: \"{primer_str}\") in the root sequence: Found more than one match (specifically: {}). This might mean that the list of primers is not compatible with the root sequence used, or that the PCR primers are not chosen well. Continuing, but will consider only the first match and ignore the rest. PCR primer checks might be unreliable",
      matches.len()
    ));
  }

  let root_oligonuc = to_nuc_seq(first.as_str()).ok()?;

  Some(FindPrimerResult {
    begin: first.start(),
    root_oligonuc,
  })
}

/// Locations of non-ACGT letters within `seq`, offset by `offset` (grounded on `findNonAcgt`).
fn find_non_acgt(seq: &[Nuc], offset: usize) -> Vec<NucleotideLocation> {
  seq
    .iter()
    .enumerate()
    .filter(|(_, nuc)| !nuc.is_acgt())
    .map(|(i, &nuc)| NucleotideLocation { pos: i + offset, nuc })
    .collect()
}

/// Converts one CSV row to a located [`PcrPrimer`], or `None` (with a warning) if the primer
/// can't be found in the root sequence at all (grounded on `convertPcrPrimer`).
fn convert_pcr_primer(row: &PcrPrimerCsvRow, root_seq: &[Nuc], warnings: &mut Vec<String>) -> Option<PcrPrimer> {
  let root_seq_str: String = root_seq.iter().map(|n| n.to_char()).collect();

  let mut oriented = to_nuc_seq(&row.primer_oligonuc).ok()?;
  // A reverse primer, named with a "_R" suffix, is stored 3'→5' and needs reverse-complementing
  // before it can be located in the (5'→3') root sequence.
  if row.name.ends_with("_R") {
    oriented = reverse_complement(&oriented);
  }

  let mut found = find_primer_in_root_seq(&row.name, &oriented, &root_seq_str, warnings);
  if found.is_none() {
    oriented = reverse_complement(&oriented);
    found = find_primer_in_root_seq(&row.name, &oriented, &root_seq_str, warnings);
  }

  let found = match found {
    Some(found) => found,
    None => {
      warnings.push(format!(
        "When parsing PCR primer CSV: Unable to find PCR primer \"{}\" (oligonucleotide: \"{}\") in the root sequence. This might mean that the list of primers is not compatible with the root sequence used",
        row.name, row.primer_oligonuc
      ));
      return None;
    }
  };

  let begin = found.begin;
  let end = begin + found.root_oligonuc.len();
  let range = Range::new(begin, end);

  let non_acgts = find_non_acgt(&oriented, begin);

  let primer_oligonuc = to_nuc_seq(&row.primer_oligonuc).ok()?;

  Some(PcrPrimer {
    name: row.name.clone(),
    target: row.target.clone(),
    source: row.source.clone(),
    root_oligonuc: found.root_oligonuc,
    primer_oligonuc,
    range,
    non_acgts,
  })
}

/// Parses a PCR primer CSV and locates each primer against `root_seq` (spec §6 input format).
/// Primers that can't be located are dropped with a warning rather than failing the whole file.
pub fn parse_pcr_primers_csv(content: &str, root_seq: &[Nuc]) -> Result<(Vec<PcrPrimer>, Vec<String>), Report> {
  let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(content.as_bytes());

  let headers = reader.headers().wrap_err("When reading PCR primer CSV header")?.clone();
  for required in ["Country (Institute)", "Target", "Oligonucleotide", "Sequence"] {
    if !headers.iter().any(|h| h == required) {
      return make_error!("When parsing PCR primers CSV: Missing required column: \"{required}\"");
    }
  }

  let source_idx = headers.iter().position(|h| h == "Country (Institute)").unwrap();
  let target_idx = headers.iter().position(|h| h == "Target").unwrap();
  let name_idx = headers.iter().position(|h| h == "Oligonucleotide").unwrap();
  let seq_idx = headers.iter().position(|h| h == "Sequence").unwrap();

  let mut warnings = Vec::new();
  let mut primers = Vec::new();

  for record in reader.records() {
    let record = record.wrap_err("When reading a row of PCR primer CSV")?;
    let row = PcrPrimerCsvRow {
      source: record.get(source_idx).unwrap_or_default().to_owned(),
      target: record.get(target_idx).unwrap_or_default().to_owned(),
      name: record.get(name_idx).unwrap_or_default().to_owned(),
      primer_oligonuc: record.get(seq_idx).unwrap_or_default().to_owned(),
    };

    if let Some(primer) = convert_pcr_primer(&row, root_seq, &mut warnings) {
      primers.push(primer);
    }
  }

  Ok((primers, warnings))
}

pub fn read_pcr_primers_csv(filepath: impl AsRef<Path>, root_seq: &[Nuc]) -> Result<(Vec<PcrPrimer>, Vec<String>), Report> {
  let filepath = filepath.as_ref();
  let content = crate::io::fs::read_file_to_string(filepath)
    .wrap_err_with(|| format!("When reading PCR primer CSV: {filepath:#?}"))?;
  parse_pcr_primers_csv(&content, root_seq).wrap_err_with(|| format!("When parsing PCR primer CSV: {filepath:#?}"))
}
