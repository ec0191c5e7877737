use crate::gene::gene::{Gene, GeneStrand};
use crate::gene::gene_map::GeneMap;
use crate::make_error;
use eyre::{Report, WrapErr};
use std::collections::BTreeMap;
use std::path::Path;

const GFF_ATTRIB_KEY_GENE_NAME: &str = "gene_name";

/// Splits one `key "value"` attribute pair, tolerating the single- or double-quoted and
/// dot-for-empty conventions GFF3 allows (grounded on the original parser's `parseAttribute`).
fn parse_attribute(key_val_str: &str) -> Result<(String, String), Report> {
  let parts: Vec<&str> = key_val_str.split(' ').filter(|s| !s.is_empty()).collect();
  if parts.len() != 2 {
    return make_error!(
      "GFF parser: unable to parse attribute: expected a key-value pair format is `key \"value\"`, got `{key_val_str}`"
    );
  }

  let key = parts[0].trim_matches(|c| c == '\'' || c == '"' || c == ' ').to_owned();
  let mut val = parts[1].trim_matches(|c| c == '\'' || c == '"' || c == ' ').to_owned();

  if key.is_empty() || val.is_empty() {
    return make_error!(
      "GFF parser: unable to parse attribute: expected a key-value pair format is `key \"value\"`, got `{key_val_str}`"
    );
  }

  // GFF allows empty values filled with dots. We don't need these dots.
  if val == "." {
    val = String::new();
  }

  Ok((key, val))
}

fn parse_attributes(attribs_str: &str) -> Result<BTreeMap<String, String>, Report> {
  attribs_str
    .split(';')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(parse_attribute)
    .collect()
}

fn get_gene_name(attrib_map: &BTreeMap<String, String>) -> Result<String, Report> {
  attrib_map
    .get(GFF_ATTRIB_KEY_GENE_NAME)
    .cloned()
    .ok_or_else(|| eyre::eyre!("GFF parser: expected attribute `{GFF_ATTRIB_KEY_GENE_NAME}` is missing"))
}

struct RawGeneRow {
  gene_name: String,
  start: usize,
  end: usize,
  strand: String,
  frame: usize,
}

/// Validates one GFF3 `gene` row against the 1-based, closed-interval conventions of the format
/// (grounded on the original parser's `validateGene`), before converting to zero-based,
/// half-open coordinates.
fn validate_gene_row(row: &RawGeneRow) -> Result<(), Report> {
  if row.gene_name.is_empty() {
    return make_error!("GFF parser: empty gene names are not allowed");
  }
  if row.start < 1 || row.start > row.end {
    return make_error!(
      "GFF parser: in gene \"{}\": range is invalid: ({}, {})",
      row.gene_name,
      row.start,
      row.end
    );
  }

  let length = row.end - row.start + 1;
  if length % 3 != 0 {
    return make_error!(
      "GFF parser: gene \"{}\": length {length} is not divisible by 3. Start: {}, end: {}",
      row.gene_name,
      row.start,
      row.end
    );
  }

  if row.frame < 1 || row.frame > 3 {
    return make_error!(
      "GFF parser: in gene \"{}\": frame \"{}\" is invalid, expected an integer 1, 2, or 3 (NOTE: indices in GFF files are one-based)",
      row.gene_name,
      row.frame
    );
  }

  let frame_expected = (row.start % 3) + 1;
  if row.frame != frame_expected {
    return make_error!(
      "GFF parser: in gene \"{}\": frame \"{}\" is inconsistent: with gene start position {} it is expected to be in frame \"{}\". (NOTE: indices in GFF files are one-based)",
      row.gene_name,
      row.frame,
      row.start,
      frame_expected
    );
  }

  if row.strand != "+" && row.strand != "-" {
    return make_error!(
      "GFF parser: in gene \"{}\": gene strand is invalid: \"{}\", expected \"+\" or \"-\"",
      row.gene_name,
      row.strand
    );
  }

  Ok(())
}

/// Parses a GFF3 gene map, keeping only `feature == "gene"` rows (spec §6 gene map input).
/// Coordinates are converted from GFF3's 1-based closed interval to this crate's zero-based
/// half-open convention.
pub fn parse_gene_map_gff3(content: &str) -> Result<GeneMap, Report> {
  let mut gene_map = GeneMap::new();

  for line in content.lines() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < 9 {
      return make_error!("GFF parser: expected 9 tab-separated columns, found {}", columns.len());
    }

    let feature = columns[2];
    if feature != "gene" {
      continue;
    }

    let start: usize = columns[3]
      .parse()
      .wrap_err_with(|| format!("GFF parser: invalid start coordinate: '{}'", columns[3]))?;
    let end: usize = columns[4]
      .parse()
      .wrap_err_with(|| format!("GFF parser: invalid end coordinate: '{}'", columns[4]))?;
    let strand = columns[6].to_owned();
    let frame: usize = columns[7]
      .parse()
      .wrap_err_with(|| format!("GFF parser: invalid frame: '{}'", columns[7]))?;
    let attribute = columns[8];

    let attrib_map = parse_attributes(attribute)?;
    let gene_name = get_gene_name(&attrib_map)?;

    let row = RawGeneRow {
      gene_name,
      start,
      end,
      strand,
      frame,
    };
    validate_gene_row(&row)?;

    let gene_strand = if row.strand == "+" { GeneStrand::Forward } else { GeneStrand::Reverse };

    // "-1": convert start to zero-based; `end` stays as-is since the 1-based closed upper
    // bound becomes the zero-based half-open upper bound. Built directly rather than through
    // `Gene::new` because GFF3's frame is relative to the 1-based start (validated above by
    // `validate_gene_row`), not recomputable from the zero-based start the way `Gene::new` does.
    let start = row.start - 1;
    let end = row.end;
    let gene = Gene {
      name: row.gene_name,
      start,
      end,
      strand: gene_strand,
      frame: row.frame - 1,
      length: end - start,
    };

    gene_map.insert(gene);
  }

  Ok(gene_map)
}

pub fn read_gene_map_gff3(filepath: impl AsRef<Path>) -> Result<GeneMap, Report> {
  let filepath = filepath.as_ref();
  let content =
    crate::io::fs::read_file_to_string(filepath).wrap_err_with(|| format!("When reading gene map: {filepath:#?}"))?;
  parse_gene_map_gff3(&content).wrap_err_with(|| format!("When parsing gene map: {filepath:#?}"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn parses_a_single_gene_row() {
    let gff = "##gff-version 3\nNC_045512.2\tfeature_table\tgene\t1\t9\t.\t+\t1\tgene_name \"ORF1\"\n";
    let gene_map = parse_gene_map_gff3(gff).unwrap();
    let gene = gene_map.get("ORF1").unwrap();
    assert_eq!(gene.start, 0);
    assert_eq!(gene.end, 9);
    assert_eq!(gene.strand, GeneStrand::Forward);
  }

  #[test]
  fn skips_non_gene_features() {
    let gff = "NC_045512.2\tfeature_table\tCDS\t1\t9\t.\t+\t1\tgene_name \"ORF1\"\n";
    let gene_map = parse_gene_map_gff3(gff).unwrap();
    assert!(gene_map.is_empty());
  }

  #[test]
  fn rejects_a_gene_with_missing_gene_name_attribute() {
    let gff = "NC_045512.2\tfeature_table\tgene\t1\t9\t.\t+\t1\tid \"ORF1\"\n";
    assert!(parse_gene_map_gff3(gff).is_err());
  }

  #[test]
  fn rejects_a_frame_inconsistent_with_start() {
    let gff = "NC_045512.2\tfeature_table\tgene\t1\t9\t.\t+\t2\tgene_name \"ORF1\"\n";
    assert!(parse_gene_map_gff3(gff).is_err());
  }

  #[test]
  fn rejects_a_length_not_divisible_by_three() {
    let gff = "NC_045512.2\tfeature_table\tgene\t1\t8\t.\t+\t1\tgene_name \"ORF1\"\n";
    assert!(parse_gene_map_gff3(gff).is_err());
  }
}
