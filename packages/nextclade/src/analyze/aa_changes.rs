use crate::alphabet::aa::Aa;
use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::Nuc;
use crate::analyze::find_nuc_changes::{NucleotideDeletion, NucleotideSubstitution};
use crate::coord::range::Range;
use crate::gene::gene_map::GeneMap;
use eyre::Report;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An amino-acid substitution relative to the reference peptide (spec §3 `AminoacidSubstitution`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AminoacidSubstitution {
  pub gene: String,
  pub ref_aa: Aa,
  pub codon: usize,
  pub query_aa: Aa,
  pub codon_nuc_range: Range,
  pub ref_context: Vec<Nuc>,
  pub query_context: Vec<Nuc>,
  pub context_nuc_range: Range,
  /// Nucleotide substitutions whose position falls inside `codon_nuc_range`, filled in by
  /// [`crate::analyze::link_changes::link_nuc_and_aa_changes_in_place`]. Left empty on the
  /// embedded copies stored back on those substitutions, to keep the cross-link one level deep.
  pub nuc_substitutions: Vec<NucleotideSubstitution>,
  /// Nucleotide deletions whose range intersects `codon_nuc_range` (see `nuc_substitutions`).
  pub nuc_deletions: Vec<NucleotideDeletion>,
}

/// An amino-acid deletion relative to the reference peptide (spec §3 `AminoacidDeletion`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AminoacidDeletion {
  pub gene: String,
  pub ref_aa: Aa,
  pub codon: usize,
  pub codon_nuc_range: Range,
  pub ref_context: Vec<Nuc>,
  pub query_context: Vec<Nuc>,
  pub context_nuc_range: Range,
  /// Nucleotide substitutions whose position falls inside `codon_nuc_range` (see
  /// [`AminoacidSubstitution::nuc_substitutions`]).
  pub nuc_substitutions: Vec<NucleotideSubstitution>,
  /// Nucleotide deletions whose range intersects `codon_nuc_range`.
  pub nuc_deletions: Vec<NucleotideDeletion>,
}

pub struct AminoacidChangesResult {
  pub aa_substitutions: Vec<AminoacidSubstitution>,
  pub aa_deletions: Vec<AminoacidDeletion>,
}

/// A reference or query peptide, keyed by the gene it was translated from (spec §4.F output).
#[derive(Clone, Debug)]
pub struct PeptideInternal {
  pub name: String,
  pub seq: Vec<Aa>,
}

/// Finds amino-acid substitutions and deletions in one gene, comparing query peptide to
/// reference peptide codon-by-codon (spec §4.I). Codons falling outside `alignment_range`
/// (i.e. beyond the aligned region of the query) are skipped rather than called.
fn get_aminoacid_changes_for_gene(
  ref_nuc: &[Nuc],
  query_nuc: &[Nuc],
  ref_peptide: &[Aa],
  query_peptide: &[Aa],
  gene_name: &str,
  gene_start: usize,
  alignment_range: &Range,
  aa_substitutions: &mut Vec<AminoacidSubstitution>,
  aa_deletions: &mut Vec<AminoacidDeletion>,
) {
  let num_nucs = query_nuc.len();
  let num_codons = query_peptide.len();

  for codon in 0..num_codons {
    let ref_aa = ref_peptide[codon];
    let query_aa = query_peptide[codon];

    let codon_begin = gene_start + codon * 3;
    let codon_end = codon_begin + 3;

    if !alignment_range.contains(codon_begin) || !alignment_range.contains(codon_end) {
      continue;
    }

    let context_begin = codon_begin.saturating_sub(3).min(num_nucs);
    let context_end = (codon_end + 3).min(num_nucs);

    let ref_context = ref_nuc[context_begin..context_end].to_vec();
    let query_context = query_nuc[context_begin..context_end].to_vec();
    let context_nuc_range = Range::new(context_begin, context_end);
    let codon_nuc_range = Range::new(codon_begin, codon_end);

    if query_aa.is_gap() {
      aa_deletions.push(AminoacidDeletion {
        gene: gene_name.to_owned(),
        ref_aa,
        codon,
        codon_nuc_range,
        ref_context,
        query_context,
        context_nuc_range,
        nuc_substitutions: Vec::new(),
        nuc_deletions: Vec::new(),
      });
    } else if query_aa != ref_aa && query_aa != Aa::X {
      aa_substitutions.push(AminoacidSubstitution {
        gene: gene_name.to_owned(),
        ref_aa,
        codon,
        query_aa,
        codon_nuc_range,
        ref_context,
        query_context,
        context_nuc_range,
        nuc_substitutions: Vec::new(),
        nuc_deletions: Vec::new(),
      });
    }
  }
}

/// Finds amino-acid substitutions and deletions across all translated genes (spec §4.I).
/// `ref_peptides`/`query_peptides` are required to be translated from the same set of genes,
/// in the same order; nucleotide sequences are required to be stripped of insertions.
pub fn get_aminoacid_changes(
  ref_nuc: &[Nuc],
  query_nuc: &[Nuc],
  ref_peptides: &[PeptideInternal],
  query_peptides: &[PeptideInternal],
  alignment_range: &Range,
  gene_map: &GeneMap,
) -> Result<AminoacidChangesResult, Report> {
  let mut aa_substitutions = Vec::new();
  let mut aa_deletions = Vec::new();

  for (ref_peptide, query_peptide) in ref_peptides.iter().zip(query_peptides.iter()) {
    let gene_name = &ref_peptide.name;

    let gene = gene_map.get(gene_name).ok_or_else(|| {
      let names = gene_map.names().map(|n| format!("\"{n}\"")).collect::<Vec<_>>().join(", ");
      eyre::eyre!(
        "When searching for aminoacid mutations: gene \"{gene_name}\" was not found in the gene map. \
         The genes present in the gene map were: {names}."
      )
    })?;

    get_aminoacid_changes_for_gene(
      ref_nuc,
      query_nuc,
      &ref_peptide.seq,
      &query_peptide.seq,
      gene_name,
      gene.start,
      alignment_range,
      &mut aa_substitutions,
      &mut aa_deletions,
    );
  }

  Ok(AminoacidChangesResult {
    aa_substitutions,
    aa_deletions,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::to_nuc_seq;
  use crate::gene::gene::{Gene, GeneStrand};
  use pretty_assertions::assert_eq;

  fn gene_map_with_one_gene(name: &str, start: usize, end: usize, ref_length: usize) -> GeneMap {
    let gene = Gene::new(name, start, end, GeneStrand::Forward, ref_length).unwrap();
    GeneMap::from_iter(vec![gene])
  }

  #[test]
  fn calls_a_substitution_in_a_gene() {
    let ref_nuc = to_nuc_seq("ATGGCGTAA").unwrap();
    let query_nuc = to_nuc_seq("ATGCCGTAA").unwrap();
    let ref_peptide = PeptideInternal {
      name: "ORF1".to_owned(),
      seq: vec![Aa::M, Aa::A, Aa::Stop],
    };
    let query_peptide = PeptideInternal {
      name: "ORF1".to_owned(),
      seq: vec![Aa::M, Aa::P, Aa::Stop],
    };
    let gene_map = gene_map_with_one_gene("ORF1", 0, 9, 9);
    let alignment_range = Range::new(0, 9);

    let result = get_aminoacid_changes(
      &ref_nuc,
      &query_nuc,
      &[ref_peptide],
      &[query_peptide],
      &alignment_range,
      &gene_map,
    )
    .unwrap();

    assert_eq!(result.aa_substitutions.len(), 1);
    assert_eq!(result.aa_substitutions[0].ref_aa, Aa::A);
    assert_eq!(result.aa_substitutions[0].query_aa, Aa::P);
    assert_eq!(result.aa_substitutions[0].codon, 1);
    assert_eq!(result.aa_substitutions[0].codon_nuc_range, Range::new(3, 6));
    assert!(result.aa_deletions.is_empty());
  }

  #[test]
  fn calls_a_deletion_when_query_codon_is_a_gap() {
    let ref_nuc = to_nuc_seq("ATGGCGTAA").unwrap();
    let query_nuc = to_nuc_seq("ATG---TAA").unwrap();
    let ref_peptide = PeptideInternal {
      name: "ORF1".to_owned(),
      seq: vec![Aa::M, Aa::A, Aa::Stop],
    };
    let query_peptide = PeptideInternal {
      name: "ORF1".to_owned(),
      seq: vec![Aa::M, Aa::Gap, Aa::Stop],
    };
    let gene_map = gene_map_with_one_gene("ORF1", 0, 9, 9);
    let alignment_range = Range::new(0, 9);

    let result = get_aminoacid_changes(
      &ref_nuc,
      &query_nuc,
      &[ref_peptide],
      &[query_peptide],
      &alignment_range,
      &gene_map,
    )
    .unwrap();

    assert_eq!(result.aa_deletions.len(), 1);
    assert_eq!(result.aa_deletions[0].ref_aa, Aa::A);
    assert_eq!(result.aa_deletions[0].codon, 1);
    assert!(result.aa_substitutions.is_empty());
  }

  #[test]
  fn skips_ambiguous_x_query_aminoacid() {
    let ref_nuc = to_nuc_seq("ATGGCGTAA").unwrap();
    let query_nuc = to_nuc_seq("ATGNNNTAA").unwrap();
    let ref_peptide = PeptideInternal {
      name: "ORF1".to_owned(),
      seq: vec![Aa::M, Aa::A, Aa::Stop],
    };
    let query_peptide = PeptideInternal {
      name: "ORF1".to_owned(),
      seq: vec![Aa::M, Aa::X, Aa::Stop],
    };
    let gene_map = gene_map_with_one_gene("ORF1", 0, 9, 9);
    let alignment_range = Range::new(0, 9);

    let result = get_aminoacid_changes(
      &ref_nuc,
      &query_nuc,
      &[ref_peptide],
      &[query_peptide],
      &alignment_range,
      &gene_map,
    )
    .unwrap();

    assert!(result.aa_substitutions.is_empty());
    assert!(result.aa_deletions.is_empty());
  }

  #[test]
  fn skips_codons_outside_alignment_range() {
    let ref_nuc = to_nuc_seq("ATGGCGTAA").unwrap();
    let query_nuc = to_nuc_seq("ATGCCGTAA").unwrap();
    let ref_peptide = PeptideInternal {
      name: "ORF1".to_owned(),
      seq: vec![Aa::M, Aa::A, Aa::Stop],
    };
    let query_peptide = PeptideInternal {
      name: "ORF1".to_owned(),
      seq: vec![Aa::M, Aa::P, Aa::Stop],
    };
    let gene_map = gene_map_with_one_gene("ORF1", 0, 9, 9);
    // alignment only covers the first codon
    let alignment_range = Range::new(0, 3);

    let result = get_aminoacid_changes(
      &ref_nuc,
      &query_nuc,
      &[ref_peptide],
      &[query_peptide],
      &alignment_range,
      &gene_map,
    )
    .unwrap();

    assert!(result.aa_substitutions.is_empty());
  }

  #[test]
  fn errors_when_gene_is_missing_from_gene_map() {
    let ref_nuc = to_nuc_seq("ATGGCGTAA").unwrap();
    let query_nuc = to_nuc_seq("ATGCCGTAA").unwrap();
    let ref_peptide = PeptideInternal {
      name: "ORF2".to_owned(),
      seq: vec![Aa::M, Aa::A, Aa::Stop],
    };
    let query_peptide = PeptideInternal {
      name: "ORF2".to_owned(),
      seq: vec![Aa::M, Aa::P, Aa::Stop],
    };
    let gene_map = gene_map_with_one_gene("ORF1", 0, 9, 9);
    let alignment_range = Range::new(0, 9);

    let result = get_aminoacid_changes(
      &ref_nuc,
      &query_nuc,
      &[ref_peptide],
      &[query_peptide],
      &alignment_range,
      &gene_map,
    );
    assert!(result.is_err());
  }
}
