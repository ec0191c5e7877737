//! Literal end-to-end scenarios from spec §8: each test drives the public alignment/analysis
//! API the same way `NextcladeContext::analyze` does, on hand-built sequences small enough to
//! verify by hand, rather than asserting on real-world reference data.

use nextclade::align::align::{align, align_with_band};
use nextclade::align::gap_open_close::build_gap_open_close;
use nextclade::align::params::{AlignPairwiseParams, SeedParameters};
use nextclade::align::score_matrix::ScoreParams;
use nextclade::alphabet::nuc::{from_nuc_seq, nuc_letters_match, to_nuc_seq};
use nextclade::analyze::aa_changes::{get_aminoacid_changes, PeptideInternal};
use nextclade::analyze::find_nuc_changes::find_nuc_changes;
use nextclade::coord::range::Range;
use nextclade::gene::gene::{Gene, GeneStrand};
use nextclade::gene::gene_map::GeneMap;
use nextclade::strip::strip_insertions::strip_insertions;
use nextclade::translate::translate::translate;
use pretty_assertions::assert_eq;

fn score_params() -> ScoreParams {
  ScoreParams {
    gap_extend: 0,
    score_match: 3,
    penalty_mismatch: 1,
  }
}

/// Scenario 1: identical sequences align without gaps at the maximal possible score.
#[test]
fn scenario_1_identical_sequences_score_27() {
  let reff = to_nuc_seq("ACGCTCGCT").unwrap();
  let query = reff.clone();
  let gap_open_close = vec![-6; reff.len() + 2];
  let seed_params = SeedParameters::nuc_defaults();

  let aln = align(
    &query,
    &reff,
    &gap_open_close,
    0,
    400,
    500_000_000,
    &seed_params,
    &score_params(),
    nuc_letters_match,
  )
  .unwrap();

  assert_eq!(from_nuc_seq(&aln.reff), "ACGCTCGCT");
  assert_eq!(from_nuc_seq(&aln.qry), "ACGCTCGCT");
  assert_eq!(aln.score, 27);
}

/// Scenario 2: a query missing a leading chunk of the reference aligns with a leading deletion,
/// which `find_nuc_changes` reports as a single run.
#[test]
fn scenario_2_leading_deletion_score_18() {
  let reff = to_nuc_seq("ACGCTCGCT").unwrap();
  let query = to_nuc_seq("CTCGCT").unwrap();
  let gap_open_close = vec![-6; reff.len() + 2];
  let seed_params = SeedParameters::nuc_defaults();

  let aln = align(
    &query,
    &reff,
    &gap_open_close,
    0,
    400,
    500_000_000,
    &seed_params,
    &score_params(),
    nuc_letters_match,
  )
  .unwrap();

  assert_eq!(from_nuc_seq(&aln.reff), "ACGCTCGCT");
  assert_eq!(from_nuc_seq(&aln.qry), "---CTCGCT");
  assert_eq!(aln.score, 18);

  let report = find_nuc_changes(&aln.reff, &aln.qry);
  assert_eq!(report.substitutions.len(), 0);
  assert_eq!(report.deletions.len(), 1);
  assert_eq!(report.deletions[0].start, 0);
  assert_eq!(report.deletions[0].length, 3);
}

/// Scenario 3: a query with extra flanking material aligns with the reference gapped out at
/// both ends; `strip_insertions` recovers the un-gapped query and reports the stripped chunks.
#[test]
fn scenario_3_query_insertions_are_stripped() {
  let reff = to_nuc_seq("ACGCTC").unwrap();
  let query = to_nuc_seq("GCCACGCTCGCT").unwrap();
  let gap_open_close = vec![-6; reff.len() + 2];
  let seed_params = SeedParameters::nuc_defaults();

  let aln = align(
    &query,
    &reff,
    &gap_open_close,
    0,
    400,
    500_000_000,
    &seed_params,
    &score_params(),
    nuc_letters_match,
  )
  .unwrap();

  assert_eq!(from_nuc_seq(&aln.reff), "---ACGCTC---");
  assert_eq!(from_nuc_seq(&aln.qry), "GCCACGCTCGCT");

  let stripped = strip_insertions(&aln.reff, &aln.qry);
  assert_eq!(from_nuc_seq(&stripped.query_stripped), "ACGCTC");
  assert_eq!(stripped.insertions.len(), 2);
  assert_eq!(stripped.insertions[0].pos, 0);
  assert_eq!(stripped.insertions[0].len, 3);
  assert_eq!(from_nuc_seq(&stripped.insertions[0].ins), "GCC");
  assert_eq!(stripped.insertions[1].pos, 6);
  assert_eq!(stripped.insertions[1].len, 3);
  assert_eq!(from_nuc_seq(&stripped.insertions[1].ins), "GCT");
}

/// Scenario 4: a query with two in-frame deletions inside a selected gene aligns cheaper than
/// the equivalent out-of-frame placement would, because `build_gap_open_close` makes codon
/// starts of `ORF1` cheaper to gap than the rest of the reference.
#[test]
fn scenario_4_codon_aware_alignment_score_38() {
  let reff = to_nuc_seq("GCATGAGGAATCTCAGTGCTTTG").unwrap();
  let query = to_nuc_seq("CATGAATCTCAGTTTG").unwrap();

  let mut gene_map = GeneMap::new();
  gene_map.insert(Gene::new("ORF1", 2, 20, GeneStrand::Forward, reff.len()).unwrap());

  let mut params = AlignPairwiseParams::default();
  params.penalty_gap_open_in_frame = 5;
  params.penalty_gap_open_out_of_frame = 6;

  let gap_open_close = build_gap_open_close(reff.len(), &gene_map, &params);
  let seed_params = SeedParameters::nuc_defaults();

  let aln = align(
    &query,
    &reff,
    &gap_open_close,
    0,
    400,
    500_000_000,
    &seed_params,
    &score_params(),
    nuc_letters_match,
  )
  .unwrap();

  assert_eq!(from_nuc_seq(&aln.qry), "-CATG---AATCTCAGT---TTG");
  assert_eq!(aln.score, 38);
}

/// Scenario 6: a substitution and a deletion inside a gene are called with their surrounding
/// nucleotide context, matching the amino-acid change reporting of spec §4.I.
#[test]
fn scenario_6_aminoacid_substitution_and_deletion() {
  let prefix = "A".repeat(27);
  let ref_gene = "CTACCAGGTCAAACTGACTGGAACGTCTTC";
  let query_gene = "ATTCCAGGT---ACTGACTGGAACGTCTTC";

  let ref_full = format!("{prefix}GGA{ref_gene}");
  let query_full = format!("{prefix}GGA{query_gene}");
  assert_eq!(ref_full.len(), 60);
  assert_eq!(query_full.len(), 60);

  let ref_nuc = to_nuc_seq(&ref_full).unwrap();
  let query_nuc = to_nuc_seq(&query_full).unwrap();

  let mut gene_map = GeneMap::new();
  gene_map.insert(Gene::new("ORF1", 30, 60, GeneStrand::Forward, 60).unwrap());

  let ref_peptide_seq = translate(&to_nuc_seq(ref_gene).unwrap(), false).unwrap();
  let query_peptide_seq = translate(&to_nuc_seq(query_gene).unwrap(), false).unwrap();

  let ref_peptides = vec![PeptideInternal {
    name: "ORF1".to_owned(),
    seq: ref_peptide_seq,
  }];
  let query_peptides = vec![PeptideInternal {
    name: "ORF1".to_owned(),
    seq: query_peptide_seq,
  }];

  let alignment_range = Range::new(0, 60);
  let result = get_aminoacid_changes(&ref_nuc, &query_nuc, &ref_peptides, &query_peptides, &alignment_range, &gene_map).unwrap();

  assert_eq!(result.aa_substitutions.len(), 1);
  let sub = &result.aa_substitutions[0];
  assert_eq!(sub.gene, "ORF1");
  assert_eq!(sub.codon, 0);
  assert_eq!(sub.codon_nuc_range, Range::new(30, 33));
  assert_eq!(sub.context_nuc_range, Range::new(27, 36));
  assert_eq!(from_nuc_seq(&sub.ref_context), "GGACTACCA");
  assert_eq!(from_nuc_seq(&sub.query_context), "GGAATTCCA");

  assert_eq!(result.aa_deletions.len(), 1);
  let del = &result.aa_deletions[0];
  assert_eq!(del.gene, "ORF1");
  assert_eq!(del.codon, 3);
  assert_eq!(del.codon_nuc_range, Range::new(39, 42));
}

/// `align_with_band` bypasses seeding altogether, for peptide alignment driven by externally
/// supplied band geometry: confirm it still reports a sane score on a trivial identity case.
#[test]
fn align_with_band_bypasses_seed_search() {
  let reff = to_nuc_seq("ACGCTCGCT").unwrap();
  let query = reff.clone();
  let gap_open_close = vec![-6; reff.len() + 2];

  let aln = align_with_band(&query, &reff, &gap_open_close, &score_params(), 5, 0, nuc_letters_match);

  assert_eq!(from_nuc_seq(&aln.reff), "ACGCTCGCT");
  assert_eq!(from_nuc_seq(&aln.qry), "ACGCTCGCT");
  assert_eq!(aln.score, 27);
}
