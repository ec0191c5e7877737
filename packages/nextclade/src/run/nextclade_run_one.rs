use crate::align::align::align;
use crate::align::gap_open_close::build_gap_open_close;
use crate::align::params::{AlignPairwiseParams, SeedParameters};
use crate::align::score_matrix::ScoreParams;
use crate::alphabet::aa::Aa;
use crate::alphabet::nuc::{nuc_letters_match, Nuc};
use crate::analyze::aa_changes::{get_aminoacid_changes, AminoacidDeletion, AminoacidSubstitution, PeptideInternal};
use crate::analyze::find_nuc_changes::{find_nuc_changes, NucleotideDeletion, NucleotideSubstitution};
use crate::analyze::find_nucleotide_ranges::{find_character_ranges, CharacterRange};
use crate::analyze::link_changes::link_nuc_and_aa_changes_in_place;
use crate::analyze::nuc_composition::get_nucleotide_composition;
use crate::analyze::pcr_primer_changes::{add_primer_changes_in_place, get_pcr_primer_changes, PcrPrimer, PcrPrimerChange};
use crate::coord::coord_map::CoordMap;
use crate::coord::range::Range;
use crate::error::{NextalignError, PeptideWarning};
use crate::gene::gene_map::GeneMap;
use crate::io::fasta::FastaRecordParsed;
use crate::qc::qc_config::QcConfig;
use crate::qc::rule_frame_shifts::QcFrameShiftLocation;
use crate::qc::run_qc::{run_qc, QcInputs, QcResult};
use crate::strip::strip_insertions::{strip_insertions, Insertion};
use crate::translate::gene_translation::{translate_gene, translate_ref_gene};
use crate::tree::nearest_node::find_nearest_node;
use crate::tree::private_mutations::{find_private_mutations, PrivateMutation};
use crate::tree::tree_node::{AuspiceTree, TreeNode};
use crate::tree::tree_preprocess::{preprocess_tree, PreprocessedNode};
use crate::utils::is_sequenced;
use eyre::{Report, WrapErr};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// A peptide insertion found in one gene, tagged with the gene it belongs to (spec §4.G/§6
/// `insertions.csv` peptide rows).
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneAminoacidInsertion {
  pub gene: String,
  pub pos: usize,
  pub len: usize,
  pub ins: Vec<Aa>,
}

/// A frame shift found in one gene, in whole-alignment nucleotide coordinates (spec §4.F, QC
/// rule `frameShifts`).
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneFrameShift {
  pub gene_name: String,
  pub range: Range,
}

/// Everything `analyze()` reports about one query sequence (spec §3 `AnalysisResult`):
/// nucleotide and amino acid changes, frame shifts, PCR primer disruptions, the private
/// mutations and nearest-node placement from tree search, and the aggregate QC verdict.
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
  pub seq_name: String,

  pub substitutions: Vec<NucleotideSubstitution>,
  pub total_substitutions: usize,
  pub deletions: Vec<NucleotideDeletion>,
  pub total_deletions: usize,
  pub insertions: Vec<Insertion<Nuc>>,
  pub total_insertions: usize,
  pub missing: Vec<CharacterRange<Nuc>>,
  pub total_missing: usize,
  pub non_acgtns: Vec<CharacterRange<Nuc>>,
  pub total_non_acgtns: usize,

  pub aa_substitutions: Vec<AminoacidSubstitution>,
  pub total_aminoacid_substitutions: usize,
  pub aa_deletions: Vec<AminoacidDeletion>,
  pub total_aminoacid_deletions: usize,
  pub aa_insertions: Vec<GeneAminoacidInsertion>,
  pub total_aminoacid_insertions: usize,

  pub frame_shifts: Vec<GeneFrameShift>,
  pub total_frame_shifts: usize,

  pub pcr_primer_changes: Vec<PcrPrimerChange>,
  pub total_pcr_primer_changes: usize,

  pub private_nuc_mutations: Vec<PrivateMutation>,
  pub total_private_mutations: usize,

  pub alignment_start: usize,
  pub alignment_end: usize,
  pub alignment_score: i32,

  pub nucleotide_composition: IndexMap<Nuc, usize>,

  pub nearest_node_id: usize,
  pub clade: Option<String>,

  pub qc: QcResult,

  pub missing_genes: Vec<String>,
  pub warnings: Vec<PeptideWarning>,
}

/// `analyze()`'s full return value: the reportable [`AnalysisResult`] plus the sequence data
/// (aligned query, translated peptides) that only the file writers need (spec §6 `aligned.fasta`,
/// `gene.<name>.fasta`).
#[derive(Clone, Debug)]
pub struct NextcladeOutputs {
  pub analysis_result: AnalysisResult,
  pub aligned_query: Vec<Nuc>,
  pub query_peptides: Vec<PeptideInternal>,
}

/// Everything derived once from the reference dataset, shared read-only by every worker that
/// calls `analyze()` (spec §4: "reference preprocessing happens once, shared immutably").
pub struct NextcladeContext {
  pub ref_seq: Vec<Nuc>,
  pub gene_map: GeneMap,
  pub primers: Vec<PcrPrimer>,
  pub tree: AuspiceTree,
  pub preprocessed_nodes: Vec<PreprocessedNode>,
  pub node_clades: BTreeMap<usize, Option<String>>,
  pub qc_config: QcConfig,
  pub align_params: AlignPairwiseParams,
  pub gap_open_close_nuc: Vec<i32>,
  pub ref_peptides: Vec<PeptideInternal>,
  pub gap_open_close_aa: BTreeMap<String, Vec<i32>>,
  pub seed_params_nuc: SeedParameters,
  pub seed_params_aa: SeedParameters,
  pub score_params_nuc: ScoreParams,
  pub score_params_aa: ScoreParams,
}

impl NextcladeContext {
  /// Builds the shared context: computes the gap-open/close cost vector, translates the
  /// reference genes once (spec §4.C/§4.G, the "`ref peptides`" of the control flow diagram),
  /// and preprocesses the reference tree for nearest-node search (spec §4.J).
  pub fn new(
    ref_seq: Vec<Nuc>,
    gene_map: GeneMap,
    primers: Vec<PcrPrimer>,
    mut tree: AuspiceTree,
    qc_config: QcConfig,
    align_params: AlignPairwiseParams,
  ) -> Result<Self, Report> {
    let gap_open_close_nuc = build_gap_open_close(ref_seq.len(), &gene_map, &align_params);

    let score_params_nuc = ScoreParams {
      gap_extend: -align_params.penalty_gap_extend,
      score_match: align_params.score_match,
      penalty_mismatch: align_params.penalty_mismatch,
    };
    let score_params_aa = score_params_nuc;

    let translate_past_stop = !align_params.no_translate_past_stop;
    let coord_map = CoordMap::new(&ref_seq);

    let mut ref_peptides = Vec::with_capacity(gene_map.len());
    let mut gap_open_close_aa = BTreeMap::new();
    for gene in gene_map.iter() {
      let ref_peptide = translate_ref_gene(&ref_seq, gene, &coord_map, translate_past_stop)
        .wrap_err_with(|| format!("When translating reference gene '{}'", gene.name))?;
      let gap_open_close = vec![-align_params.penalty_gap_open; ref_peptide.seq.len() + 2];
      gap_open_close_aa.insert(gene.name.clone(), gap_open_close);
      ref_peptides.push(ref_peptide);
    }

    let preprocessed_nodes = preprocess_tree(&mut tree, &ref_seq).wrap_err("When preprocessing the reference tree")?;

    let mut node_clades = BTreeMap::new();
    collect_node_clades(&tree.tree, &mut node_clades);

    Ok(Self {
      ref_seq,
      gene_map,
      primers,
      tree,
      preprocessed_nodes,
      node_clades,
      qc_config,
      align_params,
      gap_open_close_nuc,
      ref_peptides,
      gap_open_close_aa,
      seed_params_nuc: SeedParameters::nuc_defaults(),
      seed_params_aa: SeedParameters::aa_defaults(),
      score_params_nuc,
      score_params_aa,
    })
  }
}

/// Walks the tree once, reading the stable pre-order id stashed in `node_attrs.other` by
/// `preprocess_tree`, and records each node's clade membership against it so `analyze()` can
/// look up a query's clade by nearest-node id without touching the tree on every call.
fn collect_node_clades(node: &TreeNode, out: &mut BTreeMap<usize, Option<String>>) {
  if let Some(id) = node.node_attrs.other.get("id").and_then(serde_json::Value::as_u64) {
    let clade = node.node_attrs.clade_membership.as_ref().map(|v| v.value.clone());
    out.insert(id as usize, clade);
  }
  for child in &node.children {
    collect_node_clades(child, out);
  }
}

/// Runs the full per-sequence pipeline (spec §2/§4): aligns the query against the reference,
/// translates and calls changes in every gene, calls nucleotide changes, places the query on
/// the reference tree, extracts private mutations and runs QC. Pure: depends only on `fasta`
/// and the shared, read-only `context`, with no access to other queries being processed
/// concurrently. Per-sequence fatal conditions (alignment failure) propagate as
/// [`NextalignError`]; per-gene failures are downgraded to warnings (spec §7).
pub fn analyze(fasta: &FastaRecordParsed, context: &NextcladeContext) -> Result<NextcladeOutputs, NextalignError> {
  let alignment = align(
    &fasta.seq,
    &context.ref_seq,
    &context.gap_open_close_nuc,
    context.align_params.min_length,
    context.align_params.max_indel,
    context.align_params.max_band_area,
    &context.seed_params_nuc,
    &context.score_params_nuc,
    nuc_letters_match,
  )?;

  let coord_map = CoordMap::new(&alignment.reff);
  let translate_past_stop = !context.align_params.no_translate_past_stop;

  let mut query_peptides = Vec::with_capacity(context.gene_map.len());
  let mut aa_insertions = Vec::new();
  let mut frame_shifts = Vec::new();
  let mut missing_genes = Vec::new();
  let mut warnings = Vec::new();

  for gene in context.gene_map.iter() {
    let ref_peptide = context
      .ref_peptides
      .iter()
      .find(|peptide| peptide.name == gene.name)
      .expect("a reference peptide is built for every gene in the gene map");
    let gap_open_close_aa = &context.gap_open_close_aa[&gene.name];

    match translate_gene(
      &alignment.qry,
      &alignment.reff,
      gene,
      &coord_map,
      ref_peptide,
      gap_open_close_aa,
      &context.score_params_aa,
      translate_past_stop,
    ) {
      Ok(result) => {
        for range in result.frame_shifts {
          frame_shifts.push(GeneFrameShift {
            gene_name: gene.name.clone(),
            range,
          });
        }
        for insertion in result.insertions {
          aa_insertions.push(GeneAminoacidInsertion {
            gene: gene.name.clone(),
            pos: insertion.pos,
            len: insertion.len,
            ins: insertion.ins,
          });
        }
        query_peptides.push(result.query_peptide);
      }
      Err(err) => {
        missing_genes.push(gene.name.clone());
        warnings.push(PeptideWarning {
          gene_name: gene.name.clone(),
          message: err.to_string(),
        });
      }
    }
  }

  let stripped = strip_insertions(&alignment.reff, &alignment.qry);
  let num_private_insertions = stripped.insertions.len();
  let total_insertions = stripped.insertions.len();
  let query_stripped = stripped.query_stripped;

  let nuc_report = find_nuc_changes(&context.ref_seq, &query_stripped);
  let mut substitutions = nuc_report.substitutions;
  let mut deletions = nuc_report.deletions;
  let alignment_range = Range::new(nuc_report.alignment_start, nuc_report.alignment_end);

  let ref_peptides_present: Vec<PeptideInternal> = context
    .ref_peptides
    .iter()
    .filter(|peptide| !missing_genes.contains(&peptide.name))
    .cloned()
    .collect();

  let aa_changes = get_aminoacid_changes(
    &context.ref_seq,
    &query_stripped,
    &ref_peptides_present,
    &query_peptides,
    &alignment_range,
    &context.gene_map,
  )?;
  let mut aa_substitutions = aa_changes.aa_substitutions;
  let mut aa_deletions = aa_changes.aa_deletions;

  link_nuc_and_aa_changes_in_place(&mut substitutions, &mut deletions, &mut aa_substitutions, &mut aa_deletions);

  add_primer_changes_in_place(&mut substitutions, &context.primers);
  let pcr_primer_changes = get_pcr_primer_changes(&substitutions, &context.primers);

  let missing = find_character_ranges(&query_stripped, |c| c == Nuc::N);
  let non_acgtns = find_character_ranges(&query_stripped, |c| {
    !matches!(c, Nuc::A | Nuc::C | Nuc::G | Nuc::T | Nuc::N | Nuc::Gap)
  });

  let masked_ranges: Vec<Range> = missing
    .iter()
    .map(|r| Range::new(r.begin, r.end))
    .chain(non_acgtns.iter().map(|r| Range::new(r.begin, r.end)))
    .collect();
  let is_seq = |pos: usize| is_sequenced(pos, &alignment_range, &masked_ranges);

  let query_substitutions: BTreeMap<usize, Nuc> = substitutions.iter().map(|s| (s.pos, s.query_nuc)).collect();
  let nearest_node_id = find_nearest_node(&context.preprocessed_nodes, &query_substitutions, is_seq);
  let nearest_node = context
    .preprocessed_nodes
    .iter()
    .find(|node| node.id == nearest_node_id)
    .expect("find_nearest_node returns an id present in preprocessed_nodes");

  let private_nuc_mutations = find_private_mutations(
    &nearest_node.substitutions,
    &context.ref_seq,
    &substitutions,
    &deletions,
    is_seq,
  );

  let num_private_substitutions = private_nuc_mutations.iter().filter(|m| !m.query_nuc.is_gap()).count();
  let num_private_deletions = private_nuc_mutations.iter().filter(|m| m.query_nuc.is_gap()).count();

  let mut private_substitution_positions: Vec<usize> = private_nuc_mutations
    .iter()
    .filter(|m| !m.query_nuc.is_gap())
    .map(|m| m.pos)
    .collect();
  private_substitution_positions.sort_unstable();

  let nucleotide_composition = get_nucleotide_composition(&query_stripped);

  let qc_frame_shift_locations: Vec<QcFrameShiftLocation> = frame_shifts
    .iter()
    .map(|fs| QcFrameShiftLocation {
      gene_name: fs.gene_name.clone(),
      codon_range: format!("{}-{}", fs.range.begin, fs.range.end),
    })
    .collect();

  let qc_inputs = QcInputs {
    nucleotide_composition: &nucleotide_composition,
    private_substitution_positions: &private_substitution_positions,
    num_private_substitutions,
    num_private_deletions,
    num_private_insertions,
    query_peptides: &query_peptides,
    frame_shifts: &qc_frame_shift_locations,
  };
  let qc = run_qc(&qc_inputs, &context.qc_config);

  let clade = context.node_clades.get(&nearest_node_id).cloned().flatten();

  let total_missing = missing.iter().map(|r| r.length).sum();
  let total_non_acgtns = non_acgtns.iter().map(|r| r.length).sum();
  let total_substitutions = substitutions.len();
  let total_deletions = deletions.len();
  let total_aminoacid_substitutions = aa_substitutions.len();
  let total_aminoacid_deletions = aa_deletions.len();
  let total_aminoacid_insertions = aa_insertions.len();
  let total_frame_shifts = frame_shifts.len();
  let total_pcr_primer_changes = pcr_primer_changes.len();
  let total_private_mutations = private_nuc_mutations.len();

  let analysis_result = AnalysisResult {
    seq_name: fasta.seq_name.clone(),
    substitutions,
    total_substitutions,
    deletions,
    total_deletions,
    insertions: stripped.insertions,
    total_insertions,
    missing,
    total_missing,
    non_acgtns,
    total_non_acgtns,
    aa_substitutions,
    total_aminoacid_substitutions,
    aa_deletions,
    total_aminoacid_deletions,
    aa_insertions,
    total_aminoacid_insertions,
    frame_shifts,
    total_frame_shifts,
    pcr_primer_changes,
    total_pcr_primer_changes,
    private_nuc_mutations,
    total_private_mutations,
    alignment_start: nuc_report.alignment_start,
    alignment_end: nuc_report.alignment_end,
    alignment_score: alignment.score,
    nucleotide_composition,
    nearest_node_id,
    clade,
    qc,
    missing_genes,
    warnings,
  };

  Ok(NextcladeOutputs {
    analysis_result,
    aligned_query: alignment.qry,
    query_peptides,
  })
}
