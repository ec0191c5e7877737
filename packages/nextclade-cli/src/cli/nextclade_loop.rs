use crate::cli::nextclade_cli::NextcladeRunArgs;
use eyre::{Report, WrapErr};
use nextclade::gene::gene_map::GeneMap;
use nextclade::io::errors_csv::{ErrorsCsvWriter, SeqGeneWarnings};
use nextclade::io::fasta::{read_one_fasta, FastaReader, FastaWriter};
use nextclade::io::gff3::read_gene_map_gff3;
use nextclade::io::insertions_csv::InsertionsCsvWriter;
use nextclade::io::nuc_pcr_primers::read_pcr_primers_csv;
use nextclade::io::qc_config::read_qc_config;
use nextclade::io::results_csv::{CsvDelimiter, ResultsCsvWriter};
use nextclade::io::results_json::write_results_json;
use nextclade::io::tree_json::{read_tree_json, write_tree_json};
use nextclade::qc::qc_config::QcConfig;
use nextclade::run::nextclade_run::{run_nextclade, AnalysisOutcome, NextcladeRunOptions};
use nextclade::run::nextclade_run_one::{AnalysisResult, NextcladeContext, NextcladeOutputs};
use nextclade::tree::tree_attach::{attach_node, format_nuc_mutation, AttachmentRequest};
use nextclade::tree::tree_preprocess::postprocess_tree;

/// Loads the gene map, restricting it to `--genes` when given (spec §4.G, "the gene map may be
/// restricted to a subset of genes").
fn load_gene_map(args: &NextcladeRunArgs) -> Result<GeneMap, Report> {
  let Some(input_gene_map) = &args.input_gene_map else {
    return Ok(GeneMap::new());
  };

  let gene_map = read_gene_map_gff3(input_gene_map).wrap_err("When reading the gene map")?;

  let Some(genes) = &args.genes else {
    return Ok(gene_map);
  };

  Ok(
    genes
      .iter()
      .filter_map(|name| gene_map.get(name).cloned())
      .collect(),
  )
}

/// Loads every input file and builds the shared, read-only [`NextcladeContext`] (spec §4: all
/// reference-derived preprocessing happens once, before any query sequence is analyzed).
fn build_context(args: &NextcladeRunArgs) -> Result<NextcladeContext, Report> {
  let reference = read_one_fasta(&args.input_ref).wrap_err("When reading the reference sequence")?;
  let gene_map = load_gene_map(args)?;

  let primers = match &args.input_pcr_primers {
    Some(path) => {
      let (primers, warnings) = read_pcr_primers_csv(path, &reference.seq).wrap_err("When reading PCR primers")?;
      for warning in warnings {
        log::warn!("{warning}");
      }
      primers
    }
    None => Vec::new(),
  };

  let tree = read_tree_json(&args.input_tree).wrap_err("When reading the reference tree")?;

  let qc_config = match &args.input_qc_config {
    Some(path) => read_qc_config(path).wrap_err("When reading the QC config")?,
    None => QcConfig::default(),
  };

  NextcladeContext::new(reference.seq, gene_map, primers, tree, qc_config, args.alignment_params.clone())
    .wrap_err("When building the nextclade run context")
}

struct OutputWriters {
  aligned_fasta: FastaWriter,
  gene_fasta: std::collections::BTreeMap<String, FastaWriter>,
  insertions_csv: InsertionsCsvWriter,
  errors_csv: ErrorsCsvWriter,
  results_csv: ResultsCsvWriter,
  results_tsv: ResultsCsvWriter,
}

impl OutputWriters {
  fn new(args: &NextcladeRunArgs, context: &NextcladeContext) -> Result<Self, Report> {
    let output_fasta = args.output_fasta.as_ref().expect("output filenames are deduced before running");
    let output_insertions = args.output_insertions.as_ref().expect("output filenames are deduced before running");
    let output_errors = args.output_errors.as_ref().expect("output filenames are deduced before running");
    let output_csv = args.output_csv.as_ref().expect("output filenames are deduced before running");
    let output_tsv = args.output_tsv.as_ref().expect("output filenames are deduced before running");
    let output_translations = args
      .output_translations
      .as_ref()
      .expect("output filenames are deduced before running");

    let mut gene_fasta = std::collections::BTreeMap::new();
    for gene_name in context.gene_map.names() {
      let path = output_translations.replace("{gene}", gene_name);
      gene_fasta.insert(gene_name.to_owned(), FastaWriter::from_path(path)?);
    }

    Ok(Self {
      aligned_fasta: FastaWriter::from_path(output_fasta)?,
      gene_fasta,
      insertions_csv: InsertionsCsvWriter::new(output_insertions)?,
      errors_csv: ErrorsCsvWriter::new(output_errors)?,
      results_csv: ResultsCsvWriter::new(output_csv, CsvDelimiter::Comma)?,
      results_tsv: ResultsCsvWriter::new(output_tsv, CsvDelimiter::Tab)?,
    })
  }

  fn write_success(&mut self, seq_name: &str, outputs: &NextcladeOutputs) -> Result<(), Report> {
    self.aligned_fasta.write(seq_name, &outputs.aligned_query)?;
    for peptide in &outputs.query_peptides {
      if let Some(writer) = self.gene_fasta.get_mut(&peptide.name) {
        writer.write(seq_name, &peptide.seq)?;
      }
    }
    self.insertions_csv.write(&outputs.analysis_result)?;
    self.results_csv.write(&outputs.analysis_result)?;
    self.results_tsv.write(&outputs.analysis_result)?;

    let failed_genes = outputs.analysis_result.missing_genes.clone();
    let warnings = outputs.analysis_result.warnings.iter().map(ToString::to_string).collect();
    self.errors_csv.write_warnings(&SeqGeneWarnings {
      seq_name: seq_name.to_owned(),
      warnings,
      failed_genes,
    })?;

    Ok(())
  }

  fn flush(&mut self) -> Result<(), Report> {
    self.aligned_fasta.flush()?;
    for writer in self.gene_fasta.values_mut() {
      writer.flush()?;
    }
    self.insertions_csv.flush()?;
    self.errors_csv.flush()?;
    self.results_csv.flush()?;
    self.results_tsv.flush()?;
    Ok(())
  }
}

/// Runs the full end-to-end pipeline (spec §2): reads every input, fans the query sequences out
/// across the worker pool, writes every per-sequence output as results arrive, then performs the
/// single-threaded tree attachment pass and writes the results JSON and the output tree.
pub fn nextclade_run_cli(args: NextcladeRunArgs) -> Result<(), Report> {
  let context = build_context(&args).wrap_err("When preparing the run")?;
  let mut writers = OutputWriters::new(&args, &context).wrap_err("When opening output files")?;

  let reader = FastaReader::from_path(&args.input_fasta).wrap_err("When opening input sequences")?;
  let options = NextcladeRunOptions {
    jobs: args.jobs.max(1),
    in_order: args.in_order,
  };

  let mut results: Vec<AnalysisResult> = Vec::new();
  let mut attachment_requests: Vec<(usize, Vec<String>, usize)> = Vec::new();
  let mut num_good = 0usize;
  let mut num_errors = 0usize;

  run_nextclade(reader, &context, &options, |outcome| match outcome {
    AnalysisOutcome::Success(outputs) => {
      let seq_name = outputs.analysis_result.seq_name.clone();
      if let Err(err) = writers.write_success(&seq_name, &outputs) {
        log::error!("When writing outputs for '{seq_name}': {err:#}");
      }

      let private_mutation_nuc_strings = outputs
        .analysis_result
        .private_nuc_mutations
        .iter()
        .map(|m| format_nuc_mutation(m.ref_nuc, m.pos, m.query_nuc))
        .collect();
      attachment_requests.push((
        outputs.analysis_result.nearest_node_id,
        private_mutation_nuc_strings,
        outputs.analysis_result.total_private_mutations,
      ));

      num_good += 1;
      results.push(outputs.analysis_result);
    }
    AnalysisOutcome::Error(err) => {
      num_errors += 1;
      if let Err(write_err) = writers.errors_csv.write_error(&err.seq_name, &err.error) {
        log::error!("When writing an error row for '{}': {write_err:#}", err.seq_name);
      }
      log::error!("{}: {}", err.seq_name, err.error);
    }
  })
  .wrap_err("When running the analysis pipeline")?;

  writers.flush().wrap_err("When flushing output writers")?;

  log::info!("Done. {num_good} sequence(s) analyzed, {num_errors} sequence(s) failed.");

  let mut tree = context.tree;
  let ref_length = context.ref_seq.len();
  for (index, (nearest_node_id, private_mutation_nuc_strings, num_private_mutations)) in attachment_requests.iter().enumerate() {
    let request = AttachmentRequest {
      seq_name: &results[index].seq_name,
      nearest_node_id: *nearest_node_id,
      private_mutation_nuc_strings: private_mutation_nuc_strings.clone(),
      num_private_mutations: *num_private_mutations,
    };
    if let Err(err) = attach_node(&mut tree.tree, &request, ref_length) {
      log::error!("When attaching '{}' to the output tree: {err:#}", results[index].seq_name);
    }
  }
  postprocess_tree(&mut tree);

  let output_tree = args.output_tree.as_ref().expect("output filenames are deduced before running");
  write_tree_json(output_tree, &tree).wrap_err("When writing the output tree")?;

  let output_json = args.output_json.as_ref().expect("output filenames are deduced before running");
  write_results_json(output_json, &results).wrap_err("When writing the results JSON")?;

  Ok(())
}
