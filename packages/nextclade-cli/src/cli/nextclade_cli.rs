use clap::Parser;
use eyre::{Report, WrapErr};
use nextclade::align::params::AlignPairwiseParams;
use nextclade::io::fs::basename_maybe;
use std::env::current_dir;
use std::path::PathBuf;

/// Alignment, mutation calling, phylogenetic placement, clade assignment and quality control
/// checks for viral genetic sequences.
///
/// Nextclade is a part of Nextstrain project: https://nextstrain.org
///
/// Documentation: https://docs.nextstrain.org/projects/nextclade
#[derive(Parser, Debug)]
#[clap(name = "nextclade")]
#[clap(author, version)]
#[clap(verbatim_doc_comment)]
pub struct NextcladeRunArgs {
  /// Path to a FASTA file with input sequences.
  #[clap(long, short = 'i', alias = "sequences")]
  pub input_fasta: PathBuf,

  /// Path to a FASTA file containing the reference sequence. Must contain exactly one record.
  #[clap(long, short = 'r', alias = "reference")]
  pub input_ref: PathBuf,

  /// Path to the reference tree JSON file (Auspice v2 format).
  #[clap(long, short = 'a', alias = "tree")]
  pub input_tree: PathBuf,

  /// Path to a GFF3 file containing the gene map.
  ///
  /// If not supplied, sequences will not be translated and no amino-acid or frame-shift
  /// analysis will be performed.
  #[clap(long, short = 'm', alias = "genemap")]
  pub input_gene_map: Option<PathBuf>,

  /// Comma-separated list of names of genes to use, restricting the gene map to this subset.
  ///
  /// If not supplied, every gene in the gene map is used.
  #[clap(long, short = 'g', num_args = 1.., value_delimiter = ',')]
  pub genes: Option<Vec<String>>,

  /// Path to a JSON file containing the QC configuration.
  #[clap(long, short = 'Q')]
  pub input_qc_config: Option<PathBuf>,

  /// Path to a CSV file containing PCR primer sites.
  #[clap(long)]
  pub input_pcr_primers: Option<PathBuf>,

  /// Write output files to this directory.
  ///
  /// The base filename can be set using `--output-basename`. Paths can be overridden on a
  /// per-file basis using `--output-*` flags. If the required directory tree does not exist,
  /// it will be created.
  #[clap(long, short = 'd')]
  pub output_dir: Option<PathBuf>,

  /// Set the base filename to use for output files.
  ///
  /// By default uses the filename of `--input-fasta`.
  #[clap(long, short = 'n')]
  pub output_basename: Option<String>,

  /// Whether to include the aligned reference nucleotide sequence and reference peptides in
  /// the output FASTA files.
  #[clap(long)]
  pub include_reference: bool,

  /// Path to output FASTA file with aligned sequences.
  #[clap(long, short = 'o')]
  pub output_fasta: Option<PathBuf>,

  /// Path template for output FASTA files with translated and aligned genes.
  ///
  /// The template string should contain a template placeholder `{gene}`. Example:
  /// `some_dir/gene_{gene}.translation.fasta`.
  #[clap(long, short = 'P')]
  pub output_translations: Option<String>,

  /// Path to output CSV file with stripped nucleotide and amino acid insertions.
  #[clap(long, short = 'I')]
  pub output_insertions: Option<PathBuf>,

  /// Path to output CSV file containing per-sequence errors and warnings.
  #[clap(long, short = 'e')]
  pub output_errors: Option<PathBuf>,

  /// Path to output JSON file with the full results array.
  #[clap(long, short = 'O')]
  pub output_json: Option<PathBuf>,

  /// Path to output CSV file with one row per sequence.
  #[clap(long, short = 'c')]
  pub output_csv: Option<PathBuf>,

  /// Path to output TSV file with one row per sequence.
  #[clap(long, short = 't')]
  pub output_tsv: Option<PathBuf>,

  /// Path to output Auspice v2 JSON tree, extended with the query sequences attached as new
  /// leaves.
  #[clap(long)]
  pub output_tree: Option<PathBuf>,

  /// Number of processing jobs. If not specified, all available CPU threads will be used.
  #[clap(long, short, default_value_t = num_cpus::get())]
  pub jobs: usize,

  /// Emit output sequences in the same order as the input file.
  ///
  /// Without this flag, processing may happen out of order, which is faster due to the
  /// elimination of waiting, but may lead to results written in a different order than the
  /// input. Sequences which trigger errors are always omitted from the main outputs,
  /// regardless of this flag.
  #[clap(long)]
  pub in_order: bool,

  #[clap(flatten)]
  pub alignment_params: AlignPairwiseParams,
}

/// Fills in output filenames left unset on the command line, deriving them from
/// `--output-dir`/`--output-basename` the same way the teacher's `nextalign` CLI does.
pub fn nextclade_get_output_filenames(args: &mut NextcladeRunArgs) -> Result<(), Report> {
  let basename = args
    .output_basename
    .clone()
    .or_else(|| basename_maybe(&args.input_fasta))
    .unwrap_or_else(|| "nextclade".to_owned());

  let output_dir = match &args.output_dir {
    Some(dir) => dir.clone(),
    None => current_dir().wrap_err("When getting current working directory")?,
  };
  args.output_dir.get_or_insert(output_dir.clone());

  args
    .output_fasta
    .get_or_insert_with(|| output_dir.join(format!("{basename}.aligned.fasta")));
  args
    .output_insertions
    .get_or_insert_with(|| output_dir.join(format!("{basename}.insertions.csv")));
  args
    .output_errors
    .get_or_insert_with(|| output_dir.join(format!("{basename}.errors.csv")));
  args
    .output_json
    .get_or_insert_with(|| output_dir.join(format!("{basename}.json")));
  args
    .output_csv
    .get_or_insert_with(|| output_dir.join(format!("{basename}.csv")));
  args
    .output_tsv
    .get_or_insert_with(|| output_dir.join(format!("{basename}.tsv")));
  args
    .output_tree
    .get_or_insert_with(|| output_dir.join(format!("{basename}.auspice.json")));
  args.output_translations.get_or_insert_with(|| {
    output_dir
      .join(format!("{basename}.gene.{{gene}}.fasta"))
      .to_string_lossy()
      .into_owned()
  });

  Ok(())
}

pub fn nextclade_parse_cli_args() -> Result<NextcladeRunArgs, Report> {
  let mut args = NextcladeRunArgs::parse();
  nextclade_get_output_filenames(&mut args).wrap_err("When deducing output filenames")?;
  Ok(args)
}
