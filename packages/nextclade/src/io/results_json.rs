use crate::io::fs::create_file_or_stdout;
use crate::io::json::json_write_impl;
use crate::run::nextclade_run_one::AnalysisResult;
use eyre::{Report, WrapErr};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::Path;

/// Schema version embedded in `<prefix>.json` output (spec §6), bumped whenever
/// [`AnalysisResult`]'s shape changes in a way that could break downstream consumers.
pub const RESULTS_JSON_SCHEMA_VERSION: &str = "3.0.0";

/// The full `<prefix>.json` document (spec §6): an array of [`AnalysisResult`]s plus a schema
/// version and the nextclade version that produced them.
#[derive(Clone, Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultsJson<'a> {
  pub schema_version: &'a str,
  pub nextclade_version: &'a str,
  pub results: &'a [AnalysisResult],
}

/// Writes `<prefix>.json` (spec §6 outputs).
pub fn write_results_json(filepath: impl AsRef<Path>, results: &[AnalysisResult]) -> Result<(), Report> {
  let filepath = filepath.as_ref();
  let file = create_file_or_stdout(filepath)?;
  let payload = ResultsJson {
    schema_version: RESULTS_JSON_SCHEMA_VERSION,
    nextclade_version: env!("CARGO_PKG_VERSION"),
    results,
  };
  json_write_impl(file, &payload).wrap_err_with(|| format!("When writing results JSON to file: {filepath:#?}"))
}
