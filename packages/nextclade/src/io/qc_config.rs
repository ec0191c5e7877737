use crate::io::json::json_read;
use crate::qc::qc_config::QcConfig;
use eyre::{Report, WrapErr};
use std::path::Path;

/// Loads a dataset's `qc.json` (spec §6 QC config JSON).
pub fn read_qc_config(filepath: impl AsRef<Path>) -> Result<QcConfig, Report> {
  let filepath = filepath.as_ref();
  json_read(filepath).wrap_err_with(|| format!("When reading QC config: {filepath:#?}"))
}
