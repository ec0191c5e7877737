use crate::io::json::{json_read, json_write};
use crate::tree::tree_node::AuspiceTree;
use eyre::{Report, WrapErr};
use std::path::Path;

/// Loads a reference tree (spec §6 "Tree JSON") from the dataset's `tree.json`.
pub fn read_tree_json(filepath: impl AsRef<Path>) -> Result<AuspiceTree, Report> {
  let filepath = filepath.as_ref();
  json_read(filepath).wrap_err_with(|| format!("When reading tree JSON: {filepath:#?}"))
}

/// Writes the postprocessed tree with attached query nodes to `<prefix>.auspice.json` (spec §6).
pub fn write_tree_json(filepath: impl AsRef<Path>, tree: &AuspiceTree) -> Result<(), Report> {
  let filepath = filepath.as_ref();
  json_write(filepath, tree).wrap_err_with(|| format!("When writing tree JSON: {filepath:#?}"))
}
