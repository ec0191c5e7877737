use crate::alphabet::nuc::Nuc;
use crate::tree::tree_node::{BranchAttrs, NodeAttrValue, TreeNode};
use crate::tree::tree_preprocess::find_node_by_id_mut;
use eyre::{eyre, Report};

/// Everything the attacher needs about one analyzed query, independent of the rest of
/// `AnalysisResult` (spec §4.N).
pub struct AttachmentRequest<'a> {
  pub seq_name: &'a str,
  pub nearest_node_id: usize,
  pub private_mutation_nuc_strings: Vec<String>,
  pub num_private_mutations: usize,
}

/// Attaches one query as a new leaf under its nearest reference node (spec §4.N). If the
/// nearest node is itself a leaf, an auxiliary parent carrying the node's own branch mutations
/// is inserted first, so the query ends up a *sibling* of the original leaf rather than its
/// child — the nearest node's position in the tree (and its own mutations) must not change.
///
/// `ref_length` is used to normalize the new leaf's divergence when the tree reports per-site
/// divergence (`node_attrs.div` present on the nearest node); otherwise divergence is left
/// unset, matching whatever convention the input tree already uses.
pub fn attach_node(root: &mut TreeNode, request: &AttachmentRequest, ref_length: usize) -> Result<(), Report> {
  let nearest = find_node_by_id_mut(root, request.nearest_node_id)
    .ok_or_else(|| eyre!("Tree attachment: node with id {} not found", request.nearest_node_id))?;

  if nearest.is_leaf() {
    add_auxiliary_node(nearest);
  }

  let clade = nearest.node_attrs.clade_membership.clone();
  let divergence = nearest.node_attrs.div.map(|base| base + request.num_private_mutations as f64 / ref_length.max(1) as f64);

  let mut new_leaf = TreeNode {
    name: request.seq_name.to_owned(),
    node_attrs: Default::default(),
    branch_attrs: BranchAttrs::default(),
    children: Vec::new(),
  };
  new_leaf.node_attrs.clade_membership = clade;
  new_leaf.node_attrs.div = divergence;
  new_leaf.node_attrs.node_type = Some(NodeAttrValue::new("New".to_owned()));
  new_leaf.branch_attrs.mutations.nuc = request.private_mutation_nuc_strings.clone();

  nearest.children.push(new_leaf);

  Ok(())
}

/// Turns a leaf into an internal node by pushing its own content down into a new child that
/// keeps its name and branch mutations, then clearing the (former-leaf, now-internal) node's
/// own branch mutations — new children attached afterwards branch directly off this node with
/// zero additional mutations relative to it.
fn add_auxiliary_node(leaf: &mut TreeNode) {
  let aux_child = TreeNode {
    name: leaf.name.clone(),
    node_attrs: leaf.node_attrs.clone(),
    branch_attrs: std::mem::take(&mut leaf.branch_attrs),
    children: Vec::new(),
  };
  leaf.children.push(aux_child);
}

/// Formats a private mutation as an Auspice `branch_attrs.mutations.nuc` string
/// (`"<refNuc><1-based pos><queryNuc>"`, spec §6).
pub fn format_nuc_mutation(ref_nuc: Nuc, pos: usize, query_nuc: Nuc) -> String {
  use crate::alphabet::letter::Letter;
  format!("{}{}{}", ref_nuc.to_char(), pos + 1, query_nuc.to_char())
}
