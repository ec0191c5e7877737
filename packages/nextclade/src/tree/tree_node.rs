use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `node_attrs.<name>.value` wrapper used throughout Auspice v2 (spec §6 "Tree JSON").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeAttrValue<T> {
  pub value: T,
}

impl<T> NodeAttrValue<T> {
  pub fn new(value: T) -> Self {
    Self { value }
  }
}

/// Attributes attached to a tree node's visual/metadata representation. Only the fields this
/// crate reads or writes are named explicitly; everything else round-trips through `other` so
/// an Auspice tree we didn't originate stays intact.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeAttrs {
  pub clade_membership: Option<NodeAttrValue<String>>,

  #[serde(rename = "Node type")]
  pub node_type: Option<NodeAttrValue<String>>,

  pub div: Option<f64>,

  #[serde(flatten)]
  pub other: IndexMap<String, Value>,
}

/// `branch_attrs.mutations.nuc`: strings of the form `"<refNuc><1-based pos><queryNuc>"` (spec
/// §6).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BranchAttrsMutations {
  #[serde(default)]
  pub nuc: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BranchAttrs {
  #[serde(default)]
  pub mutations: BranchAttrsMutations,
}

/// One node of the Auspice v2 tree (spec §3 `Tree / TreeNode`). A value tree: children are
/// owned directly rather than referenced, so attachment (§4.N) is ordinary insertion into
/// `children` and never invalidates a live reference held elsewhere.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeNode {
  pub name: String,

  #[serde(default)]
  pub node_attrs: NodeAttrs,

  #[serde(default)]
  pub branch_attrs: BranchAttrs,

  #[serde(default)]
  pub children: Vec<TreeNode>,
}

impl TreeNode {
  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }
}

/// The full Auspice v2 document (spec §6 "Tree JSON"). `meta` is kept as opaque JSON since
/// nothing in this crate needs to interpret it beyond passing it through to the output tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuspiceTree {
  pub meta: Value,
  pub tree: TreeNode,

  #[serde(flatten)]
  pub other: IndexMap<String, Value>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn round_trips_a_minimal_tree_through_json() {
    let json = serde_json::json!({
      "meta": {"title": "test"},
      "tree": {
        "name": "root",
        "node_attrs": {"clade_membership": {"value": "20A"}},
        "branch_attrs": {"mutations": {"nuc": ["A123T"]}},
        "children": [
          {"name": "child", "children": []}
        ]
      }
    });

    let tree: AuspiceTree = serde_json::from_value(json).unwrap();
    assert_eq!(tree.tree.name, "root");
    assert_eq!(tree.tree.node_attrs.clade_membership.unwrap().value, "20A");
    assert_eq!(tree.tree.branch_attrs.mutations.nuc, vec!["A123T".to_owned()]);
    assert_eq!(tree.tree.children.len(), 1);
    assert!(tree.tree.children[0].is_leaf());
  }
}
