use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::Nuc;
use crate::tree::tree_node::{AuspiceTree, TreeNode};
use eyre::{eyre, Report};
use std::collections::BTreeMap;

/// Per-node state derived during preprocessing (spec §4.J), kept in a side table rather than
/// embedded in the tree JSON (spec §9 "per-node accumulated mutations") so the tree stays
/// schema-compliant at all times.
#[derive(Clone, Debug, Default)]
pub struct PreprocessedNode {
  pub id: usize,
  /// Root-to-node accumulated mutations, keyed by zero-based reference position.
  pub mutations: BTreeMap<usize, Nuc>,
  /// `mutations` with gap-valued entries removed.
  pub substitutions: BTreeMap<usize, Nuc>,
}

/// Parses one `branch_attrs.mutations.nuc` entry, e.g. `"A123T"`, into zero-based
/// `(ref_nuc, pos, query_nuc)`.
fn parse_branch_mutation(s: &str) -> Result<(Nuc, usize, Nuc), Report> {
  let chars: Vec<char> = s.chars().collect();
  if chars.len() < 3 {
    return Err(eyre!("Invalid branch mutation string: '{s}'"));
  }
  let ref_nuc = Nuc::from_char(chars[0])?;
  let query_nuc = Nuc::from_char(*chars.last().unwrap())?;
  let pos_one_based: usize = chars[1..chars.len() - 1]
    .iter()
    .collect::<String>()
    .parse()
    .map_err(|_| eyre!("Invalid position in branch mutation string: '{s}'"))?;
  if pos_one_based == 0 {
    return Err(eyre!("Invalid position in branch mutation string: '{s}'"));
  }
  Ok((ref_nuc, pos_one_based - 1, query_nuc))
}

/// Assigns a pre-order `id` to every node (tagged as a temporary `node_attrs.other["id"]`
/// property, removed again by [`postprocess_tree`]) and returns the side table of accumulated
/// mutations/substitutions, indexed by `id` (spec §4.J).
pub fn preprocess_tree(tree: &mut AuspiceTree, ref_seq: &[Nuc]) -> Result<Vec<PreprocessedNode>, Report> {
  let mut nodes = Vec::new();
  let mut next_id = 0;
  preprocess_recursive(&mut tree.tree, ref_seq, &BTreeMap::new(), &mut next_id, &mut nodes)?;
  Ok(nodes)
}

fn preprocess_recursive(
  node: &mut TreeNode,
  ref_seq: &[Nuc],
  parent_mutations: &BTreeMap<usize, Nuc>,
  next_id: &mut usize,
  nodes: &mut Vec<PreprocessedNode>,
) -> Result<(), Report> {
  let mut mutations = parent_mutations.clone();

  for mutation_str in &node.branch_attrs.mutations.nuc {
    let (_ref_nuc, pos, query_nuc) = parse_branch_mutation(mutation_str)?;
    let ref_nuc_here = ref_seq.get(pos).copied().unwrap_or(Nuc::N);
    if query_nuc == ref_nuc_here {
      mutations.remove(&pos);
    } else {
      mutations.insert(pos, query_nuc);
    }
  }

  let substitutions: BTreeMap<usize, Nuc> = mutations.iter().filter(|(_, nuc)| !nuc.is_gap()).map(|(&p, &n)| (p, n)).collect();

  let id = *next_id;
  *next_id += 1;

  node
    .node_attrs
    .other
    .insert("id".to_owned(), serde_json::Value::from(id));
  node
    .node_attrs
    .node_type
    .get_or_insert_with(|| crate::tree::tree_node::NodeAttrValue::new("Reference".to_owned()));

  nodes.push(PreprocessedNode {
    id,
    mutations: mutations.clone(),
    substitutions,
  });

  for child in &mut node.children {
    preprocess_recursive(child, ref_seq, &mutations, next_id, nodes)?;
  }

  Ok(())
}

/// Removes the temporary `id` annotation introduced by [`preprocess_tree`] (spec §4.N
/// postprocess). The side-table `mutations`/`substitutions` never touched the JSON in the
/// first place, so there is nothing else to strip.
pub fn postprocess_tree(tree: &mut AuspiceTree) {
  postprocess_recursive(&mut tree.tree);
}

fn postprocess_recursive(node: &mut TreeNode) {
  node.node_attrs.other.shift_remove("id");
  for child in &mut node.children {
    postprocess_recursive(child);
  }
}

/// Finds the node tagged with the given preprocessing `id` (spec §4.N: "find the tree node
/// with matching id, guaranteed to be a reference node").
pub fn find_node_by_id_mut(node: &mut TreeNode, id: usize) -> Option<&mut TreeNode> {
  if node.node_attrs.other.get("id").and_then(serde_json::Value::as_u64) == Some(id as u64) {
    return Some(node);
  }
  for child in &mut node.children {
    if let Some(found) = find_node_by_id_mut(child, id) {
      return Some(found);
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::to_nuc_seq;
  use crate::tree::tree_node::{BranchAttrs, BranchAttrsMutations, NodeAttrs};
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;

  fn leaf(name: &str, mutations: Vec<&str>) -> TreeNode {
    TreeNode {
      name: name.to_owned(),
      node_attrs: NodeAttrs::default(),
      branch_attrs: BranchAttrs {
        mutations: BranchAttrsMutations {
          nuc: mutations.into_iter().map(str::to_owned).collect(),
        },
      },
      children: Vec::new(),
    }
  }

  #[test]
  fn accumulates_mutations_from_root_through_children() {
    let ref_seq = to_nuc_seq("ACGT").unwrap();

    let mut tree = AuspiceTree {
      meta: serde_json::json!({}),
      tree: TreeNode {
        name: "root".to_owned(),
        node_attrs: NodeAttrs::default(),
        branch_attrs: BranchAttrs {
          mutations: BranchAttrsMutations { nuc: vec!["A1T".to_owned()] },
        },
        children: vec![leaf("child", vec!["G3C"])],
      },
      other: IndexMap::new(),
    };

    let nodes = preprocess_tree(&mut tree, &ref_seq).unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].id, 0);
    assert_eq!(nodes[0].substitutions.get(&0), Some(&Nuc::T));
    assert_eq!(nodes[1].id, 1);
    // child inherits the root's mutation and adds its own.
    assert_eq!(nodes[1].substitutions.get(&0), Some(&Nuc::T));
    assert_eq!(nodes[1].substitutions.get(&2), Some(&Nuc::C));
  }

  #[test]
  fn reversion_removes_the_position_from_the_carried_map() {
    let ref_seq = to_nuc_seq("ACGT").unwrap();

    let mut tree = AuspiceTree {
      meta: serde_json::json!({}),
      tree: TreeNode {
        name: "root".to_owned(),
        node_attrs: NodeAttrs::default(),
        branch_attrs: BranchAttrs {
          mutations: BranchAttrsMutations { nuc: vec!["A1T".to_owned()] },
        },
        children: vec![leaf("child", vec!["T1A"])], // query_nuc A == ref[0] -> reversion
      },
      other: IndexMap::new(),
    };

    let nodes = preprocess_tree(&mut tree, &ref_seq).unwrap();
    assert_eq!(nodes[0].substitutions.get(&0), Some(&Nuc::T));
    assert!(nodes[1].substitutions.get(&0).is_none());
  }

  #[test]
  fn assigns_preorder_ids_and_postprocess_strips_them() {
    let ref_seq = to_nuc_seq("ACGT").unwrap();
    let mut tree = AuspiceTree {
      meta: serde_json::json!({}),
      tree: TreeNode {
        name: "root".to_owned(),
        node_attrs: NodeAttrs::default(),
        branch_attrs: BranchAttrs::default(),
        children: vec![leaf("a", vec![]), leaf("b", vec![])],
      },
      other: IndexMap::new(),
    };

    preprocess_tree(&mut tree, &ref_seq).unwrap();
    assert!(tree.tree.node_attrs.other.contains_key("id"));
    assert_eq!(
      tree.tree.children[0].node_attrs.other.get("id").and_then(serde_json::Value::as_u64),
      Some(1)
    );

    postprocess_tree(&mut tree);
    assert!(!tree.tree.node_attrs.other.contains_key("id"));
    assert!(!tree.tree.children[0].node_attrs.other.contains_key("id"));
  }
}
