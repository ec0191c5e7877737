use crate::alphabet::nuc::Nuc;
use crate::tree::tree_preprocess::PreprocessedNode;
use std::collections::BTreeMap;

/// Computes the distance between a reference node and a query (spec §4.K):
///
/// ```text
/// shared       = positions present in both maps with the same letter
/// shared_sites = positions present in both maps with a different letter
/// undetermined = node positions not sequenced in the query
/// d = |node.substitutions| + |query.substitutions| − 2·shared − shared_sites − undetermined
/// ```
fn distance(node: &PreprocessedNode, query_substitutions: &BTreeMap<usize, Nuc>, is_sequenced: &impl Fn(usize) -> bool) -> i64 {
  let mut shared = 0i64;
  let mut shared_sites = 0i64;
  let mut undetermined = 0i64;

  for (&pos, &node_nuc) in &node.substitutions {
    match query_substitutions.get(&pos) {
      Some(&query_nuc) if query_nuc == node_nuc => shared += 1,
      Some(_) => shared_sites += 1,
      None if !is_sequenced(pos) => undetermined += 1,
      None => {}
    }
  }

  node.substitutions.len() as i64 + query_substitutions.len() as i64 - 2 * shared - shared_sites - undetermined
}

/// Finds the id of the reference node nearest to the query (spec §4.K). Ties are broken by the
/// smallest pre-order id. Panics if `nodes` is empty — preprocessing always yields at least the
/// root.
pub fn find_nearest_node(
  nodes: &[PreprocessedNode],
  query_substitutions: &BTreeMap<usize, Nuc>,
  is_sequenced: impl Fn(usize) -> bool,
) -> usize {
  let mut best_id = nodes[0].id;
  let mut best_distance = distance(&nodes[0], query_substitutions, &is_sequenced);

  for node in &nodes[1..] {
    let d = distance(node, query_substitutions, &is_sequenced);
    if d < best_distance || (d == best_distance && node.id < best_id) {
      best_distance = d;
      best_id = node.id;
    }
  }

  best_id
}

#[cfg(test)]
mod tests {
  use super::*;
  use maplit::btreemap;
  use pretty_assertions::assert_eq;

  fn node(id: usize, substitutions: BTreeMap<usize, Nuc>) -> PreprocessedNode {
    PreprocessedNode {
      id,
      mutations: substitutions.clone(),
      substitutions,
    }
  }

  #[test]
  fn picks_the_node_sharing_the_most_substitutions() {
    let nodes = vec![
      node(0, btreemap! {10 => Nuc::T}),
      node(1, btreemap! {10 => Nuc::T, 20 => Nuc::C}),
    ];
    let query = btreemap! {10 => Nuc::T, 20 => Nuc::C};

    assert_eq!(find_nearest_node(&nodes, &query, |_| true), 1);
  }

  #[test]
  fn breaks_ties_by_smallest_id() {
    let nodes = vec![node(0, btreemap! {10 => Nuc::T}), node(1, btreemap! {10 => Nuc::T})];
    let query = btreemap! {10 => Nuc::T};

    assert_eq!(find_nearest_node(&nodes, &query, |_| true), 0);
  }

  #[test]
  fn undetermined_positions_reduce_distance_to_an_unsequenced_node() {
    let nodes = vec![node(0, btreemap! {10 => Nuc::T, 30 => Nuc::C})];
    let query = BTreeMap::new();

    // Without accounting for "undetermined", distance would be 2; with position 30 unsequenced
    // it drops by one.
    let is_sequenced = |pos: usize| pos != 30;
    let d = distance(&nodes[0], &query, &is_sequenced);
    assert_eq!(d, 1);
  }
}
