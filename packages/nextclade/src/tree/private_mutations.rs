use crate::alphabet::nuc::Nuc;
use crate::analyze::find_nuc_changes::{NucleotideDeletion, NucleotideSubstitution};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mutation private to the query relative to its nearest reference node (spec §4.L).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMutation {
  pub ref_nuc: Nuc,
  pub pos: usize,
  pub query_nuc: Nuc,
}

/// Finds mutations private to the query, relative to the nearest node `node_substitutions`
/// (spec §4.L):
///
/// - every query substitution not present at the same position/letter in the node is emitted
///   (either because the node has no mutation there, or because it has a different one);
/// - every query deletion is expanded position-by-position and treated the same way, with
///   `GAP` as the query letter;
/// - every node substitution at a position that is sequenced in the query but has neither a
///   query substitution nor a query deletion there is a reversion back to the reference letter.
///
/// Duplicate positions (introduced when overlapping deletion ranges touch the same site twice)
/// are eliminated; the last write for a given position wins, matching the fact that they all
/// agree on `(ref_nuc, pos, query_nuc)` once deduplicated.
pub fn find_private_mutations(
  node_substitutions: &BTreeMap<usize, Nuc>,
  ref_seq: &[Nuc],
  query_substitutions: &[NucleotideSubstitution],
  query_deletions: &[NucleotideDeletion],
  is_sequenced: impl Fn(usize) -> bool,
) -> Vec<PrivateMutation> {
  let mut private: BTreeMap<usize, PrivateMutation> = BTreeMap::new();
  let mut touched_by_query: std::collections::BTreeSet<usize> = std::collections::BTreeSet::new();

  for sub in query_substitutions {
    touched_by_query.insert(sub.pos);
    let differs = match node_substitutions.get(&sub.pos) {
      None => true,
      Some(&node_nuc) => node_nuc != sub.query_nuc,
    };
    if differs {
      let ref_nuc = node_substitutions.get(&sub.pos).copied().unwrap_or(sub.ref_nuc);
      private.insert(sub.pos, PrivateMutation {
        ref_nuc,
        pos: sub.pos,
        query_nuc: sub.query_nuc,
      });
    }
  }

  for del in query_deletions {
    for pos in del.start..del.start + del.length {
      touched_by_query.insert(pos);
      let differs = match node_substitutions.get(&pos) {
        None => true,
        Some(&node_nuc) => node_nuc != Nuc::Gap,
      };
      if differs {
        let ref_nuc = node_substitutions.get(&pos).copied().unwrap_or_else(|| ref_seq.get(pos).copied().unwrap_or(Nuc::N));
        private.insert(pos, PrivateMutation {
          ref_nuc,
          pos,
          query_nuc: Nuc::Gap,
        });
      }
    }
  }

  for (&pos, &node_nuc) in node_substitutions {
    if touched_by_query.contains(&pos) || !is_sequenced(pos) {
      continue;
    }
    // The node carries a mutation the query doesn't: a reversion back to the reference letter.
    let ref_nuc_here = ref_seq.get(pos).copied().unwrap_or(Nuc::N);
    private.insert(pos, PrivateMutation {
      ref_nuc: node_nuc,
      pos,
      query_nuc: ref_nuc_here,
    });
  }

  private.into_values().collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::to_nuc_seq;
  use maplit::btreemap;
  use pretty_assertions::assert_eq;

  fn sub(pos: usize, ref_nuc: Nuc, query_nuc: Nuc) -> NucleotideSubstitution {
    NucleotideSubstitution {
      ref_nuc,
      pos,
      query_nuc,
      pcr_primers_changed: Vec::new(),
      aa_substitutions: Vec::new(),
      aa_deletions: Vec::new(),
    }
  }

  #[test]
  fn emits_a_substitution_absent_from_the_node() {
    let ref_seq = to_nuc_seq("ACGT").unwrap();
    let node_substitutions = BTreeMap::new();
    let query_substitutions = vec![sub(0, Nuc::A, Nuc::T)];

    let private = find_private_mutations(&node_substitutions, &ref_seq, &query_substitutions, &[], |_| true);

    assert_eq!(private, vec![PrivateMutation { ref_nuc: Nuc::A, pos: 0, query_nuc: Nuc::T }]);
  }

  #[test]
  fn does_not_emit_a_substitution_shared_with_the_node() {
    let ref_seq = to_nuc_seq("ACGT").unwrap();
    let node_substitutions = btreemap! {0 => Nuc::T};
    let query_substitutions = vec![sub(0, Nuc::A, Nuc::T)];

    let private = find_private_mutations(&node_substitutions, &ref_seq, &query_substitutions, &[], |_| true);

    assert!(private.is_empty());
  }

  #[test]
  fn emits_a_reversion_when_query_lacks_the_nodes_mutation() {
    let ref_seq = to_nuc_seq("ACGT").unwrap();
    let node_substitutions = btreemap! {0 => Nuc::T};

    let private = find_private_mutations(&node_substitutions, &ref_seq, &[], &[], |_| true);

    assert_eq!(private, vec![PrivateMutation { ref_nuc: Nuc::T, pos: 0, query_nuc: Nuc::A }]);
  }

  #[test]
  fn does_not_emit_a_reversion_for_an_unsequenced_position() {
    let ref_seq = to_nuc_seq("ACGT").unwrap();
    let node_substitutions = btreemap! {0 => Nuc::T};

    let private = find_private_mutations(&node_substitutions, &ref_seq, &[], &[], |_| false);

    assert!(private.is_empty());
  }

  #[test]
  fn expands_a_deletion_range_position_by_position() {
    let ref_seq = to_nuc_seq("ACGT").unwrap();
    let node_substitutions = BTreeMap::new();
    let del = NucleotideDeletion {
      start: 1,
      length: 2,
      aa_substitutions: Vec::new(),
      aa_deletions: Vec::new(),
    };

    let private = find_private_mutations(&node_substitutions, &ref_seq, &[], &[del], |_| true);

    assert_eq!(private.len(), 2);
    assert!(private.iter().all(|m| m.query_nuc == Nuc::Gap));
  }
}
