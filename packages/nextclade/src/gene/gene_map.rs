use crate::gene::gene::Gene;
use indexmap::IndexMap;

/// Gene name → [`Gene`]. Backed by an [`IndexMap`] so iteration order matches insertion order
/// (the order genes appeared in the gene map file), even though spec semantics don't require it.
#[derive(Clone, Debug, Default)]
pub struct GeneMap {
  genes: IndexMap<String, Gene>,
}

impl GeneMap {
  pub fn new() -> Self {
    Self { genes: IndexMap::new() }
  }

  pub fn insert(&mut self, gene: Gene) {
    self.genes.insert(gene.name.clone(), gene);
  }

  pub fn get(&self, name: &str) -> Option<&Gene> {
    self.genes.get(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Gene> {
    self.genes.values()
  }

  pub fn len(&self) -> usize {
    self.genes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.genes.is_empty()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.genes.keys().map(String::as_str)
  }
}

impl FromIterator<Gene> for GeneMap {
  fn from_iter<T: IntoIterator<Item = Gene>>(iter: T) -> Self {
    let mut map = Self::new();
    for gene in iter {
      map.insert(gene);
    }
    map
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gene::gene::GeneStrand;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  fn looks_up_by_name() {
    let gene = Gene::new("ORF1", 0, 9, GeneStrand::Forward, 100).unwrap();
    let mut map = GeneMap::new();
    map.insert(gene.clone());
    assert_eq!(map.get("ORF1"), Some(&gene));
    assert_eq!(map.get("ORF2"), None);
  }
}
