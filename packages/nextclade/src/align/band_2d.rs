/// A dense row-major matrix backing the alignment `scores`/`paths` tables (spec §3
/// `ScoreMatrices`). Both matrices always share the same shape
/// `(2*bandWidth+1) rows x (refLength+1) cols`.
#[derive(Clone, Debug)]
pub struct Band2d<T> {
  data: Vec<T>,
  num_rows: usize,
  num_cols: usize,
}

impl<T: Copy + Default> Band2d<T> {
  pub fn new(num_rows: usize, num_cols: usize) -> Self {
    Self {
      data: vec![T::default(); num_rows * num_cols],
      num_rows,
      num_cols,
    }
  }
}

impl<T> Band2d<T> {
  #[inline]
  pub fn num_rows(&self) -> usize {
    self.num_rows
  }

  #[inline]
  pub fn num_cols(&self) -> usize {
    self.num_cols
  }

  #[inline]
  fn index(&self, row: usize, col: usize) -> usize {
    debug_assert!(row < self.num_rows, "row {row} out of bounds ({})", self.num_rows);
    debug_assert!(col < self.num_cols, "col {col} out of bounds ({})", self.num_cols);
    row * self.num_cols + col
  }

  #[inline]
  pub fn get(&self, row: usize, col: usize) -> &T {
    &self.data[self.index(row, col)]
  }

  #[inline]
  pub fn set(&mut self, row: usize, col: usize, value: T) {
    let idx = self.index(row, col);
    self.data[idx] = value;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn stores_and_retrieves_values() {
    let mut matrix: Band2d<i32> = Band2d::new(3, 4);
    matrix.set(1, 2, 42);
    assert_eq!(*matrix.get(1, 2), 42);
    assert_eq!(*matrix.get(0, 0), 0);
  }
}
