use crate::alphabet::nuc::Nuc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A contiguous region, in alignment coordinates, where the query is out of frame relative to
/// a gene (spec §3 `FrameShiftRange`). Half-open `[begin, end)`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameShiftRange {
  pub begin: usize,
  pub end: usize,
}

const POSITION_INVALID: isize = -1;

/// Scans an aligned reference/query pair for positions where the net number of insertions and
/// deletions isn't a multiple of 3, i.e. the reading frame has shifted (spec §4.E). A reference
/// gap is an insertion in the query; a query gap is a deletion from the query.
struct FrameShiftDetector {
  frame_shifts: Vec<FrameShiftRange>,
  old_frame: i32,
  frame: i32,
  begin: isize,
  end: isize,
  dirty: bool,
}

impl FrameShiftDetector {
  fn new() -> Self {
    Self {
      frame_shifts: Vec::new(),
      old_frame: 0,
      frame: 0,
      begin: POSITION_INVALID,
      end: POSITION_INVALID,
      dirty: false,
    }
  }

  fn reset(&mut self) {
    self.begin = POSITION_INVALID;
    self.end = POSITION_INVALID;
  }

  fn update_frame(&mut self, new_frame: i32, pos: usize) {
    self.old_frame = self.frame;
    self.frame = new_frame.rem_euclid(3);

    let to_shift = self.old_frame == 0 && self.frame != 0;
    let to_no_shift = self.old_frame != 0 && self.frame == 0;

    if to_no_shift {
      self.end = pos as isize;
    }
    if to_shift || to_no_shift {
      self.dirty = true;
    }
  }

  fn add_insertion(&mut self, pos: usize) {
    self.update_frame(self.frame - 1, pos);
  }

  fn add_deletion(&mut self, pos: usize) {
    self.update_frame(self.frame + 1, pos);
  }

  fn advance(&mut self, pos: usize) {
    if !self.dirty {
      return;
    }

    if self.frame == 0 && self.begin != POSITION_INVALID {
      self.frame_shifts.push(FrameShiftRange {
        begin: self.begin as usize,
        end: self.end as usize,
      });
      self.reset();
    }

    if self.frame != 0 {
      self.begin = pos as isize;
    }

    self.dirty = false;
  }

  fn done(&mut self, length: usize) {
    if self.begin != POSITION_INVALID {
      self.frame_shifts.push(FrameShiftRange {
        begin: self.begin as usize,
        end: length,
      });
      self.reset();
    }
  }
}

/// Detects frame-shifted ranges between an aligned reference and an aligned query of equal
/// length (spec §4.E).
pub fn detect_frame_shifts(aligned_ref: &[Nuc], aligned_query: &[Nuc]) -> Vec<FrameShiftRange> {
  assert_eq!(aligned_ref.len(), aligned_query.len());

  let mut detector = FrameShiftDetector::new();
  for pos in 0..aligned_ref.len() {
    if aligned_ref[pos].is_gap() {
      detector.add_insertion(pos);
    } else if aligned_query[pos].is_gap() {
      detector.add_deletion(pos);
    } else {
      detector.advance(pos);
    }
  }
  detector.done(aligned_ref.len());

  detector.frame_shifts
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alphabet::nuc::to_nuc_seq;
  use pretty_assertions::assert_eq;

  #[test]
  fn detects_no_shift_for_identical_sequences() {
    let seq = to_nuc_seq("ACGTACGTACGT").unwrap();
    assert_eq!(detect_frame_shifts(&seq, &seq), vec![]);
  }

  #[test]
  fn detects_a_single_nucleotide_deletion_shift() {
    // Matches the literal spec scenario: single-nucleotide deletion at position 18 shifts the
    // frame until the end of the sequence (no re-balancing event occurs).
    let aligned_ref = to_nuc_seq("CTTGGAGGTTCCGTGGCTATAGATAACAGAACATTCTTGGAATGCTGATC").unwrap();
    let aligned_query = to_nuc_seq("CTTGGAGGTTCCGTGGCT-TAGATAACAGAACATTCTTGGAATGCTGATC").unwrap();

    let shifts = detect_frame_shifts(&aligned_ref, &aligned_query);
    assert_eq!(shifts, vec![FrameShiftRange { begin: 19, end: 50 }]);
  }

  #[test]
  fn a_balanced_codon_sized_deletion_causes_no_shift() {
    let aligned_ref = to_nuc_seq("ACGTACGATCGATGACTN").unwrap();
    let aligned_query = to_nuc_seq("ACG---GATCGATGACTN").unwrap();
    assert_eq!(detect_frame_shifts(&aligned_ref, &aligned_query), vec![]);
  }
}
