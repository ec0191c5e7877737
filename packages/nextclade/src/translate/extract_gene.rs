use crate::alphabet::letter::Letter;
use crate::alphabet::nuc::Nuc;
use crate::coord::coord_map::CoordMap;
use crate::error::NextalignError;
use crate::gene::gene::Gene;

/// Replaces leading alignment gaps within the first codon slot with `N`, so that later gap
/// stripping (spec §4.H) can never shift which nucleotides land in which codon (spec §4.F).
pub fn protect_first_codon(seq: &mut [Nuc]) {
  for nuc in seq.iter_mut().take(3) {
    if nuc.is_gap() {
      *nuc = Nuc::N;
    } else {
      break;
    }
  }
}

/// Extracts the aligned nucleotide sequence of `gene` out of the aligned query, using
/// `coord_map` to project the gene's reference-coordinate range into alignment coordinates
/// (spec §4.F). Strips alignment gaps; if the number of stripped gaps isn't a multiple of 3 the
/// gene couldn't be extracted cleanly and the caller should turn this into a per-gene warning
/// rather than aborting the whole sequence.
pub fn extract_gene_query(aligned_query: &[Nuc], gene: &Gene, coord_map: &CoordMap) -> Result<Vec<Nuc>, NextalignError> {
  let mut slice = coord_map.extract_gene(aligned_query, gene);
  protect_first_codon(&mut slice);

  let gaps_stripped = slice.iter().filter(|n| n.is_gap()).count();
  let stripped: Vec<Nuc> = slice.iter().copied().filter(|n| !n.is_gap()).collect();

  if gaps_stripped % 3 != 0 {
    return Err(NextalignError::GeneExtractionFailed {
      gene_name: gene.name.clone(),
      reason: format!("length {} is not divisible by 3 after stripping {gaps_stripped} gap(s)", stripped.len()),
    });
  }

  Ok(stripped)
}
