pub mod aa_changes;
pub mod find_nuc_changes;
pub mod find_nucleotide_ranges;
pub mod link_changes;
pub mod nuc_composition;
pub mod pcr_primer_changes;
