pub mod count_gaps;
pub mod extract_gene;
pub mod frame_shift_detector;
pub mod gene_translation;
pub mod translate;
