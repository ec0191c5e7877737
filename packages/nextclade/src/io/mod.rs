pub mod errors_csv;
pub mod fasta;
pub mod fs;
pub mod gff3;
pub mod insertions_csv;
pub mod json;
pub mod nuc_pcr_primers;
pub mod qc_config;
pub mod results_csv;
pub mod results_json;
pub mod tree_json;
