pub mod qc_config;
pub mod qc_status;
pub mod rule_frame_shifts;
pub mod rule_missing_data;
pub mod rule_mixed_sites;
pub mod rule_private_mutations;
pub mod rule_snp_clusters;
pub mod rule_stop_codons;
pub mod run_qc;
