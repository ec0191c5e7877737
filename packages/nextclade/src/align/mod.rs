pub mod align;
pub mod backtrace;
pub mod band_2d;
pub mod gap_open_close;
pub mod params;
pub mod score_matrix;
pub mod seed_alignment;
