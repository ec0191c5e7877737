pub mod nextclade_run;
pub mod nextclade_run_one;

pub use nextclade_run::*;
pub use nextclade_run_one::*;
