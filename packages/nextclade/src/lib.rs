#[macro_use]
pub mod error;

pub mod alphabet;
pub mod coord;

pub mod align;
pub mod analyze;
pub mod gene;
pub mod io;
pub mod qc;
pub mod run;
pub mod strip;
pub mod translate;
pub mod tree;
pub mod utils;

pub use error::{NextalignError, PeptideWarning};
