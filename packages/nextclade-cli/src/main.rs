mod cli;

use crate::cli::nextclade_cli::nextclade_parse_cli_args;
use crate::cli::nextclade_loop::nextclade_run_cli;
use ctor::ctor;
use eyre::Report;
use log::LevelFilter;
use nextclade::utils::global_init::{global_init, setup_logger};

#[ctor]
fn init() {
  global_init();
}

fn main() -> Result<(), Report> {
  let args = nextclade_parse_cli_args()?;
  setup_logger(LevelFilter::Warn);
  nextclade_run_cli(args)
}
