use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// One-time process setup, invoked from every binary's `#[ctor]` hook before `main()` runs
/// (spec §B): installs the `color-eyre` panic/error report hook so uncaught errors get the
/// same formatting everywhere, regardless of which binary raised them.
pub fn global_init() {
  color_eyre::install().expect("Failed to install the color-eyre panic/error hook");
}

/// Configures the `env_logger` global logger (spec §B). Unlike plain `env_logger::init()`,
/// respects `RUST_LOG` when set, but falls back to `default_level` rather than `Error` so a
/// bare invocation still prints the usual `info`/`warn` lines.
pub fn setup_logger(default_level: LevelFilter) {
  let mut builder = Builder::new();

  builder
    .filter_level(default_level)
    .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
    .parse_env("RUST_LOG");

  if builder.try_init().is_err() {
    // A logger is already installed (e.g. when running multiple binaries in one test process).
    log::debug!("Logger is already initialized");
  }
}
