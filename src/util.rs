// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Process-level helpers: tracing subscriber setup and man page rendering
// role: utilities/helpers
// inputs: CLI verbosity flags; RUST_LOG; clap CommandFactory
// outputs: Installed global subscriber (stderr); man page text
// side_effects: init_logging installs the global tracing subscriber once
// invariants:
// - RUST_LOG, when set and valid, overrides the verbosity flags
// - Logs go to stderr; stdout stays reserved for command output
// errors: render_man_page surfaces IO errors from clap_mangen
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use clap::CommandFactory;
use tracing_subscriber::{fmt, EnvFilter};

pub fn default_filter(verbose: u8, quiet: bool) -> &'static str {
  if quiet {
    return "warn";
  }

  match verbose {
    0 => "info",
    1 => "debug",
    _ => "trace",
  }
}

/// Install the global `tracing` subscriber. Safe to call more than once.
pub fn init_logging(verbose: u8, quiet: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
