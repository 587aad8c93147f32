use anyhow::Result;
use clap::Parser;

mod classify;
mod cli;
mod csv_report;
mod error;
mod gitlab;
mod model;
mod render;
mod report_processor;
mod util;
mod window;

use crate::cli::{normalize, Cli};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  util::init_logging(cli.verbose, cli.quiet);

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: list, classify, write
  let (path, _summary) = report_processor::process_run(&cfg)?;

  println!("{}", path.display());
  Ok(())
}
