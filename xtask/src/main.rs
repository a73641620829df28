use anyhow::Result;
use clap::Parser;

mod app;
mod cli;
mod tasks;
mod util;

fn main() -> Result<()> {
    env_logger::try_init()?;
    let cli = crate::cli::Cli::parse();
    crate::app::run(cli)
}
