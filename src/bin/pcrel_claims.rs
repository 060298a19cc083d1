//! Standalone entry point for the claim injector.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcrel_claims::cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    run(&cli)?;
    Ok(())
}
