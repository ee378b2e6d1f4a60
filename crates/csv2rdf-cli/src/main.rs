//! csv2rdf CLI main entry point

use anyhow::Result;
use clap::Parser;
use csv2rdf_cli::commands::{Cli, CommandExecutor};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize tracing, defaulting to info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();

    let cli = Cli::parse();

    let mut executor = CommandExecutor::new();
    let result = executor.execute(cli.command)?;

    if result.success {
        std::process::exit(0);
    } else {
        eprintln!("{}", result.message);
        std::process::exit(1);
    }
}
