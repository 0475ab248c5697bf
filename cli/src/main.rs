
mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{allocate, intersect, matrix};
use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber; `RUST_LOG` overrides the level chosen by `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Commands::Intersect(args) => intersect::run(&cli, args),
        Commands::Matrix(args) => matrix::run(&cli, args),
        Commands::Allocate(args) => allocate::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
