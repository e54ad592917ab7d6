use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{DocumentArgs, RunArgs};

/// Attach dynamic formset behaviour to a document and drive it from the command line.
#[derive(Parser, Debug)]
#[command(name = "formset", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Perform add/remove clicks and print the resulting document
    Run(RunArgs),
    /// Print counters, affordance decisions and row field identifiers as JSON
    Inspect(DocumentArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let output = match Cli::parse().command {
        Command::Run(args) => commands::run(&args)?,
        Command::Inspect(args) => commands::inspect(&args)?,
    };
    println!("{output}");
    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
