//! subword CLI - Command-line interface for the BPE word tokenizer.
//!
//! This is the main entry point for the `subword` command-line tool.

mod commands;

use clap::{Parser, Subcommand};
use commands::{BenchmarkCommand, LookupCommand, SaveCommand, TokenizeCommand};

#[derive(Parser)]
#[command(name = "subword")]
#[command(about = "Tokenize words with a BPE vocabulary and merge table", long_about = None)]
#[command(version)]
struct Cli {
    /// Suppress all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize one or more words
    Tokenize(TokenizeCommand),
    /// Look up a token by string or by ID
    Lookup(LookupCommand),
    /// Write the vocabulary and merges back out in canonical form
    Save(SaveCommand),
    /// Benchmark tokenization throughput
    Benchmark(BenchmarkCommand),
}

/// Initialize tracing to stderr, respecting `RUST_LOG` and defaulting to WARN.
fn init_logging(quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match cli.command {
        Commands::Tokenize(cmd) => commands::tokenize::run(cmd)?,
        Commands::Lookup(cmd) => commands::lookup::run(cmd)?,
        Commands::Save(cmd) => commands::save::run(cmd)?,
        Commands::Benchmark(cmd) => commands::benchmark::run(cmd)?,
    }

    Ok(())
}
