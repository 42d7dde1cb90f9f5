//! Save command implementation.

use super::ModelArgs;
use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Save command arguments.
#[derive(Parser)]
pub struct SaveCommand {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Output directory (created if missing)
    #[arg(short, long)]
    pub out: PathBuf,

    /// File name prefix, e.g. "model" gives model-vocab.json
    #[arg(long)]
    pub name: Option<String>,
}

pub fn run(cmd: SaveCommand) -> AnyhowResult<()> {
    let tokenizer = cmd.model.load()?;

    std::fs::create_dir_all(&cmd.out)
        .with_context(|| format!("Failed to create {}", cmd.out.display()))?;
    let (vocab, merges) = tokenizer.save(&cmd.out, cmd.name.as_deref())?;
    info!(
        tokens = tokenizer.vocab_size(),
        merges = tokenizer.merges().len(),
        "model saved"
    );

    println!("{}", vocab.display());
    println!("{}", merges.display());

    Ok(())
}
