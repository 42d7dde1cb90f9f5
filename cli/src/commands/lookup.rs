//! Lookup command implementation.

use super::ModelArgs;
use anyhow::{bail, Result as AnyhowResult};
use clap::Parser;

/// Lookup command arguments.
#[derive(Parser)]
pub struct LookupCommand {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Token string to look up
    #[arg(short, long, conflicts_with = "id", required_unless_present = "id")]
    pub token: Option<String>,

    /// Token ID to look up
    #[arg(short, long)]
    pub id: Option<u32>,
}

pub fn run(cmd: LookupCommand) -> AnyhowResult<()> {
    let tokenizer = cmd.model.load()?;

    match (&cmd.token, cmd.id) {
        (Some(token), _) => match tokenizer.token_to_id(token) {
            Some(id) => println!("{}", id),
            None => bail!("Token {:?} is not in the vocabulary", token),
        },
        (None, Some(id)) => match tokenizer.id_to_token(id) {
            Some(token) => println!("{}", token),
            None => bail!("ID {} is not in the vocabulary", id),
        },
        (None, None) => bail!("Either --token or --id is required"),
    }

    Ok(())
}
