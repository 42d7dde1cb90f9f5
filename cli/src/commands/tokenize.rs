//! Tokenize command implementation.

use super::ModelArgs;
use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use serde::Serialize;
use subword_tokenizer::Token;

/// Tokenize command arguments.
#[derive(Parser)]
pub struct TokenizeCommand {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Merge dropout probability in [0, 1]
    #[arg(long)]
    pub dropout: Option<f32>,

    /// Seed for dropout sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print JSON instead of tab-separated lines
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Words to tokenize ("-" reads whitespace-separated words from stdin)
    #[arg(required = true)]
    pub words: Vec<String>,
}

#[derive(Serialize)]
struct WordOutput<'a> {
    word: &'a str,
    tokens: &'a [Token],
}

pub fn run(cmd: TokenizeCommand) -> AnyhowResult<()> {
    let mut builder = cmd.model.builder();
    if let Some(dropout) = cmd.dropout {
        builder = builder.dropout(dropout);
    }
    if let Some(seed) = cmd.seed {
        builder = builder.seed(seed);
    }
    let tokenizer = builder.build().context("Failed to load tokenizer")?;

    let words = if cmd.words.len() == 1 && cmd.words[0] == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer.split_whitespace().map(str::to_owned).collect()
    } else {
        cmd.words
    };

    for word in &words {
        let tokens = tokenizer
            .tokenize(word)
            .with_context(|| format!("Failed to tokenize {:?}", word))?;

        if cmd.json {
            let output = WordOutput {
                word,
                tokens: &tokens,
            };
            println!("{}", serde_json::to_string(&output)?);
        } else {
            for token in &tokens {
                println!(
                    "{}\t{}\t{}..{}",
                    token.id, token.value, token.offsets.0, token.offsets.1
                );
            }
        }
    }

    Ok(())
}
