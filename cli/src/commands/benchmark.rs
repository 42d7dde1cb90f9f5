//! Benchmark command implementation.

use super::ModelArgs;
use anyhow::Result as AnyhowResult;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Benchmark command arguments.
#[derive(Parser)]
pub struct BenchmarkCommand {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Path to input text file, split into words on whitespace
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of iterations to run
    #[arg(short = 'n', long, default_value_t = 10)]
    pub iterations: usize,
}

pub fn run(cmd: BenchmarkCommand) -> AnyhowResult<()> {
    let tokenizer = cmd.model.load()?;

    let text = fs::read_to_string(&cmd.input)?;
    let words: Vec<&str> = text.split_whitespace().collect();
    let iterations = cmd.iterations.max(1);

    println!("Benchmarking tokenization...");
    println!("  Words: {}", words.len());
    println!("  Iterations: {}", iterations);
    println!();

    // Warmup, which also fills the cache
    let mut token_count = 0;
    for word in &words {
        token_count += tokenizer.tokenize(word)?.len();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        for word in &words {
            tokenizer.tokenize(word)?;
        }
    }
    let elapsed = start.elapsed();

    let avg_time_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    let tokens_per_sec = token_count as f64 * iterations as f64 / elapsed.as_secs_f64().max(1e-9);

    println!("Results:");
    println!("  Total time: {:.2}s", elapsed.as_secs_f64());
    println!("  Average time: {:.3}ms", avg_time_ms);
    println!("  Throughput: {:.0} tokens/s", tokens_per_sec);

    tokenizer.clear_cache();
    let start = Instant::now();
    let batch = tokenizer.tokenize_batch(&words)?;
    println!(
        "  Parallel cold pass: {} tokens in {:.3}ms",
        batch.iter().map(Vec::len).sum::<usize>(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
