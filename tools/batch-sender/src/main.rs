//! Streams seeded price batches to a running stats service and reports the resulting
//! statistics.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use stats_fixtures::{chunk_values, generate_values, SymbolGenerator};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "batch-sender", version, about = "Send generated price batches to the stats service")]
struct Args {
    /// Base URL of the stats service
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    url: String,

    /// Target symbol; a random 4-character symbol is generated when omitted
    #[arg(long)]
    symbol: Option<String>,

    /// Number of values to send
    #[arg(long, conflicts_with = "k")]
    count: Option<usize>,

    /// Send 10^k values
    #[arg(short, long)]
    k: Option<u32>,

    /// Seed for symbol and value generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Values per request
    #[arg(long, default_value_t = 10_000)]
    chunk_size: usize,

    /// Clear the store before sending
    #[arg(long)]
    clear: bool,
}

#[derive(Serialize)]
struct AddBatchBody<'a> {
    symbol: &'a str,
    values: &'a [f64],
}

const DEFAULT_COUNT: usize = 1_000;

fn value_count(count: Option<usize>, k: Option<u32>) -> Result<usize> {
    match (count, k) {
        (Some(n), _) => Ok(n),
        (None, Some(k)) => match 10usize.checked_pow(k) {
            Some(n) => Ok(n),
            None => bail!("10^{} values does not fit in memory", k),
        },
        (None, None) => Ok(DEFAULT_COUNT),
    }
}

async fn check(response: reqwest::Response, action: &str) -> Result<serde_json::Value> {
    let status = response.status();
    let body: serde_json::Value =
        response.json().await.with_context(|| format!("{}: unreadable response", action))?;
    if !status.is_success() {
        bail!("{} failed with {}: {}", action, status, body);
    }
    Ok(body)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.chunk_size == 0 {
        bail!("--chunk-size must be > 0");
    }
    let count = value_count(args.count, args.k)?;
    let symbol = match args.symbol {
        Some(symbol) => symbol,
        None => SymbolGenerator::new(4, args.seed).next().context("no symbol generated")?,
    };
    let base = args.url.trim_end_matches('/').to_string();
    let client = reqwest::Client::new();

    if args.clear {
        let started = Instant::now();
        let resp = client.delete(format!("{}/clear_db", base)).send().await?;
        check(resp, "clear_db").await?;
        info!("Cleared store in {:.3} ms", started.elapsed().as_secs_f64() * 1000.0);
    }

    info!("Sending {} values for symbol {} in chunks of {}", count, symbol, args.chunk_size);
    let started = Instant::now();
    let mut requests = 0usize;
    for chunk in chunk_values(generate_values(args.seed, count), args.chunk_size) {
        let resp = client
            .post(format!("{}/add_batch", base))
            .json(&AddBatchBody { symbol: &symbol, values: &chunk })
            .send()
            .await
            .context("add_batch request failed")?;
        check(resp, "add_batch").await?;
        requests += 1;
    }
    info!(
        "Sent {} values in {} requests, {:.3} ms",
        count,
        requests,
        started.elapsed().as_secs_f64() * 1000.0
    );

    let started = Instant::now();
    let resp = client.get(format!("{}/stats", base)).query(&[("symbol", symbol.as_str())]).send().await?;
    let stats = check(resp, "stats").await?;
    info!("Fetched stats in {:.3} ms", started.elapsed().as_secs_f64() * 1000.0);

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
