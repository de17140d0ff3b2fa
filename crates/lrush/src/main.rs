//! lrush - interactive shell for an LRU cache

mod handler;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use lrucache::LruCache;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::handler::CommandHandler;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of items); prompted for when omitted
    #[arg(short, long, allow_hyphen_values = true)]
    capacity: Option<String>,

    /// Only print command replies, no prompts or cache listings
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with replies
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let raw = match args.capacity {
        Some(raw) => raw,
        None => shell::read_line(&mut input, &mut out, Some("Enter LRU Cache max capacity: "))?
            .context("no capacity given")?,
    };
    let capacity = parse_capacity(&raw)?;

    let cache = LruCache::new(capacity)?;
    info!(capacity, "cache created");

    let mut handler = CommandHandler::new(cache);
    shell::run(&mut handler, &mut input, &mut out, args.quiet).context("shell I/O failed")
}

/// Parse a capacity as a signed integer; sign checks belong to the cache
fn parse_capacity(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .with_context(|| format!("capacity must be an integer, got {:?}", raw))
}
