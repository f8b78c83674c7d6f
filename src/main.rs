use std::path::PathBuf;

use anyhow::{Context, Result};
use cartography::{
    layout::LayoutConfig,
    report::visualize,
    source::{fetch_all, SnapshotSource},
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Draws a follower graph as it stood at a cutoff and prints the report as JSON.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Recorded follower API responses, keyed by username.
    #[arg(long)]
    snapshot: PathBuf,

    /// Users to include. Defaults to every user in the snapshot.
    #[arg(long = "user", value_name = "NAME")]
    users: Vec<String>,

    /// Only follows made at or before this time become edges, e.g. `2023-06-01 12:00:00`.
    #[arg(long)]
    cutoff: String,

    /// Seed for the layout; omit for a different arrangement on every run.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 50)]
    iterations: usize,

    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,

    /// Log filter used when `RUST_LOG` isn't set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let source = SnapshotSource::open(&args.snapshot)?;
    let users = if args.users.is_empty() {
        source.usernames()
    } else {
        args.users.clone()
    };
    info!(users = users.len(), snapshot = %args.snapshot.display(), "fetching connections");

    let data = fetch_all(&source, &users);

    let mut config = LayoutConfig::default()
        .with_iterations(args.iterations)
        .with_scale(args.scale);
    config.seed = args.seed;

    let report = visualize(&data, &args.cutoff, &config).context("visualization request rejected")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to encode report")?;

    println!("{json}");

    Ok(())
}
