use anyhow::{Context, Result};
use clap::Parser;
use latency_bench::args::Args;
use latency_bench::config::BenchConfig;
use latency_bench::runner;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BenchConfig::try_from(args).context("Cannot build the configuration")?;
    let role = config.role;
    runner::run(config)
        .await
        .with_context(|| format!("Latency bench failed in {role} mode"))?;
    info!("Latency bench has finished.");
    Ok(())
}
