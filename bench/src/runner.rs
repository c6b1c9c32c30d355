use crate::clock::{Clock, SystemClock};
use crate::config::{BenchConfig, Role};
use crate::error::BenchError;
use crate::filter;
use crate::harness::{BatchHarness, RunSummary};
use crate::server::http_server;
use crate::server::state::AppState;
use crate::sink::ResultSink;
use crate::transport::HttpTransport;
use std::sync::Arc;
use tracing::info;

pub async fn run(config: BenchConfig) -> Result<(), BenchError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    info!("Starting in {} mode...", config.role);
    match config.role {
        Role::Client => run_client(&config, clock).await.map(|_| ()),
        Role::Server => run_server(&config, clock).await,
        Role::Local => run_local(&config, clock).await,
    }
}

/// Measures the target and returns once every sample is persisted and the
/// report, if enabled, has been sent.
pub async fn run_client(
    config: &BenchConfig,
    clock: Arc<dyn Clock>,
) -> Result<RunSummary, BenchError> {
    info!("Measuring latency of: {}", config.address);
    let transport = HttpTransport::new(config, clock)?;
    let sample_filter = filter::from_config(config);
    let sink = ResultSink::create(config)?.spawn();
    let summary = BatchHarness::new(config, Box::new(transport), sample_filter)
        .run(sink)
        .await?;
    info!(
        "Finished the run, {} of {} requests recorded.",
        summary.recorded, summary.issued
    );
    Ok(summary)
}

pub async fn run_server(config: &BenchConfig, clock: Arc<dyn Clock>) -> Result<(), BenchError> {
    let listener = http_server::bind(config.listen_address).await?;
    let state = Arc::new(AppState::new(config, clock));
    http_server::serve(listener, state).await
}

/// Binds the responder before measuring so the first request cannot race
/// the server start, then keeps serving after the client part is done.
pub async fn run_local(config: &BenchConfig, clock: Arc<dyn Clock>) -> Result<(), BenchError> {
    let listener = http_server::bind(config.listen_address).await?;
    let state = Arc::new(AppState::new(config, clock.clone()));
    let server = tokio::spawn(http_server::serve(listener, state));

    run_client(config, clock).await?;
    info!("Client part finished, the responder keeps running.");

    match server.await {
        Ok(result) => result,
        Err(error) => Err(BenchError::Server(std::io::Error::other(error))),
    }
}
