use clap::Parser;
use latency_bench::args::Args;
use latency_bench::clock::SystemClock;
use latency_bench::config::BenchConfig;
use latency_bench::server::http_server;
use latency_bench::server::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;

pub fn config(args: &[&str]) -> BenchConfig {
    let args = std::iter::once("latency-bench").chain(args.iter().copied());
    BenchConfig::try_from(Args::parse_from(args)).unwrap()
}

/// Starts a responder on an ephemeral loopback port and returns its base URL.
pub async fn start_server(report_prefix: &str) -> String {
    let config = config(&["--report-prefix", report_prefix]);
    let listener = http_server::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let address = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(&config, Arc::new(SystemClock)));
    tokio::spawn(http_server::serve(listener, state));
    format!("http://{address}")
}
