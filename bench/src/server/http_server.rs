use crate::error::BenchError;
use crate::server::connection::{count_requests, ConnectionTracker};
use crate::server::state::AppState;
use crate::server::{echo, report};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub fn router(state: Arc<AppState>) -> Router {
    echo::router(state.clone())
        .merge(report::router(state))
        .layer(middleware::from_fn(count_requests))
}

pub async fn bind(address: SocketAddr) -> Result<TcpListener, BenchError> {
    TcpListener::bind(address)
        .await
        .map_err(|error| BenchError::ServerBind(address.to_string(), error))
}

/// Serves the echo and collector endpoints until the process is terminated.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), BenchError> {
    let address = listener.local_addr()?;
    let app = router(state);
    info!("Started the echo responder on: {address}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<ConnectionTracker>(),
    )
    .await
    .map_err(BenchError::Server)
}
