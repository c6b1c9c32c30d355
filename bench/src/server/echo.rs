use crate::protocol::{EchoParams, EchoResponse};
use crate::server::connection::RequestOrdinal;
use crate::server::state::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Form, Router};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(echo).post(echo))
        .with_state(state)
}

/// `respSize` comes from the query string on GET and from the form body on
/// POST, anything unreadable is treated as no padding.
async fn echo(
    State(state): State<Arc<AppState>>,
    Extension(RequestOrdinal(ordinal)): Extension<RequestOrdinal>,
    params: Result<Form<EchoParams>, FormRejection>,
) -> String {
    let arrival_us = state.clock.now_micros();
    let params = params.map(|Form(params)| params).unwrap_or_default();
    EchoResponse::new(arrival_us, ordinal, params.response_size()).encode()
}
