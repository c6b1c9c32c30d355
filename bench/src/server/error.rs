use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::io;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid report filename: {0}")]
    InvalidReportFilename(String),
    #[error("Cannot store report: {0}")]
    CannotStoreReport(String, #[source] io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ServerError::InvalidReportFilename(_) => StatusCode::BAD_REQUEST,
            ServerError::CannotStoreReport(path, source) => {
                error!("Cannot store report to {path}: {source}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status_code, self.to_string()).into_response()
    }
}
