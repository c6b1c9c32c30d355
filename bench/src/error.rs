use std::path::PathBuf;
use thiserror::Error;
use tokio::io;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Request error")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Cannot create ledger file: {path}")]
    CannotCreateLedger {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Cannot write ledger row")]
    LedgerWrite(#[from] csv::Error),
    #[error("IO error")]
    Io(#[from] io::Error),
    #[error("Result sink has stopped before acknowledging completion")]
    SinkClosed,
    #[error("Cannot bind server to: {0}")]
    ServerBind(String, #[source] io::Error),
    #[error("Server error")]
    Server(#[source] io::Error),
}
