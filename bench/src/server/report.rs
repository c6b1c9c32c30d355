use crate::server::error::ServerError;
use crate::server::state::AppState;
use crate::uploader::ReportUpload;
use axum::extract::State;
use axum::routing::post;
use axum::{Form, Router};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const OK: &str = "OK";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", post(store_report))
        .with_state(state)
}

/// Writes the uploaded ledger verbatim, replacing any previous upload with
/// the same name.
async fn store_report(
    State(state): State<Arc<AppState>>,
    Form(report): Form<ReportUpload>,
) -> Result<&'static str, ServerError> {
    let path = report_path(&state.report_prefix, &report.filename)?;
    tokio::fs::write(&path, report.csv.as_bytes())
        .await
        .map_err(|error| ServerError::CannotStoreReport(path.clone(), error))?;
    info!("Stored report {} ({} bytes).", path, report.csv.len());
    Ok(OK)
}

/// Only the last component of the uploaded name is kept, the prefix alone
/// decides where reports land.
pub fn report_path(prefix: &str, filename: &str) -> Result<String, ServerError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServerError::InvalidReportFilename(filename.to_owned()))?;
    Ok(format!("{prefix}{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_should_be_prepended() {
        assert_eq!(
            report_path("eu-", "output-2024.01.01 10:00.csv").unwrap(),
            "eu-output-2024.01.01 10:00.csv"
        );
        assert_eq!(report_path("", "run.csv").unwrap(), "run.csv");
        assert_eq!(
            report_path("reports/", "run.csv").unwrap(),
            "reports/run.csv"
        );
    }

    #[test]
    fn directories_in_the_filename_should_be_dropped() {
        assert_eq!(report_path("p-", "../../etc/run.csv").unwrap(), "p-run.csv");
        assert_eq!(report_path("p-", "/tmp/run.csv").unwrap(), "p-run.csv");
    }

    #[test]
    fn filenames_without_a_name_should_be_rejected() {
        for filename in ["", "..", "/", "reports/.."] {
            assert!(matches!(
                report_path("p-", filename),
                Err(ServerError::InvalidReportFilename(_))
            ));
        }
    }
}
