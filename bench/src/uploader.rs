use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Ledger bundle sent to the collector's `/report` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportUpload {
    pub csv: String,
    pub filename: String,
}

/// Best effort delivery of the finished ledger. Nothing is retried and no
/// failure reaches the caller, the measurement is already on disk.
#[derive(Debug, Clone)]
pub struct ReportUploader {
    client: reqwest::Client,
    url: String,
}

impl ReportUploader {
    pub fn new(url: String) -> Self {
        ReportUploader {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub async fn upload(&self, report: &ReportUpload) -> bool {
        info!(
            "Uploading the report {} ({} bytes) to {}...",
            report.filename,
            report.csv.len(),
            self.url
        );
        let response = match self.client.post(&self.url).form(report).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!("Cannot upload the report to {}: {error}", self.url);
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Collector at {} rejected the report with status: {status}",
                self.url
            );
            return false;
        }

        info!("Uploaded the report {}.", report.filename);
        true
    }
}
