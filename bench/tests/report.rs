mod common;

use crate::common::start_server;
use latency_bench::uploader::{ReportUpload, ReportUploader};
use reqwest::StatusCode;
use tempfile::TempDir;

fn prefix(directory: &TempDir) -> String {
    format!("{}/eu-", directory.path().display())
}

#[tokio::test]
async fn upload_should_be_stored_under_the_prefix() {
    let directory = TempDir::new().unwrap();
    let address = start_server(&prefix(&directory)).await;
    let uploader = ReportUploader::new(format!("{address}/report"));

    let uploaded = uploader
        .upload(&ReportUpload {
            csv: "isFirst,diff,client to server,server to client\ntrue,1,1,0\n".to_owned(),
            filename: "run.csv".to_owned(),
        })
        .await;

    assert!(uploaded);
    let stored = std::fs::read_to_string(directory.path().join("eu-run.csv")).unwrap();
    assert_eq!(
        stored,
        "isFirst,diff,client to server,server to client\ntrue,1,1,0\n"
    );
}

#[tokio::test]
async fn repeated_upload_should_overwrite() {
    let directory = TempDir::new().unwrap();
    let address = start_server(&prefix(&directory)).await;
    let uploader = ReportUploader::new(format!("{address}/report"));

    for csv in ["a much longer first version\n", "second\n"] {
        assert!(
            uploader
                .upload(&ReportUpload {
                    csv: csv.to_owned(),
                    filename: "run.csv".to_owned(),
                })
                .await
        );
    }

    let stored = std::fs::read_to_string(directory.path().join("eu-run.csv")).unwrap();
    assert_eq!(stored, "second\n");
}

#[tokio::test]
async fn collector_should_answer_ok() {
    let directory = TempDir::new().unwrap();
    let address = start_server(&prefix(&directory)).await;

    let response = reqwest::Client::new()
        .post(format!("{address}/report"))
        .form(&[("csv", "x\n"), ("filename", "nested/dir/run.csv")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
    assert!(directory.path().join("eu-run.csv").exists());
}

#[tokio::test]
async fn filename_without_a_name_should_be_rejected() {
    let directory = TempDir::new().unwrap();
    let address = start_server(&prefix(&directory)).await;
    let uploader = ReportUploader::new(format!("{address}/report"));

    let uploaded = uploader
        .upload(&ReportUpload {
            csv: "x\n".to_owned(),
            filename: "..".to_owned(),
        })
        .await;

    assert!(!uploaded);
}
