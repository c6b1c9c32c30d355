use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::protocol::Sample;
use crate::uploader::{ReportUpload, ReportUploader};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub const QUEUE_CAPACITY: usize = 1024;
pub const LEDGER_HEADER: [&str; 4] = ["isFirst", "diff", "client to server", "server to client"];

pub enum SinkCommand {
    Record(Sample),
    /// No more samples will follow. The sender is answered once the ledger
    /// is closed and the report, if any, has been uploaded.
    Complete(oneshot::Sender<SinkSummary>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSummary {
    pub samples: u64,
    pub ledger: Option<PathBuf>,
    pub uploaded: bool,
}

/// CSV ledger flushed after every row, so a crash loses at most the sample
/// being written.
struct Ledger {
    path: PathBuf,
    writer: Writer<File>,
}

impl Ledger {
    fn create(path: &Path) -> Result<Self, BenchError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|source| BenchError::CannotCreateLedger {
                path: path.to_path_buf(),
                source,
            })?;
        writer.write_record(LEDGER_HEADER)?;
        writer.flush()?;
        Ok(Ledger {
            path: path.to_path_buf(),
            writer,
        })
    }

    fn append(&mut self, sample: &Sample) -> Result<(), BenchError> {
        self.writer.serialize(sample)?;
        self.writer.flush()?;
        Ok(())
    }

    fn close(mut self) -> Result<PathBuf, BenchError> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

pub struct ResultSink {
    ledger: Option<Ledger>,
    verbose: bool,
    console: Box<dyn Write + Send>,
    uploader: Option<ReportUploader>,
    report_filename: String,
    samples: u64,
}

impl ResultSink {
    /// Creates the ledger file up front, a run that cannot persist its
    /// samples must fail before issuing any request.
    pub fn create(config: &BenchConfig) -> Result<Self, BenchError> {
        let ledger = if config.dry_run {
            info!("Dry run, samples will not be written to a ledger.");
            None
        } else {
            let ledger = Ledger::create(&config.output)?;
            info!("Writing samples to: {}", config.output.display());
            Some(ledger)
        };

        let uploader = config
            .report
            .then(|| ReportUploader::new(config.report_url()));

        Ok(ResultSink {
            ledger,
            verbose: config.verbose,
            console: Box::new(io::stdout()),
            uploader,
            report_filename: config.report_filename(),
            samples: 0,
        })
    }

    /// Replaces stdout as the destination of verbose sample lines.
    pub fn with_console(mut self, console: Box<dyn Write + Send>) -> Self {
        self.console = console;
        self
    }

    pub fn spawn(self) -> SinkHandle {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let task = tokio::spawn(self.run(receiver));
        SinkHandle { sender, task }
    }

    async fn run(mut self, mut receiver: mpsc::Receiver<SinkCommand>) -> Result<(), BenchError> {
        while let Some(command) = receiver.recv().await {
            match command {
                SinkCommand::Record(sample) => self.record(&sample)?,
                SinkCommand::Complete(acknowledge) => {
                    let summary = self.finish().await?;
                    if acknowledge.send(summary).is_err() {
                        warn!("Nobody is waiting for the result sink to complete.");
                    }
                    return Ok(());
                }
            }
        }

        warn!(
            "Result sink closed before the run completed, recorded {} samples.",
            self.samples
        );
        if let Some(ledger) = self.ledger.take() {
            ledger.close()?;
        }
        Ok(())
    }

    fn record(&mut self, sample: &Sample) -> Result<(), BenchError> {
        if self.verbose {
            writeln!(self.console, "{}", sample.console_line())?;
        }
        if let Some(ledger) = self.ledger.as_mut() {
            ledger.append(sample)?;
        }
        self.samples += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<SinkSummary, BenchError> {
        let Some(ledger) = self.ledger.take() else {
            if self.uploader.is_some() {
                warn!("Dry run, there is no ledger to report.");
            }
            return Ok(SinkSummary {
                samples: self.samples,
                ledger: None,
                uploaded: false,
            });
        };

        let path = ledger.close()?;
        info!(
            "Closed the ledger {} with {} samples.",
            path.display(),
            self.samples
        );

        let mut uploaded = false;
        if let Some(uploader) = &self.uploader {
            let csv = tokio::fs::read_to_string(&path).await?;
            let report = ReportUpload {
                csv,
                filename: self.report_filename.clone(),
            };
            uploaded = uploader.upload(&report).await;
        }

        Ok(SinkSummary {
            samples: self.samples,
            ledger: Some(path),
            uploaded,
        })
    }
}

/// Producer side of the bounded queue feeding the result sink.
pub struct SinkHandle {
    sender: mpsc::Sender<SinkCommand>,
    task: JoinHandle<Result<(), BenchError>>,
}

impl SinkHandle {
    /// Waits for queue capacity, a slow sink throttles the producer instead
    /// of losing samples.
    pub async fn record(&self, sample: Sample) -> Result<(), BenchError> {
        self.sender
            .send(SinkCommand::Record(sample))
            .await
            .map_err(|_| BenchError::SinkClosed)
    }

    /// Signals the end of input and waits until everything is persisted.
    pub async fn complete(self) -> Result<SinkSummary, BenchError> {
        let SinkHandle { sender, task } = self;
        let (acknowledge, acknowledged) = oneshot::channel();
        if sender
            .send(SinkCommand::Complete(acknowledge))
            .await
            .is_err()
        {
            return Err(stopped(task).await);
        }
        drop(sender);

        match acknowledged.await {
            Ok(summary) => {
                stopped(task).await;
                Ok(summary)
            }
            Err(_) => Err(stopped(task).await),
        }
    }

    /// Stops the sink without the completion step, nothing is uploaded.
    pub async fn close(self) -> Result<(), BenchError> {
        let SinkHandle { sender, task } = self;
        drop(sender);
        match stopped(task).await {
            BenchError::SinkClosed => Ok(()),
            error => Err(error),
        }
    }
}

/// Awaits the sink task and returns why it stopped.
async fn stopped(task: JoinHandle<Result<(), BenchError>>) -> BenchError {
    match task.await {
        Ok(Ok(())) => BenchError::SinkClosed,
        Ok(Err(error)) => error,
        Err(error) => {
            error!("Result sink task failed: {error}");
            BenchError::SinkClosed
        }
    }
}
