use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::filter::SampleFilter;
use crate::protocol::{EchoReceipt, Sample};
use crate::sink::{SinkHandle, SinkSummary};
use crate::transport::Transport;
use human_repr::HumanDuration;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub issued: u64,
    pub recorded: u64,
    pub discarded: u64,
    pub elapsed: Duration,
    pub sink: SinkSummary,
}

#[derive(Debug, Default)]
struct Counters {
    issued: u64,
    recorded: u64,
    discarded: u64,
}

/// Issues `batch_count` batches of `batch_size` requests, one at a time, and
/// feeds every retained sample to the result sink. Requests are never
/// concurrent so that pool contention does not leak into the latencies.
pub struct BatchHarness {
    total_requests: u64,
    batch_size: u32,
    batch_count: u32,
    transport: Box<dyn Transport>,
    filter: Box<dyn SampleFilter>,
}

impl BatchHarness {
    pub fn new(
        config: &BenchConfig,
        transport: Box<dyn Transport>,
        filter: Box<dyn SampleFilter>,
    ) -> Self {
        BatchHarness {
            total_requests: config.total_requests(),
            batch_size: config.batch_size,
            batch_count: config.batch_count,
            transport,
            filter,
        }
    }

    /// Runs every batch, then completes the sink and waits until it has
    /// drained. The first transport failure aborts the run, the sink is
    /// still closed so the samples recorded so far stay on disk.
    pub async fn run(mut self, sink: SinkHandle) -> Result<RunSummary, BenchError> {
        info!(
            "Sending {} requests in {} batches of {} requests...",
            self.total_requests, self.batch_count, self.batch_size
        );

        let start = Instant::now();
        let mut counters = Counters::default();
        if let Err(error) = self.issue_batches(&sink, &mut counters).await {
            error!(
                "Run aborted after {} requests: {error}",
                counters.issued
            );
            return match (error, sink.close().await) {
                (BenchError::SinkClosed, Err(cause)) => Err(cause),
                (error, Err(cause)) => {
                    error!("Result sink failed while closing: {cause}");
                    Err(error)
                }
                (error, Ok(())) => Err(error),
            };
        }

        let elapsed = start.elapsed();
        let sink = sink.complete().await?;
        info!(
            "Sent {} requests in {}, recorded {} samples, discarded {}.",
            counters.issued,
            elapsed.human_duration(),
            counters.recorded,
            counters.discarded
        );

        Ok(RunSummary {
            issued: counters.issued,
            recorded: counters.recorded,
            discarded: counters.discarded,
            elapsed,
            sink,
        })
    }

    async fn issue_batches(
        &mut self,
        sink: &SinkHandle,
        counters: &mut Counters,
    ) -> Result<(), BenchError> {
        for batch in 1..=self.batch_count {
            for _ in 0..self.batch_size {
                let exchange = self.transport.exchange().await?;
                counters.issued += 1;

                if !self.filter.retain(&exchange.headers) {
                    counters.discarded += 1;
                    continue;
                }

                let receipt = EchoReceipt::parse(&exchange.body)?;
                let sample = Sample::derive(exchange.sent_at_us, exchange.received_at_us, receipt);
                sink.record(sample).await?;
                counters.recorded += 1;
            }

            self.transport.recycle()?;
            debug!("Finished batch {batch}/{}.", self.batch_count);
        }
        Ok(())
    }
}
