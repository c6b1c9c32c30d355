use crate::clock::Clock;
use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::protocol::EchoRequest;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const MAX_IDLE_CONNECTIONS: usize = 10;
const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// One request/response round trip as seen by the requester.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub sent_at_us: i64,
    /// Taken once the response head has arrived, before the body is read.
    pub received_at_us: i64,
    pub headers: HeaderMap,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self) -> Result<Exchange, BenchError>;

    /// Drops idle pooled connections so that following requests have to
    /// establish new ones.
    fn recycle(&mut self) -> Result<(), BenchError>;
}

pub struct HttpTransport {
    address: Url,
    form: Option<EchoRequest>,
    clock: Arc<dyn Clock>,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &BenchConfig, clock: Arc<dyn Clock>) -> Result<Self, BenchError> {
        let form = config
            .sends_form()
            .then(|| EchoRequest::new(config.request_size, config.response_size));
        Ok(HttpTransport {
            address: config.address.clone(),
            form,
            clock,
            client: Self::build_client()?,
        })
    }

    fn build_client() -> Result<Client, BenchError> {
        let client = Client::builder()
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS)
            .pool_idle_timeout(IDLE_CONNECTION_TIMEOUT)
            .build()?;
        Ok(client)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self) -> Result<Exchange, BenchError> {
        let request = match &self.form {
            Some(form) => self.client.post(self.address.clone()).form(form),
            None => self.client.get(self.address.clone()),
        };

        let sent_at_us = self.clock.now_micros();
        let response = request.send().await?;
        let received_at_us = self.clock.now_micros();

        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(Exchange {
            sent_at_us,
            received_at_us,
            headers,
            body,
        })
    }

    fn recycle(&mut self) -> Result<(), BenchError> {
        // reqwest has no way to close idle connections, replacing the client
        // drops its whole pool.
        self.client = Self::build_client()?;
        debug!("Recycled the connection pool.");
        Ok(())
    }
}
