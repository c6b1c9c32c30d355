use crate::args::Args;
use crate::error::BenchError;
use chrono::Local;
use reqwest::header::HeaderName;
use reqwest::Url;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
    Local,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Server => write!(f, "server"),
            Role::Local => write!(f, "local"),
        }
    }
}

/// Immutable run parameters, built once at startup and shared by the harness,
/// the result sink and the server handlers.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub role: Role,
    pub address: Url,
    pub listen_address: SocketAddr,
    pub batch_size: u32,
    pub batch_count: u32,
    pub request_size: usize,
    pub response_size: usize,
    pub verbose: bool,
    pub dry_run: bool,
    pub output: PathBuf,
    pub report: bool,
    pub report_prefix: String,
    pub only_hit: bool,
    pub cache_header: HeaderName,
}

impl BenchConfig {
    pub fn total_requests(&self) -> u64 {
        self.batch_size as u64 * self.batch_count as u64
    }

    /// Requests carry a form body only when some payload sizing was asked for.
    pub fn sends_form(&self) -> bool {
        self.request_size != 0 || self.response_size != 0
    }

    /// URL the collector accepts ledger uploads on.
    pub fn report_url(&self) -> String {
        format!("{}/report", self.address.as_str().trim_end_matches('/'))
    }

    /// Name the ledger is uploaded under, before the collector adds its prefix.
    pub fn report_filename(&self) -> String {
        self.output.to_string_lossy().into_owned()
    }
}

pub fn default_ledger_filename() -> String {
    format!("output-{}.csv", Local::now().format("%Y.%m.%d %H:%M"))
}

impl TryFrom<Args> for BenchConfig {
    type Error = BenchError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.size == 0 {
            return Err(BenchError::InvalidConfiguration(
                "batch size must be greater than 0".to_owned(),
            ));
        }
        if args.count == 0 {
            return Err(BenchError::InvalidConfiguration(
                "batch count must be greater than 0".to_owned(),
            ));
        }

        let address = Url::parse(&args.addr).map_err(|error| {
            BenchError::InvalidConfiguration(format!("invalid address '{}': {error}", args.addr))
        })?;
        if address.scheme() != "http" && address.scheme() != "https" {
            return Err(BenchError::InvalidConfiguration(format!(
                "unsupported address scheme: {}",
                address.scheme()
            )));
        }

        let listen_address = args.listen.parse::<SocketAddr>().map_err(|error| {
            BenchError::InvalidConfiguration(format!(
                "invalid listen address '{}': {error}",
                args.listen
            ))
        })?;

        let cache_header = HeaderName::try_from(args.cache_header.as_str()).map_err(|error| {
            BenchError::InvalidConfiguration(format!(
                "invalid cache header '{}': {error}",
                args.cache_header
            ))
        })?;

        let role = match (args.client, args.local) {
            (true, _) => Role::Client,
            (false, true) => Role::Local,
            (false, false) => Role::Server,
        };

        let output = args
            .output
            .filter(|output| !output.is_empty())
            .unwrap_or_else(default_ledger_filename);

        Ok(BenchConfig {
            role,
            address,
            listen_address,
            batch_size: args.size,
            batch_count: args.count,
            request_size: args.reqsize,
            response_size: args.respsize,
            verbose: args.verbose,
            dry_run: args.dry,
            output: PathBuf::from(output),
            report: args.report,
            report_prefix: args.report_prefix,
            only_hit: args.only_hit,
            cache_header,
        })
    }
}
