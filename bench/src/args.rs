use clap::Parser;

pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:80";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:80";
pub const DEFAULT_BATCH_SIZE: u32 = 20;
pub const DEFAULT_BATCH_COUNT: u32 = 10;
pub const DEFAULT_CACHE_HEADER: &str = "X-Cache";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Run as the requester (client); without it the process serves the echo endpoint
    #[arg(long, default_value_t = false)]
    pub client: bool,

    /// Target base URL (client mode only)
    #[arg(long, default_value = DEFAULT_ADDRESS)]
    pub addr: String,

    /// Address the echo responder binds to (server and local modes)
    #[arg(long, default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen: String,

    /// Number of requests per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub size: u32,

    /// Number of batches, the connection pool is recycled after each one
    #[arg(long, default_value_t = DEFAULT_BATCH_COUNT)]
    pub count: u32,

    /// Request payload size in bytes
    #[arg(long, default_value_t = 0)]
    pub reqsize: usize,

    /// Response padding size in bytes
    #[arg(long, default_value_t = 0)]
    pub respsize: usize,

    /// Print every sample to stdout
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Dry run, samples are not written to the ledger
    #[arg(long, default_value_t = false)]
    pub dry: bool,

    /// Run the responder and the requester in one process
    #[arg(long, default_value_t = false)]
    pub local: bool,

    /// Ledger file name, defaults to output-{date}.csv
    #[arg(long)]
    pub output: Option<String>,

    /// Upload the ledger to {addr}/report when the run is finished
    #[arg(long, default_value_t = false)]
    pub report: bool,

    /// Prefix prepended by the collector to uploaded report file names
    #[arg(long, default_value = "")]
    pub report_prefix: String,

    /// Record only cache hits, responses whose cache header reports a miss are discarded
    #[arg(long, default_value_t = false)]
    pub only_hit: bool,

    /// Response header inspected by --only-hit
    #[arg(long, default_value = DEFAULT_CACHE_HEADER)]
    pub cache_header: String,
}
