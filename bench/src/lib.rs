pub mod args;
pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod harness;
pub mod protocol;
pub mod runner;
pub mod server;
pub mod sink;
pub mod transport;
pub mod uploader;
