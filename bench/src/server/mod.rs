pub mod connection;
pub mod echo;
pub mod error;
pub mod http_server;
pub mod report;
pub mod state;
