use axum::extract::connect_info::Connected;
use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::serve::IncomingStream;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::trace;

/// Per-connection state, created once when a TCP connection is accepted and
/// shared by every request that connection carries.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    pub remote_address: SocketAddr,
    served: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new(remote_address: SocketAddr) -> Self {
        ConnectionTracker {
            remote_address,
            served: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Counts one more request and returns its 1-based position on the connection.
    pub fn next_ordinal(&self) -> u64 {
        self.served.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Connected<IncomingStream<'_, TcpListener>> for ConnectionTracker {
    fn connect_info(stream: IncomingStream<'_, TcpListener>) -> Self {
        ConnectionTracker::new(*stream.remote_addr())
    }
}

/// Position of the current request on its connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOrdinal(pub u64);

/// Numbers every request on its connection, whichever route serves it.
pub async fn count_requests(
    ConnectInfo(connection): ConnectInfo<ConnectionTracker>,
    mut request: Request,
    next: Next,
) -> Response {
    let ordinal = connection.next_ordinal();
    trace!(
        "Request #{ordinal} on connection from: {}",
        connection.remote_address
    );
    request.extensions_mut().insert(RequestOrdinal(ordinal));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_should_start_at_one_per_connection() {
        let first = ConnectionTracker::new("127.0.0.1:5000".parse().unwrap());
        let second = ConnectionTracker::new("127.0.0.1:5001".parse().unwrap());
        let first_clone = first.clone();

        assert_eq!(first.next_ordinal(), 1);
        assert_eq!(first_clone.next_ordinal(), 2);
        assert_eq!(first.next_ordinal(), 3);
        assert_eq!(second.next_ordinal(), 1);
    }
}
