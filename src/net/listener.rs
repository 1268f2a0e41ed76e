//! TCP listener binding.

use tokio::net::TcpListener;
use thiserror::Error;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address. Fatal at startup.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bind the proxy listener to `address` (`host:port`).
pub async fn bind(address: &str) -> Result<TcpListener, ListenerError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ListenerError::Bind {
            address: address.to_string(),
            source,
        })?;

    if let Ok(local_addr) = listener.local_addr() {
        tracing::info!(address = %local_addr, "Listener bound");
    }
    Ok(listener)
}
