//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the selected backend
//! - Stream the request body upstream and the response body back
//! - Relay status and headers unchanged
//!
//! # Design Decisions
//! - One attempt only; failures surface as 502
//! - Bodies are never buffered in full
//! - Hop-by-hop headers describe the client connection, not the message, and
//!   are not relayed in either direction

use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::Request;
use axum::response::Response;
use reqwest::Client;
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::http::error::GatewayError;

static HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

/// Forwards requests over a pooled upstream client.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
}

impl Forwarder {
    /// Wrap an existing client; its timeouts bound every forwarded request.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a forwarder with connect/read timeouts from configuration.
    pub fn from_config(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .read_timeout(Duration::from_secs(timeouts.read_secs))
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;
        Ok(Self::new(client))
    }

    /// Send `request` to `target` (a backend base address) and relay the reply.
    pub async fn forward(&self, target: &str, request: Request<Body>) -> Result<Response, GatewayError> {
        let (parts, body) = request.into_parts();
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = format!("{}{}", target, path);

        let has_body = parts.headers.contains_key(header::CONTENT_LENGTH)
            || parts.headers.contains_key(header::TRANSFER_ENCODING);

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);

        let mut builder = self.client.request(parts.method, &url).headers(headers);
        if has_body {
            builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let upstream = builder.send().await.map_err(|source| GatewayError::Forwarding {
            target: url.clone(),
            source,
        })?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_hop_by_hop(&mut headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
