//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use liveproxy::config::TimeoutConfig;
use liveproxy::http::{Forwarder, HttpServer};
use liveproxy::load_balancer::Balancer;
use liveproxy::Shutdown;

/// Serve `router` on an ephemeral localhost port.
pub async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Backend answering every request with its own name.
pub async fn spawn_named_backend(name: &'static str) -> SocketAddr {
    spawn_backend(Router::new().fallback(move || async move { name })).await
}

/// Backend answering every request after `delay`.
pub async fn spawn_slow_backend(delay: Duration, status: StatusCode) -> SocketAddr {
    spawn_backend(Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        (status, "slow")
    }))
    .await
}

/// Backend reflecting the request it received.
///
/// Responds `201` with `x-backend: echo`, `x-seen-custom` copied from the
/// request's `x-custom` header, and a body of `METHOD path?query|body`.
pub async fn spawn_echo_backend() -> SocketAddr {
    async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
        let custom = headers
            .get("x-custom")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = format!(
            "{} {}|{}",
            method,
            uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/"),
            String::from_utf8_lossy(&body)
        );
        (
            StatusCode::CREATED,
            [("x-backend", "echo".to_string()), ("x-seen-custom", custom)],
            body,
        )
    }

    spawn_backend(Router::new().route("/", any(echo)).route("/{*path}", any(echo))).await
}

/// Backend answering with the number of request body bytes it received.
pub async fn spawn_counting_backend() -> SocketAddr {
    let router = Router::new()
        .fallback(|body: Bytes| async move { body.len().to_string() })
        .layer(DefaultBodyLimit::disable());
    spawn_backend(router).await
}

/// An address nothing is listening on.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start the proxy over `balancer` on an ephemeral port.
pub async fn spawn_proxy(balancer: Arc<dyn Balancer>) -> (SocketAddr, Shutdown) {
    let forwarder = Arc::new(Forwarder::from_config(&TimeoutConfig::default()).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = HttpServer::new(balancer, forwarder)
            .run(listener, server_shutdown)
            .await;
    });

    (addr, shutdown)
}

/// Test client that never routes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
