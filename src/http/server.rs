//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all proxy handler
//! - Wire up request tracing
//! - Select a backend per request and forward to it
//! - Serve until shutdown is signalled

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::http::error::GatewayError;
use crate::http::forward::Forwarder;
use crate::http::request::RequestId;
use crate::load_balancer::Balancer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub balancer: Arc<dyn Balancer>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server dispatching over `balancer` through `forwarder`.
    pub fn new(balancer: Arc<dyn Balancer>, forwarder: Arc<Forwarder>) -> Self {
        let state = AppState { balancer, forwarder };
        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The underlying router, for embedding or in-process testing.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve connections from `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: pick a backend and relay the request to it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = RequestId::new();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let Some(target) = state.balancer.select() else {
        tracing::warn!(
            request_id = %request_id,
            "{} {} --> no backend available",
            method,
            path
        );
        return GatewayError::DispatchUnavailable.into_response();
    };

    match state.forwarder.forward(&target, request).await {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                status = response.status().as_u16(),
                "{} {} --> {}",
                method,
                path,
                target
            );
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "{} {} --> {} failed",
                method,
                path,
                target
            );
            e.into_response()
        }
    }
}
