//! Router, middleware and serving.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    routing::get,
    Router,
};
use meowfacts_core::{FactsClient, UreqTransport};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::assets;
use crate::config::{ConfigError, RelayConfig};
use crate::endpoint;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: FactsClient,
}

impl AppState {
    pub fn new(client: FactsClient) -> Self {
        Self { client }
    }

    /// State backed by the real HTTP transport described by `config`.
    pub fn from_config(config: &RelayConfig) -> Result<Self, ConfigError> {
        let transport = UreqTransport::new(config.upstream_timeout());
        let client = FactsClient::new(config.upstream_url()?, Arc::new(transport));
        Ok(Self::new(client))
    }
}

/// UUID v4 for each request lacking an `x-request-id`.
#[derive(Clone, Copy, Debug, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(assets::index))
        .route("/js/index.js", get(assets::script))
        .route("/api/facts", get(endpoint::get_facts))
        .fallback(endpoint::not_found)
        .method_not_allowed_fallback(endpoint::method_not_allowed)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
