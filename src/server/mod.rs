//! HTTP surface of the todo manager.
//!
//! # Endpoints
//!
//! - `GET /` - liveness probe
//! - `GET /shutdown` - stop the server gracefully
//! - `GET|HEAD|POST /{kind}` - list (with `?field=value` filters) or create
//! - `GET|HEAD|PUT|POST|DELETE /{kind}/{id}` - read, amend or delete one record
//! - `GET|HEAD|POST /{kind}/{id}/{relation}` - list, probe or add links
//! - `DELETE /{kind}/{id}/{relation}/{target}` - remove a link
//!
//! `{kind}` is one of `projects`, `todos`, `categories`; `{relation}` is any
//! relation the catalog declares for that kind.

mod entity_endpoints;
mod http_error;
mod relation_endpoints;

pub use http_error::{status_code, HttpError, Reply};

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, Uri},
    middleware::{self, Next},
    response::Response,
    Router,
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::entity::{EntityId, EntityKind};
use crate::error::{Result, TodoManagerError};
use crate::storage::TodoStore;
use crate::view::Format;

/// Application state shared across all endpoints.
///
/// Reads share the lock; every mutation takes the write lock for its whole
/// read-modify-write, which serializes creates, updates, deletes and link
/// changes against each other.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<TodoStore>>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(store: TodoStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            shutdown: CancellationToken::new(),
        }
    }
}

/// Create the application router with all endpoint modules
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(entity_endpoints::routes())
        .merge(relation_endpoints::routes())
        .fallback(unknown_route)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Serve on an already bound listener until `/shutdown` or Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let token = state.shutdown.clone();
    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = token.cancelled() => tracing::info!("shutdown requested"),
                _ = tokio::signal::ctrl_c() => tracing::info!("interrupt received"),
            }
        })
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Bind the configured address and run the server with a fresh store.
pub async fn start_server(config: &ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.address()).await?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "todo manager ready on http://{}", addr);
    serve(listener, AppState::new(TodoStore::new())).await
}

/// Response format chosen from the request's `Accept` header
#[derive(Debug, Clone, Copy)]
pub struct Negotiated(pub Format);

impl<S> FromRequestParts<S> for Negotiated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok());
        Ok(Negotiated(Format::negotiate(accept)?))
    }
}

pub(crate) fn parse_kind(raw: &str) -> Result<EntityKind> {
    raw.parse()
        .map_err(|_| TodoManagerError::UnknownRoute(format!("/{}", raw)))
}

/// Ids that do not parse can not exist, so they are reported as not found.
pub(crate) fn parse_entity_id(kind: EntityKind, raw: &str) -> Result<EntityId> {
    raw.parse()
        .map_err(|_| TodoManagerError::not_found(kind, raw))
}

/// Decode a JSON request body. An empty body reads as `{}`.
pub(crate) fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<Value> {
    if let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        if content_type.to_ascii_lowercase().contains("xml") {
            return Err(TodoManagerError::UnsupportedMediaType(content_type.to_string()));
        }
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(body)
        .map_err(|e| TodoManagerError::validation(format!("Invalid JSON body: {}", e)))
}

async fn unknown_route(Negotiated(format): Negotiated, uri: Uri) -> HttpError {
    HttpError::new(TodoManagerError::UnknownRoute(uri.path().to_string()), format)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
