//! State Service HTTP API.

use std::net::SocketAddr;
use std::net::ToSocketAddrs;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::adapters::http::DelayResponse;
use crate::adapters::http::ErrorResponse;
use crate::adapters::http::HealthResponse;
use crate::adapters::http::body_rejected_reply;
use crate::adapters::http::decode_write_body;
use crate::adapters::http::method_not_allowed_reply;
use crate::adapters::http::service_error_reply;
use crate::domain::DelayBounds;
use crate::infra::InMemoryDelayStore;
use crate::infra::ServerConfig;
use crate::infra::SystemClock;
use crate::usecases::ReadDelayUseCase;
use crate::usecases::ReadDelayUseCaseImpl;
use crate::usecases::WriteDelayUseCase;
use crate::usecases::WriteDelayUseCaseImpl;
use crate::usecases::ports::Clock;
use crate::usecases::ports::DelayServiceError;
use crate::usecases::ports::DelayStore;

mod error;
pub use error::ServerError;

const API_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);
const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const CORS_ALLOW_HEADERS: &str = "Content-Type";
const UI_INDEX_HTML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/web/index.html"
));
const UI_APP_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/web/app.js"));

/// Shared handler state. The delay itself lives in the store behind the
/// use cases; nothing here is global.
pub struct ApiState {
    read: Arc<dyn ReadDelayUseCase>,
    write: Arc<dyn WriteDelayUseCase>,
    clock: Arc<dyn Clock>,
    started: Instant,
}

impl ApiState {
    pub fn new(store: Arc<dyn DelayStore>, clock: Arc<dyn Clock>) -> Self {
        let bounds = DelayBounds::STANDARD;
        Self {
            read: Arc::new(ReadDelayUseCaseImpl::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                bounds,
            )),
            write: Arc::new(WriteDelayUseCaseImpl::new(store, Arc::clone(&clock), bounds)),
            started: clock.now(),
            clock,
        }
    }
}

pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn base_url(&self) -> String {
        format_http_url(&self.local_addr)
    }

    /// Stops accepting connections and waits briefly for in-flight requests.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        let _ = self.shutdown_tx.send(true);
        self.join_with_timeout().await
    }

    /// Waits until `shutdown` resolves, then stops the server.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: std::future::Future<Output = ()>,
    {
        let mut join = self.join;
        tokio::select! {
            result = &mut join => flatten_join(result),
            () = shutdown => {
                info!("Shutdown requested");
                let _ = self.shutdown_tx.send(true);
                match tokio::time::timeout(API_SHUTDOWN_TIMEOUT, &mut join).await {
                    Ok(result) => flatten_join(result),
                    Err(_) => {
                        warn!(
                            timeout_ms = API_SHUTDOWN_TIMEOUT.as_millis(),
                            "API server shutdown timed out; aborting"
                        );
                        join.abort();
                        Ok(())
                    }
                }
            }
        }
    }

    async fn join_with_timeout(self) -> Result<(), ServerError> {
        let mut join = self.join;
        match tokio::time::timeout(API_SHUTDOWN_TIMEOUT, &mut join).await {
            Ok(result) => flatten_join(result),
            Err(_) => {
                warn!(
                    timeout_ms = API_SHUTDOWN_TIMEOUT.as_millis(),
                    "API server shutdown timed out; aborting"
                );
                join.abort();
                Ok(())
            }
        }
    }
}

fn flatten_join(
    result: Result<Result<(), ServerError>, tokio::task::JoinError>,
) -> Result<(), ServerError> {
    match result {
        Ok(inner) => inner,
        Err(err) => {
            error!(error = %err, "API server task failed");
            Err(ServerError::Task(err.to_string()))
        }
    }
}

/// Starts a server with a fresh in-memory store.
pub async fn start_api_server(config: &ServerConfig) -> Result<ServerHandle, ServerError> {
    let store: Arc<dyn DelayStore> = Arc::new(InMemoryDelayStore::new(config.initial()));
    spawn_server(config, store, Arc::new(SystemClock::new())).await
}

pub async fn spawn_server(
    config: &ServerConfig,
    store: Arc<dyn DelayStore>,
    clock: Arc<dyn Clock>,
) -> Result<ServerHandle, ServerError> {
    let listener = bind_listener(config.listen()).await?;
    let local_addr = listener.local_addr().map_err(|source| ServerError::Io {
        operation: "read local address",
        source,
    })?;

    let state = Arc::new(ApiState::new(store, clock));
    let app = build_router(state, config.max_body_bytes());
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    info!(
        url = %format_http_url(&local_addr),
        initial = config.initial().get(),
        "API server listening"
    );
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .await
            .map_err(|source| ServerError::Io {
                operation: "serve",
                source,
            })
    });

    Ok(ServerHandle {
        local_addr,
        shutdown_tx,
        join,
    })
}

pub fn build_router(state: Arc<ApiState>, max_body_bytes: usize) -> axum::Router {
    // An explicit HEAD route stops GET from answering HEAD.
    let delay_routes = get(read_delay_handler)
        .head(method_not_allowed_handler)
        .post(write_delay_handler)
        .options(preflight_handler)
        .fallback(method_not_allowed_handler);

    axum::Router::new()
        .route("/", get(ui_index_handler))
        .route("/app.js", get(ui_app_js_handler))
        .route("/healthz", get(health_handler))
        .route("/api/delay", delay_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ui_index_handler() -> Html<&'static str> {
    Html(UI_INDEX_HTML)
}

async fn ui_app_js_handler() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        UI_APP_JS,
    )
        .into_response()
}

async fn health_handler(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_ms: state.clock.elapsed_ms(state.started),
    })
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed_handler() -> Response {
    let (status, body) = method_not_allowed_reply();
    (status, Json(body)).into_response()
}

async fn read_delay_handler(State(state): State<Arc<ApiState>>) -> Response {
    match state.read.execute() {
        Ok(snapshot) => Json(DelayResponse::read(&snapshot)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn write_delay_handler(
    State(state): State<Arc<ApiState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected delay write body");
            let (status, body) = body_rejected_reply(rejection.status(), rejection.body_text());
            return (status, Json(body)).into_response();
        }
    };
    match decode_write_body(&body).and_then(|input| state.write.execute(input)) {
        Ok(output) => Json(DelayResponse::written(&output.snapshot)).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &DelayServiceError) -> Response {
    if err.is_validation() {
        warn!(error = %err, "Rejected delay write");
    } else {
        error!(error = %err, "Delay request failed");
    }
    let (status, body): (StatusCode, ErrorResponse) = service_error_reply(err);
    (status, Json(body)).into_response()
}

async fn bind_listener(listen: &str) -> Result<TcpListener, ServerError> {
    let mut addrs = listen
        .to_socket_addrs()
        .map_err(|e| ServerError::InvalidListen {
            message: format!("{listen}: {e}"),
        })?;
    let addr = addrs.next().ok_or_else(|| ServerError::InvalidListen {
        message: format!("{listen}: no resolved address"),
    })?;
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Io {
            operation: "bind",
            source,
        })
}

fn format_http_url(addr: &SocketAddr) -> String {
    let host = match addr.ip() {
        std::net::IpAddr::V4(ip) => ip.to_string(),
        std::net::IpAddr::V6(ip) => format!("[{ip}]"),
    };
    format!("http://{}:{}", host, addr.port())
}
