//! Structured logging to stderr and per-request correlation ids.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use crate::config::LogFormat;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Installs the global subscriber. Stdout stays free for CLI JSON output.
pub fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cohort=debug,tower_http=debug"));

    let json = (format == LogFormat::Json)
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let pretty = (format == LogFormat::Pretty).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(pretty)
        .init();
}

/// Tags every request with an `x-request-id` (the caller's, or a fresh
/// UUID), runs the handler inside a span carrying it, and echoes it back.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri().path()
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
