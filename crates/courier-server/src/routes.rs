use axum::Router;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;

/// Exact health payload.
pub const HEALTH_BODY: &str = r#"{"status": "OK"}"#;

/// Build the router.
///
/// Only `GET` (and the implied `HEAD`) is routed on `/health`; every other
/// method gets axum's empty-bodied `405 Method Not Allowed`.
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

pub async fn health() -> impl IntoResponse {
    tracing::debug!(service = "health-check", "health check");
    ([(header::CONTENT_TYPE, "application/json")], HEALTH_BODY)
}
