//! Local HTTP listener for browser-triggered captures.
//!
//! One route: `POST /capture`. The caller is a browser extension firing on a
//! keyboard shortcut, so responses carry permissive CORS headers and the
//! listener binds to loopback only. Each request is a single synchronous
//! grab-and-write, run on a blocking thread off the async executor.

use crate::capture::{self, ScreenGrabber};
use crate::session::SharedSession;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Fixed local port the browser extensions are hardcoded against.
pub const LISTEN_PORT: u16 = 5000;

pub fn listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], LISTEN_PORT))
}

/// Shared state handed to every request: the mode/folder session plus the
/// screen-grab implementation.
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub grabber: Arc<dyn ScreenGrabber>,
}

#[derive(Debug, Default, Deserialize)]
struct CaptureRequest {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CaptureSuccess {
    success: bool,
    filepath: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct CaptureFailure {
    success: bool,
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/capture", post(handle_capture))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Binds the listener and serves until the process exits.
pub async fn run(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Capture listener on http://{addr}");
    axum::serve(listener, router(state).into_make_service()).await
}

async fn handle_capture(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = request_url(&headers, &body);

    // Take a snapshot of the target directory, then drop the lock before the
    // grab — capture can take long enough that the panel must stay responsive.
    let dir = match state.session.lock() {
        Ok(mut session) => session.resolve_capture_dir(),
        Err(e) => {
            log::error!("Session state poisoned: {e}");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "session state unavailable");
        }
    };

    let grabber = state.grabber.clone();
    let request_url = url.clone();
    let saved =
        tokio::task::spawn_blocking(move || capture::save_capture(grabber.as_ref(), &dir, &request_url))
            .await;

    match saved {
        Ok(Ok(path)) => (
            StatusCode::OK,
            Json(CaptureSuccess {
                success: true,
                filepath: path.to_string_lossy().into_owned(),
                url,
            }),
        )
            .into_response(),
        Ok(Err(e)) => {
            log::error!("Capture for {url:?} failed: {e}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(e) => {
            log::error!("Capture task for {url:?} panicked: {e}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "capture task failed")
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(CaptureFailure {
            success: false,
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Pulls the page URL out of the request body. The extensions send JSON, but
/// form-encoded bodies are accepted too; anything missing or empty becomes
/// `"unknown"`.
fn request_url(headers: &HeaderMap, body: &[u8]) -> String {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let request = if content_type.starts_with("application/json") {
        serde_json::from_slice::<CaptureRequest>(body).unwrap_or_default()
    } else {
        CaptureRequest {
            url: form_urlencoded::parse(body)
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value.into_owned()),
        }
    };

    request
        .url
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderValue;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn json_body_url_is_extracted() {
        let url = request_url(&json_headers(), br#"{"url": "https://example.com/a"}"#);
        assert_eq!(url, "https://example.com/a");
    }

    #[test]
    fn form_body_url_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let url = request_url(&headers, b"url=https%3A%2F%2Fexample.com%2Fa&extra=1");
        assert_eq!(url, "https://example.com/a");
    }

    #[test]
    fn missing_or_empty_url_defaults_to_unknown() {
        assert_eq!(request_url(&json_headers(), b"{}"), "unknown");
        assert_eq!(request_url(&json_headers(), br#"{"url": ""}"#), "unknown");
        assert_eq!(request_url(&HeaderMap::new(), b""), "unknown");
    }

    #[test]
    fn malformed_json_defaults_to_unknown() {
        assert_eq!(request_url(&json_headers(), b"{ nope"), "unknown");
    }
}
