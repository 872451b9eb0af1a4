//! HTTP server — axum router over the engine and shutdown gate.
//!
//! Status mapping is part of the API contract: engine and resolver
//! failures map to 403 (historic choice, kept for client compatibility),
//! undecodable or incomplete requests to 400, and any request arriving
//! while the gate is draining to 503 without touching the filesystem.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::{error, info};

use super::types::*;
use crate::engine::{MatchGroup, Pattern, SearchEngine, SearchQuery, flatten};
use crate::shutdown::ShutdownGate;

/// Shared state accessible to all route handlers.
pub struct ApiState {
    pub engine: SearchEngine,
    pub gate: Arc<ShutdownGate>,
    /// How long the `/wait` demo endpoint blocks.
    pub wait_delay: Duration,
}

const INSTRUCTIONS_HINT: &str = "please refer to /api/v1/web for instructions";

/// Build the axum router with all routes.
pub fn router(state: Arc<ApiState>) -> axum::Router {
    axum::Router::new()
        .route("/", get(handle_root))
        .route("/wait", get(handle_wait))
        .route("/api/v1/web", get(handle_instructions))
        .route(
            "/api/v1/json",
            post(handle_api_json).get(handle_api_json_wrong_method),
        )
        .fallback(handle_not_found)
        .with_state(state)
}

/// Start the HTTP server on the given listener.
///
/// Runs until the shutdown gate reports terminated, i.e. the grace period
/// after a termination signal has fully elapsed.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ApiState>,
) -> Result<(), std::io::Error> {
    let gate = state.gate.clone();
    info!(addr = %listener.local_addr()?, "grepd listening");

    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            gate.terminated().await;
            info!("server shutting down");
        })
        .await
}

// ── Route handlers ──────────────────────────────────────────────────────

async fn handle_root() -> &'static str {
    "Hello"
}

async fn handle_wait(State(state): State<Arc<ApiState>>) -> Response {
    if state.gate.is_draining() {
        return draining_response("/wait");
    }
    tokio::time::sleep(state.wait_delay).await;
    "DONE".into_response()
}

async fn handle_instructions() -> Html<&'static str> {
    Html(INSTRUCTIONS_PAGE)
}

async fn handle_api_json(State(state): State<Arc<ApiState>>, body: Bytes) -> Response {
    if state.gate.is_draining() {
        return draining_response("/api/v1/json");
    }

    let request: ApiRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "API keys not recognized".to_string(),
                "/api/v1/json",
            );
        }
    };

    let (query, flat) = match build_query(request) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match state.engine.search(&query).await {
        Ok(groups) => {
            let results: Vec<String> = if flat && !groups.is_empty() {
                vec![flatten(&groups)]
            } else {
                groups.iter().map(MatchGroup::as_text).collect()
            };
            (
                StatusCode::OK,
                Json(SearchResponse {
                    count: results.len(),
                    results,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(StatusCode::FORBIDDEN, e.to_string(), "/api/v1/json"),
    }
}

async fn handle_api_json_wrong_method() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method not allowed for this API, {INSTRUCTIONS_HINT}"),
        "/api/v1/json",
    )
}

async fn handle_not_found(uri: Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("The URL specified is not correct, {INSTRUCTIONS_HINT}"),
        uri.path(),
    )
}

// ── Request translation ─────────────────────────────────────────────────

/// Translate a wire request into an engine query plus the adapter-level
/// flat-output flag.
fn build_query(request: ApiRequest) -> Result<(SearchQuery, bool), Response> {
    match request {
        ApiRequest::All => Ok((SearchQuery::match_all(), false)),
        ApiRequest::Search(params) => {
            if params.term.is_empty() {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "API keys not recognized".to_string(),
                    "/api/v1/json",
                ));
            }
            let pattern = if params.regex {
                Pattern::Regex(params.term)
            } else {
                Pattern::Literal(params.term)
            };
            let query = SearchQuery {
                pattern,
                source: params.dictionary,
                limit: params.nresults,
                before: params.n_before,
                after: params.n_after,
            };
            Ok((query, params.flat))
        }
    }
}

fn draining_response(path: &str) -> Response {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        "Server shutting down...".to_string(),
        path,
    )
}

fn error_response(status: StatusCode, message: String, path: &str) -> Response {
    error!(status = status.as_u16(), path, %message, "request failed");
    (
        status,
        Json(ErrorBody {
            code: status.as_u16(),
            message,
        }),
    )
        .into_response()
}

const INSTRUCTIONS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>grepd API v1</title></head>
<body>
<h1>grepd API v1</h1>
<p>Line-oriented text search over the server's library of plain-text files.</p>

<h2>POST /api/v1/json</h2>
<p>JSON body with an <code>action</code> field:</p>
<ul>
  <li><code>{"action": "all"}</code> — return every line of the default source.</li>
  <li><code>{"action": "search", "term": "..."}</code> — search for a term. Optional fields:
    <ul>
      <li><code>dictionary</code> — source file name within the library.</li>
      <li><code>nresults</code> — maximum number of result groups.</li>
      <li><code>n_before</code>, <code>n_after</code> — context lines around each match.</li>
      <li><code>regex</code> — treat <code>term</code> as a regular expression.</li>
      <li><code>flat</code> — return all result groups as one string,
          separated by <code>___</code> (legacy format).</li>
    </ul>
  </li>
</ul>
<p>Response: <code>{"count": N, "results": ["...", ...]}</code>. Each result is one
match with its context lines, newline-joined.</p>

<h2>Statuses</h2>
<ul>
  <li>200 — success, including zero matches.</li>
  <li>400 — malformed request or missing <code>term</code>.</li>
  <li>403 — unknown dictionary, unreadable source, or invalid regex.</li>
  <li>405 — wrong HTTP method on this endpoint.</li>
  <li>503 — server is draining toward shutdown.</li>
</ul>

<h2>Other endpoints</h2>
<ul>
  <li><code>GET /</code> — liveness check.</li>
  <li><code>GET /wait</code> — long-running demo request.</li>
</ul>
</body>
</html>
"#;
