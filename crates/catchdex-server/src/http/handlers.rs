use crate::session::{decode_session, session_token_from_cookies, SessionPayload};
use crate::{AppState, CONFIG_SCHEMA_VERSION, CRATE_NAME};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{body::Body, Json};
use catchdex_api::ApiError;
use catchdex_model::UserId;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::time::Instant;

pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err }))).into_response()
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

/// Resolves the caller's identity from the signed session cookie. With the
/// test-only bypass flag, an unresolved caller becomes the guest sentinel;
/// otherwise the result is an unauthorized rejection and no store access
/// happens.
pub(crate) fn resolve_identity(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<SessionPayload, ApiError> {
    let token = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(session_token_from_cookies);
    if let Some(token) = token {
        if let Ok(payload) = decode_session(token, state.config.session_secret.as_bytes()) {
            return Ok(payload);
        }
    }
    if state.config.bypass_auth {
        return Ok(SessionPayload::new(UserId::guest(), "Guest"));
    }
    Err(ApiError::unauthorized())
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let resp = (StatusCode::OK, "ok").into_response();
    state
        .metrics
        .observe_request("/healthz", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let ready = state.ready.load(Ordering::Relaxed) && state.catalog.has_any_partition();
    let (status, body) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    };
    let resp = (status, body).into_response();
    state
        .metrics
        .observe_request("/readyz", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let payload = json!({
        "name": CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "config_schema_version": CONFIG_SCHEMA_VERSION,
    });
    let resp = Json(payload).into_response();
    state
        .metrics
        .observe_request("/version", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let snapshot = state.metrics.snapshot().await;
    with_request_id(Json(snapshot).into_response(), &request_id)
}

pub(crate) async fn landing_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let html = match &state.config.static_dir {
        Some(dir) => std::fs::read_to_string(dir.join("index.html")).ok(),
        None => None,
    };
    let html = html.unwrap_or_else(|| {
        format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>Catchdex</title></head><body>\
<h1>Catchdex</h1>\
<p>Version: <code>{}</code></p>\
<ul>\
<li><a href=\"/catalog/gen1\">/catalog/gen1</a></li>\
<li><a href=\"/catalog/gen2\">/catalog/gen2</a></li>\
<li><a href=\"/caught/red\">/caught/red</a></li>\
<li><a href=\"/identity/login\">/identity/login</a></li>\
</ul>\
</body></html>",
            env!("CARGO_PKG_VERSION")
        )
    });
    let mut resp = Response::new(Body::from(html));
    resp.headers_mut().insert(
        "content-type",
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    state
        .metrics
        .observe_request("/", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn app_js_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let body = state
        .config
        .static_dir
        .as_ref()
        .and_then(|dir| std::fs::read(dir.join("app.js")).ok());
    let resp = match body {
        Some(bytes) => {
            let mut resp = Response::new(Body::from(bytes));
            resp.headers_mut().insert(
                "content-type",
                HeaderValue::from_static("text/javascript; charset=utf-8"),
            );
            resp
        }
        None => StatusCode::NOT_FOUND.into_response(),
    };
    let status = resp.status();
    state
        .metrics
        .observe_request("/app.js", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}
