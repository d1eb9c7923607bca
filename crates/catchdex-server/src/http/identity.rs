// SPDX-License-Identifier: Apache-2.0

use crate::http::handlers::{
    api_error_response, propagated_request_id, resolve_identity, with_request_id,
};
use crate::session::{encode_session, session_clear_cookie, session_set_cookie, SessionPayload};
use crate::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use catchdex_api::{ApiError, ApiErrorCode, IdentityProfile};
use catchdex_model::UserId;
use serde_json::json;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

fn redirect_to(location: &str) -> Response {
    let mut resp = Response::new(Body::empty());
    *resp.status_mut() = StatusCode::FOUND;
    if let Ok(v) = HeaderValue::from_str(location) {
        resp.headers_mut().insert("location", v);
    }
    resp
}

fn with_set_cookie(mut resp: Response, cookie: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(cookie) {
        resp.headers_mut().insert("set-cookie", v);
    }
    resp
}

pub(crate) async fn current_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match resolve_identity(&headers, &state) {
        Ok(session) => Json(IdentityProfile {
            user_id: session.user_id,
            display_name: session.display_name,
        })
        .into_response(),
        Err(e) => api_error_response(e.with_request_id(request_id.clone())),
    };
    let status = resp.status();
    state
        .metrics
        .observe_request("/identity/current", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

/// Starts a login by delegating to the external provider. Under the
/// test-only bypass flag no provider round-trip happens: the caller gets a
/// guest session immediately.
pub(crate) async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = if state.config.bypass_auth {
        let payload = SessionPayload::new(UserId::guest(), "Guest");
        match encode_session(&payload, state.config.session_secret.as_bytes()) {
            Ok(token) => with_set_cookie(redirect_to("/"), &session_set_cookie(&token)),
            Err(e) => api_error_response(
                ApiError::new(
                    ApiErrorCode::Internal,
                    "session encoding failed",
                    json!({"message": e.to_string()}),
                )
                .with_request_id(request_id.clone()),
            ),
        }
    } else {
        match state.provider.authorize_url() {
            Ok(url) => redirect_to(&url),
            Err(e) => api_error_response(
                ApiError::new(
                    ApiErrorCode::Internal,
                    "login cannot start",
                    json!({"code": e.code.as_str(), "message": e.message}),
                )
                .with_request_id(request_id.clone()),
            ),
        }
    };
    let status = resp.status();
    state
        .metrics
        .observe_request("/identity/login", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

/// Completes the provider round-trip: exchanges the callback code for a
/// stable user id and sets the signed session cookie.
pub(crate) async fn callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let resp = match params.get("code") {
        None => api_error_response(
            ApiError::missing_field("code").with_request_id(request_id.clone()),
        ),
        Some(code) => match state.provider.exchange_code(code).await {
            Ok(profile) => {
                info!(request_id = %request_id, user = %profile.user_id, "login completed");
                let payload = SessionPayload::new(profile.user_id, profile.display_name);
                match encode_session(&payload, state.config.session_secret.as_bytes()) {
                    Ok(token) => with_set_cookie(redirect_to("/"), &session_set_cookie(&token)),
                    Err(e) => api_error_response(
                        ApiError::new(
                            ApiErrorCode::Internal,
                            "session encoding failed",
                            json!({"message": e.to_string()}),
                        )
                        .with_request_id(request_id.clone()),
                    ),
                }
            }
            Err(e) => {
                warn!(request_id = %request_id, "provider exchange failed: {e}");
                api_error_response(
                    ApiError::new(
                        ApiErrorCode::Unauthorized,
                        "identity provider rejected the login",
                        json!({"code": e.code.as_str(), "message": e.message}),
                    )
                    .with_request_id(request_id.clone()),
                )
            }
        },
    };
    let status = resp.status();
    state
        .metrics
        .observe_request("/identity/callback", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

/// Clears the session and redirects, regardless of anything the provider
/// might think about it.
pub(crate) async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = with_set_cookie(redirect_to("/"), &session_clear_cookie());
    state
        .metrics
        .observe_request("/identity/logout", StatusCode::FOUND, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}
