// SPDX-License-Identifier: Apache-2.0

use crate::http::handlers::{api_error_response, propagated_request_id, with_request_id};
use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use catchdex_api::{ApiError, ApiErrorCode};
use catchdex_model::Generation;
use serde_json::json;
use std::time::Instant;

pub(crate) async fn catalog_gen1_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    serve_partition(state, headers, Generation::One, "/catalog/gen1").await
}

pub(crate) async fn catalog_gen2_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    serve_partition(state, headers, Generation::Two, "/catalog/gen2").await
}

/// Serves one partition byte-identically to the file on disk. A partition
/// that failed to load is absent on its own; the sibling partition keeps
/// serving.
async fn serve_partition(
    state: AppState,
    headers: HeaderMap,
    generation: Generation,
    route: &'static str,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match state.catalog.raw_partition(generation) {
        Some(bytes) => {
            let mut resp = Response::new(Body::from(bytes.to_vec()));
            resp.headers_mut().insert(
                "content-type",
                HeaderValue::from_static("application/json"),
            );
            resp
        }
        None => api_error_response(
            ApiError::new(
                ApiErrorCode::NotFound,
                "catalog partition unavailable",
                json!({"generation": generation}),
            )
            .with_request_id(request_id.clone()),
        ),
    };
    let status = resp.status();
    state
        .metrics
        .observe_request(route, status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}
