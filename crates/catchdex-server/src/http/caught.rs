// SPDX-License-Identifier: Apache-2.0

use crate::http::handlers::{
    api_error_response, propagated_request_id, resolve_identity, with_request_id,
};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catchdex_api::{ApiError, ApiErrorCode, CaughtAck, CaughtUpsert};
use catchdex_model::GameKey;
use catchdex_store::StoreError;
use serde_json::json;
use std::time::Instant;
use tracing::{info, warn};

const GET_ROUTE: &str = "GET /caught/{game}";
const POST_ROUTE: &str = "POST /caught/{game}";

fn parse_game(raw: &str, request_id: &str) -> Result<GameKey, ApiError> {
    GameKey::parse(raw).map_err(|e| {
        ApiError::new(
            ApiErrorCode::NotFound,
            "unknown game",
            json!({"game": raw, "reason": e.to_string()}),
        )
        .with_request_id(request_id.to_string())
    })
}

fn storage_error(err: &StoreError, request_id: &str) -> ApiError {
    ApiError::storage_failure(err.to_string()).with_request_id(request_id.to_string())
}

pub(crate) async fn caught_get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game): Path<String>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let result = async {
        let game = parse_game(&game, &request_id)?;
        let session = resolve_identity(&headers, &state)
            .map_err(|e| e.with_request_id(request_id.clone()))?;

        let store = state.store.clone();
        let user = session.user_id.clone();
        let record = tokio::task::spawn_blocking(move || store.read(&user, game))
            .await
            .map_err(|e| {
                ApiError::new(
                    ApiErrorCode::Internal,
                    "store task failed",
                    json!({"message": e.to_string()}),
                )
                .with_request_id(request_id.clone())
            })?
            .map_err(|e| storage_error(&e, &request_id))?;
        Ok::<Response, ApiError>(Json(record).into_response())
    }
    .await;

    let resp = result.unwrap_or_else(api_error_response);
    let status = resp.status();
    state
        .metrics
        .observe_request(GET_ROUTE, status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn caught_post_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game): Path<String>,
    body: Result<Json<CaughtUpsert>, JsonRejection>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let result = async {
        let game = parse_game(&game, &request_id)?;
        let session = resolve_identity(&headers, &state)
            .map_err(|e| e.with_request_id(request_id.clone()))?;

        // Validation happens before any store access.
        let Json(upsert) = body.map_err(|rejection| {
            ApiError::new(
                ApiErrorCode::MalformedInput,
                "request body is not valid json",
                json!({"message": rejection.body_text()}),
            )
            .with_request_id(request_id.clone())
        })?;
        let validated = upsert
            .validate()
            .map_err(|e| e.with_request_id(request_id.clone()))?;

        info!(
            request_id = %request_id,
            user = %session.user_id,
            game = %game,
            species = %validated.species_key,
            caught = validated.caught,
            "caught upsert"
        );

        let store = state.store.clone();
        let user = session.user_id.clone();
        tokio::task::spawn_blocking(move || {
            store.write(&user, game, &validated.species_key, validated.caught)
        })
        .await
        .map_err(|e| {
            ApiError::new(
                ApiErrorCode::Internal,
                "store task failed",
                json!({"message": e.to_string()}),
            )
            .with_request_id(request_id.clone())
        })?
        .map_err(|e| {
            warn!(request_id = %request_id, "caught write failed: {e}");
            storage_error(&e, &request_id)
        })?;

        Ok::<Response, ApiError>(Json(CaughtAck::saved(game)).into_response())
    }
    .await;

    let resp = result.unwrap_or_else(api_error_response);
    let status = resp.status();
    state
        .metrics
        .observe_request(POST_ROUTE, status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}
