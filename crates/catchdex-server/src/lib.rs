#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use catchdex_store::CaughtStateStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

mod catalog;
mod config;
mod http;
mod identity;
mod session;

pub use catalog::{CatalogState, GEN1_FILE, GEN2_FILE};
pub use config::{validate_startup_config_contract, OAuthConfig, ServerConfig, CONFIG_SCHEMA_VERSION};
pub use identity::{
    FakeProvider, GoogleProvider, IdentityProvider, ProviderError, ProviderErrorCode,
    ProviderProfile, UnconfiguredProvider,
};
pub use session::{
    decode_session, encode_session, session_clear_cookie, session_set_cookie,
    session_token_from_cookies, SessionError, SessionErrorCode, SessionPayload, SESSION_COOKIE,
};

pub const CRATE_NAME: &str = "catchdex-server";

const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Default)]
pub(crate) struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        latency_map
            .entry(route.to_string())
            .or_default()
            .push(latency.as_nanos() as u64);
    }

    pub(crate) async fn snapshot(&self) -> serde_json::Value {
        let counts = self.counts.lock().await;
        let mut requests = serde_json::Map::new();
        let mut sorted: Vec<(&(String, u16), &u64)> = counts.iter().collect();
        sorted.sort();
        for ((route, status), count) in sorted {
            requests.insert(format!("{route}|{status}"), serde_json::json!(count));
        }
        drop(counts);

        let latency_map = self.latency_ns.lock().await;
        let mut latency = serde_json::Map::new();
        for (route, samples) in latency_map.iter() {
            if samples.is_empty() {
                continue;
            }
            let mut sorted = samples.clone();
            sorted.sort_unstable();
            let p95 = sorted[((sorted.len() as f64 * 0.95).ceil() as usize - 1).min(sorted.len() - 1)];
            latency.insert(
                route.clone(),
                serde_json::json!({
                    "samples": sorted.len(),
                    "p95_ms": p95 as f64 / 1_000_000.0,
                }),
            );
        }
        serde_json::json!({ "requests": requests, "latency": latency })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CaughtStateStore>,
    pub catalog: Arc<CatalogState>,
    pub config: Arc<ServerConfig>,
    pub provider: Arc<dyn IdentityProvider>,
    pub ready: Arc<AtomicBool>,
    pub(crate) metrics: Arc<RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn CaughtStateStore>,
        catalog: Arc<CatalogState>,
        config: ServerConfig,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            store,
            catalog,
            config: Arc::new(config),
            provider,
            ready: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::landing_handler))
        .route("/app.js", get(http::handlers::app_js_handler))
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/version", get(http::handlers::version_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route("/catalog/gen1", get(http::catalog::catalog_gen1_handler))
        .route("/catalog/gen2", get(http::catalog::catalog_gen2_handler))
        .route(
            "/caught/:game",
            get(http::caught::caught_get_handler).post(http::caught::caught_post_handler),
        )
        .route("/identity/current", get(http::identity::current_handler))
        .route("/identity/login", get(http::identity::login_handler))
        .route("/identity/callback", get(http::identity::callback_handler))
        .route("/identity/logout", get(http::identity::logout_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
