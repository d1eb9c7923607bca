#![forbid(unsafe_code)]

use catchdex_server::{
    build_router, validate_startup_config_contract, AppState, CatalogState, FakeProvider,
    GoogleProvider, IdentityProvider, OAuthConfig, ServerConfig, UnconfiguredProvider,
};
use catchdex_store::LocalFsStore;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_path(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env::var(name).unwrap_or_else(|_| default.to_string()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn config_from_env() -> ServerConfig {
    let oauth = match (
        env::var("CATCHDEX_OAUTH_CLIENT_ID").ok(),
        env::var("CATCHDEX_OAUTH_CLIENT_SECRET").ok(),
    ) {
        (Some(client_id), Some(client_secret)) => Some(OAuthConfig {
            client_id,
            client_secret,
            callback_url: env::var("CATCHDEX_OAUTH_CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:3000/identity/callback".to_string()),
        }),
        _ => None,
    };
    ServerConfig {
        port: env_u16("CATCHDEX_PORT", 3000),
        data_root: env_path("CATCHDEX_DATA_ROOT", "save-data"),
        catalog_dir: env_path("CATCHDEX_CATALOG_DIR", "data"),
        static_dir: env::var("CATCHDEX_STATIC_DIR").ok().map(PathBuf::from),
        session_secret: env::var("CATCHDEX_SESSION_SECRET").unwrap_or_default(),
        oauth,
        bypass_auth: env_bool("CATCHDEX_BYPASS_AUTH", false),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let config = config_from_env();
    validate_startup_config_contract(&config)?;

    let provider: Arc<dyn IdentityProvider> = match &config.oauth {
        Some(oauth) => Arc::new(GoogleProvider::new(oauth.clone())),
        None if config.bypass_auth => Arc::new(FakeProvider::new(
            catchdex_model::UserId::guest(),
            "Guest",
        )),
        None => Arc::new(UnconfiguredProvider),
    };

    let catalog = Arc::new(CatalogState::load(&config.catalog_dir));
    if !catalog.has_any_partition() {
        tracing::warn!(
            dir = %config.catalog_dir.display(),
            "no catalog partition loaded; views will be empty until files appear and the server restarts"
        );
    }

    let store = Arc::new(LocalFsStore::new(config.data_root.clone()));
    let port = config.port;
    let state = AppState::new(store, catalog, config, provider);
    let app = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| format!("bind failed on port {port}: {e}"))?;
    info!("catchdex-server listening on port {port}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server error: {e}"))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(_) => return,
        };
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(_) => return,
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
