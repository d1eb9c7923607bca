use serde::Serialize;
use std::path::PathBuf;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

/// Credentials for the external identity provider. The provider itself is
/// opaque: it authenticates a user and hands back a stable id.
#[derive(Debug, Clone, Serialize)]
pub struct OAuthConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Root of the per-(identity, game) save-data tree.
    pub data_root: PathBuf,
    /// Directory holding the static catalog partition files.
    pub catalog_dir: PathBuf,
    /// Optional directory with the frontend shell; without it the server
    /// renders a minimal landing page.
    pub static_dir: Option<PathBuf>,
    #[serde(skip_serializing)]
    pub session_secret: String,
    pub oauth: Option<OAuthConfig>,
    /// Test-only: resolve unauthenticated callers to the guest identity
    /// instead of rejecting them.
    pub bypass_auth: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_root: PathBuf::from("save-data"),
            catalog_dir: PathBuf::from("data"),
            static_dir: None,
            session_secret: String::new(),
            oauth: None,
            bypass_auth: false,
        }
    }
}

pub fn validate_startup_config_contract(config: &ServerConfig) -> Result<(), String> {
    if !config.bypass_auth && config.session_secret.is_empty() {
        return Err("session secret is required unless bypass_auth is enabled".to_string());
    }
    if let Some(oauth) = &config.oauth {
        if oauth.client_id.is_empty() || oauth.client_secret.is_empty() {
            return Err("oauth client id and secret must both be set".to_string());
        }
        if oauth.callback_url.is_empty() {
            return Err("oauth callback url must be set".to_string());
        }
    }
    if config.catalog_dir.as_os_str().is_empty() {
        return Err("catalog dir must be set".to_string());
    }
    Ok(())
}
