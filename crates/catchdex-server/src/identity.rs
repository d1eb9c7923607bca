// SPDX-License-Identifier: Apache-2.0

use crate::config::OAuthConfig;
use async_trait::async_trait;
use catchdex_model::UserId;
use serde::Deserialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderErrorCode {
    NotConfigured,
    Exchange,
    Profile,
}

impl ProviderErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotConfigured => "provider_not_configured",
            Self::Exchange => "provider_exchange_failed",
            Self::Profile => "provider_profile_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    pub message: String,
}

impl ProviderError {
    #[must_use]
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ProviderError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub user_id: UserId,
    pub display_name: String,
}

/// The external identity provider, reduced to its one capability:
/// authenticate a user and hand back a stable id. Everything else about the
/// provider is opaque to this service.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Where to send the browser to start a login.
    fn authorize_url(&self) -> Result<String, ProviderError>;

    /// Completes the login from the provider's callback code.
    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, ProviderError>;
}

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserinfoResponse {
    sub: String,
    #[serde(default)]
    name: Option<String>,
}

/// Google OAuth delegation over reqwest.
pub struct GoogleProvider {
    oauth: OAuthConfig,
    client: reqwest::Client,
}

impl GoogleProvider {
    #[must_use]
    pub fn new(oauth: OAuthConfig) -> Self {
        Self {
            oauth,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self) -> Result<String, ProviderError> {
        Ok(format!(
            "{AUTHORIZE_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20profile",
            self.oauth.client_id, self.oauth.callback_url
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, ProviderError> {
        let token: TokenResponse = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("redirect_uri", self.oauth.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorCode::Exchange, e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::new(ProviderErrorCode::Exchange, e.to_string()))?
            .json()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorCode::Exchange, e.to_string()))?;

        let info: UserinfoResponse = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(token.access_token)
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorCode::Profile, e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::new(ProviderErrorCode::Profile, e.to_string()))?
            .json()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorCode::Profile, e.to_string()))?;

        let user_id = UserId::parse(&info.sub)
            .map_err(|e| ProviderError::new(ProviderErrorCode::Profile, e.to_string()))?;
        Ok(ProviderProfile {
            display_name: info.name.unwrap_or_else(|| user_id.to_string()),
            user_id,
        })
    }
}

/// Stand-in provider when no credentials are configured: login cannot start.
#[derive(Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl IdentityProvider for UnconfiguredProvider {
    fn authorize_url(&self) -> Result<String, ProviderError> {
        Err(ProviderError::new(
            ProviderErrorCode::NotConfigured,
            "identity provider credentials are not configured",
        ))
    }

    async fn exchange_code(&self, _code: &str) -> Result<ProviderProfile, ProviderError> {
        Err(ProviderError::new(
            ProviderErrorCode::NotConfigured,
            "identity provider credentials are not configured",
        ))
    }
}

/// Deterministic provider for harnesses: every code resolves to a fixed user.
pub struct FakeProvider {
    pub profile: ProviderProfile,
}

impl FakeProvider {
    #[must_use]
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            profile: ProviderProfile {
                user_id,
                display_name: display_name.into(),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorize_url(&self) -> Result<String, ProviderError> {
        Ok("/identity/callback?code=fake".to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, ProviderError> {
        if code.is_empty() {
            return Err(ProviderError::new(
                ProviderErrorCode::Exchange,
                "empty authorization code",
            ));
        }
        Ok(self.profile.clone())
    }
}
