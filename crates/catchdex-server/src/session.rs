// SPDX-License-Identifier: Apache-2.0

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use catchdex_model::UserId;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "catchdex_session";
const SESSION_VERSION_V1: &str = "v1";
const MAX_TOKEN_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionErrorCode {
    InvalidFormat,
    UnsupportedVersion,
    InvalidSignature,
    InvalidPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub code: SessionErrorCode,
    pub message: String,
}

impl SessionError {
    #[must_use]
    pub fn new(code: SessionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for SessionError {}

/// Signed session payload: the provider's stable id plus a display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionPayload {
    #[serde(default = "session_version_v1")]
    pub session_version: String,
    pub user_id: UserId,
    pub display_name: String,
}

fn session_version_v1() -> String {
    SESSION_VERSION_V1.to_string()
}

impl SessionPayload {
    #[must_use]
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            session_version: session_version_v1(),
            user_id,
            display_name: display_name.into(),
        }
    }
}

pub fn encode_session(payload: &SessionPayload, secret: &[u8]) -> Result<String, SessionError> {
    let payload_bytes = serde_json::to_vec(payload)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidPayload, e.to_string()))?;
    let payload_part = URL_SAFE_NO_PAD.encode(payload_bytes);
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidPayload, e.to_string()))?;
    mac.update(payload_part.as_bytes());
    let sig_part = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{SESSION_VERSION_V1}.{payload_part}.{sig_part}"))
}

pub fn decode_session(token: &str, secret: &[u8]) -> Result<SessionPayload, SessionError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(SessionError::new(
            SessionErrorCode::InvalidFormat,
            "session token exceeds max length",
        ));
    }
    let mut parts = token.splitn(3, '.');
    let (version, payload_part, sig_part) = match (parts.next(), parts.next(), parts.next()) {
        (Some(v), Some(p), Some(s)) if !p.is_empty() && !s.is_empty() => (v, p, s),
        _ => {
            return Err(SessionError::new(
                SessionErrorCode::InvalidFormat,
                "session token must have three parts",
            ))
        }
    };
    if version != SESSION_VERSION_V1 {
        return Err(SessionError::new(
            SessionErrorCode::UnsupportedVersion,
            "session version unsupported",
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidPayload, e.to_string()))?;
    mac.update(payload_part.as_bytes());
    let expected = URL_SAFE_NO_PAD
        .decode(sig_part)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidFormat, e.to_string()))?;
    mac.verify_slice(&expected).map_err(|_| {
        SessionError::new(
            SessionErrorCode::InvalidSignature,
            "session signature mismatch",
        )
    })?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidFormat, e.to_string()))?;
    serde_json::from_slice(&payload_bytes)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidPayload, e.to_string()))
}

/// Extracts the session token from a Cookie header value.
#[must_use]
pub fn session_token_from_cookies(cookie_header: &str) -> Option<&str> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

#[must_use]
pub fn session_set_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

#[must_use]
pub fn session_clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
