// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Error taxonomy of the collection service. A missing caught record is NOT
/// in this list: absence is the normal empty state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ApiErrorCode {
    Unauthorized,
    MalformedInput,
    NotFound,
    StorageFailure,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::MalformedInput => "malformed_input",
            Self::NotFound => "not_found",
            Self::StorageFailure => "storage_failure",
            Self::Internal => "internal_error",
        }
    }

    /// HTTP status the code maps to at the boundary.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::MalformedInput => 422,
            Self::NotFound => 404,
            Self::StorageFailure | Self::Internal => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: "req-unknown".to_string(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(
            ApiErrorCode::Unauthorized,
            "no resolved identity",
            json!({}),
        )
    }

    #[must_use]
    pub fn missing_field(name: &str) -> Self {
        Self::new(
            ApiErrorCode::MalformedInput,
            format!("missing field: {name}"),
            json!({"field": name}),
        )
    }

    #[must_use]
    pub fn invalid_field(name: &str, reason: &str) -> Self {
        Self::new(
            ApiErrorCode::MalformedInput,
            format!("invalid field: {name}"),
            json!({"field": name, "reason": reason}),
        )
    }

    #[must_use]
    pub fn storage_failure(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::StorageFailure, message, json!({}))
    }
}
