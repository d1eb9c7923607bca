// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const USER_ID_MAX_LEN: usize = 128;

const GUEST: &str = "guest";

/// Opaque stable identity string issued by the external provider. User ids
/// address storage directories, so path-hostile characters are rejected at
/// parse time. The reserved `guest` sentinel identifies unauthenticated
/// access and is isolated from every authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct UserId(String);

impl UserId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("user_id"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("user_id"));
        }
        if input.len() > USER_ID_MAX_LEN {
            return Err(ParseError::TooLong("user_id", USER_ID_MAX_LEN));
        }
        if input.contains('/') || input.contains('\\') || input.contains("..") {
            return Err(ParseError::InvalidFormat(
                "user_id must not contain path separators",
            ));
        }
        Ok(Self(input.to_string()))
    }

    /// Fixed sentinel identity for unauthenticated access.
    #[must_use]
    pub fn guest() -> Self {
        Self(GUEST.to_string())
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.0 == GUEST
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_hostile_ids() {
        assert!(UserId::parse("a/b").is_err());
        assert!(UserId::parse("a\\b").is_err());
        assert!(UserId::parse("..").is_err());
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse(" padded ").is_err());
    }

    #[test]
    fn guest_is_a_distinct_reserved_identity() {
        let guest = UserId::guest();
        assert!(guest.is_guest());
        assert_eq!(guest.as_str(), "guest");
        let user = UserId::parse("108234").expect("user id");
        assert!(!user.is_guest());
        assert_ne!(user, guest);
    }
}
