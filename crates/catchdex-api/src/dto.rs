// SPDX-License-Identifier: Apache-2.0

use crate::ApiError;
use catchdex_model::{GameKey, SpeciesId, UserId};
use serde::{Deserialize, Serialize};

/// The species id as clients send it: the original frontend posts a string,
/// older clients a bare number. Both coerce to the record's string-key form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdField {
    Number(u64),
    Text(String),
}

/// Write-request body for `POST /caught/{game}`. Validation happens before
/// any store access; a body without `id` never reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct CaughtUpsert {
    #[serde(default)]
    pub id: Option<IdField>,
    #[serde(default)]
    pub caught: Option<bool>,
}

/// A validated upsert: the canonical string key plus the flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpsert {
    pub species_key: String,
    pub caught: bool,
}

impl CaughtUpsert {
    pub fn validate(&self) -> Result<ValidatedUpsert, ApiError> {
        let id = self.id.as_ref().ok_or_else(|| ApiError::missing_field("id"))?;
        let species = match id {
            IdField::Number(raw) => {
                let raw = u16::try_from(*raw)
                    .map_err(|_| ApiError::invalid_field("id", "out of range"))?;
                SpeciesId::parse(raw)
                    .map_err(|_| ApiError::invalid_field("id", "must be a positive integer"))?
            }
            IdField::Text(raw) => SpeciesId::parse_key(raw)
                .map_err(|_| ApiError::invalid_field("id", "must be a positive integer"))?,
        };
        let caught = self
            .caught
            .ok_or_else(|| ApiError::missing_field("caught"))?;
        Ok(ValidatedUpsert {
            species_key: species.as_key(),
            caught,
        })
    }
}

/// Acknowledgment for a successful write, carrying the game key it wrote to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaughtAck {
    pub success: bool,
    pub game: GameKey,
}

impl CaughtAck {
    #[must_use]
    pub fn saved(game: GameKey) -> Self {
        Self {
            success: true,
            game,
        }
    }
}

/// Public profile of the resolved identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityProfile {
    pub user_id: UserId,
    pub display_name: String,
}
