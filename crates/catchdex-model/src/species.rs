// SPDX-License-Identifier: Apache-2.0

use crate::{GameKey, Generation, ParseError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const NAME_MAX_LEN: usize = 64;
pub const SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/";

/// National-dex number. Positive; its decimal string form is the canonical
/// key in persisted caught records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct SpeciesId(u16);

impl SpeciesId {
    pub fn parse(raw: u16) -> Result<Self, ParseError> {
        if raw == 0 {
            return Err(ParseError::InvalidFormat("species id must be >= 1"));
        }
        Ok(Self(raw))
    }

    /// Parses the string-key form found in persisted records and write bodies.
    pub fn parse_key(raw: &str) -> Result<Self, ParseError> {
        let value = raw
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat("species id must be a positive integer"))?;
        Self::parse(value)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Canonical persisted map key.
    #[must_use]
    pub fn as_key(self) -> String {
        self.0.to_string()
    }

    #[must_use]
    pub fn sprite_url(self) -> String {
        format!("{SPRITE_BASE_URL}{}.png", self.0)
    }
}

impl Display for SpeciesId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where (and whether) a species can be obtained in one game. After catalog
/// normalization every (species, game) pair has a populated entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct AvailabilityInfo {
    pub catchable: bool,
    pub locations: Vec<String>,
    pub note: Option<String>,
}

impl AvailabilityInfo {
    #[must_use]
    pub fn new(catchable: bool, locations: Vec<String>, note: Option<String>) -> Self {
        Self {
            catchable,
            locations,
            note,
        }
    }

    /// Entry synthesized for games the source data says nothing about.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            catchable: false,
            locations: Vec::new(),
            note: Some("Data pending.".to_string()),
        }
    }

    /// Human-readable catch info for the detail view: locations first, then
    /// the note, with the source's fallback wording when both are absent.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut info = String::new();
        if !self.locations.is_empty() {
            info.push_str("Locations: ");
            info.push_str(&self.locations.join(", "));
            info.push_str(". ");
        }
        if let Some(note) = &self.note {
            info.push_str(note);
        }
        let trimmed = info.trim();
        if trimmed.is_empty() {
            "No specific catch info for this game in current data.".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// One species record after normalization: every supported game key has an
/// availability entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<String>,
    pub generation: Generation,
    pub availability: BTreeMap<GameKey, AvailabilityInfo>,
}

impl Species {
    pub fn new(
        id: SpeciesId,
        name: String,
        types: Vec<String>,
        generation: Generation,
        availability: BTreeMap<GameKey, AvailabilityInfo>,
    ) -> Result<Self, ParseError> {
        if name.is_empty() {
            return Err(ParseError::Empty("name"));
        }
        if name.trim() != name {
            return Err(ParseError::Trimmed("name"));
        }
        if name.len() > NAME_MAX_LEN {
            return Err(ParseError::TooLong("name", NAME_MAX_LEN));
        }
        Ok(Self {
            id,
            name,
            types,
            generation,
            availability,
        })
    }

    /// Always populated after normalization; the pending entry covers any
    /// game the record predates.
    #[must_use]
    pub fn availability_for(&self, game: GameKey) -> &AvailabilityInfo {
        static PENDING: std::sync::OnceLock<AvailabilityInfo> = std::sync::OnceLock::new();
        self.availability
            .get(&game)
            .unwrap_or_else(|| PENDING.get_or_init(AvailabilityInfo::pending))
    }

    #[must_use]
    pub fn sprite_url(&self) -> String {
        self.id.sprite_url()
    }
}
