// SPDX-License-Identifier: Apache-2.0

use crate::{AvailabilityInfo, GameKey, Generation, ParseError, Species, SpeciesId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A species record as it appears in the static catalog partition files.
/// Optional fields and missing game entries are tolerated here and resolved
/// exactly once by [`normalize_species`]; nothing downstream sees a partially
/// populated record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpecies {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub availability: BTreeMap<String, RawAvailability>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAvailability {
    #[serde(default)]
    pub catchable: Option<bool>,
    #[serde(default)]
    pub locations: Option<Vec<String>>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Normalizes one raw record into a fully-populated [`Species`]:
/// - every supported game key gets an entry, synthesized as the pending
///   placeholder when the source data has none;
/// - missing `locations` becomes the empty list;
/// - missing `catchable` defaults to `locations.len() > 0`.
///
/// Unknown game keys in the source data are dropped; the supported set is
/// closed.
pub fn normalize_species(raw: RawSpecies, generation: Generation) -> Result<Species, ParseError> {
    let id = SpeciesId::parse(raw.id)?;
    let mut availability = BTreeMap::new();
    for game in GameKey::ALL {
        let entry = match raw.availability.get(game.as_str()) {
            Some(raw_entry) => {
                let locations = raw_entry.locations.clone().unwrap_or_default();
                let catchable = raw_entry.catchable.unwrap_or(!locations.is_empty());
                AvailabilityInfo::new(catchable, locations, raw_entry.note.clone())
            }
            None => AvailabilityInfo::pending(),
        };
        availability.insert(game, entry);
    }
    Species::new(id, raw.name, raw.types, generation, availability)
}

/// The immutable species catalog, in the source partitions' native order.
/// Built from whichever generation partitions loaded successfully; a catalog
/// with a single partition is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct Catalog {
    species: Vec<Species>,
}

impl Catalog {
    #[must_use]
    pub fn new(species: Vec<Species>) -> Self {
        Self { species }
    }

    /// Normalizes and concatenates partitions, preserving partition order and
    /// each partition's native record order.
    pub fn from_partitions(
        partitions: Vec<(Generation, Vec<RawSpecies>)>,
    ) -> Result<Self, ParseError> {
        let mut species = Vec::new();
        for (generation, records) in partitions {
            for raw in records {
                species.push(normalize_species(raw, generation)?);
            }
        }
        Ok(Self { species })
    }

    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: SpeciesId) -> Option<&Species> {
        self.species.iter().find(|s| s.id == id)
    }

    /// Species visible in the given game: generation-2 species are excluded
    /// from generation-1 games, for any catalog content.
    pub fn compatible_with(&self, game: GameKey) -> impl Iterator<Item = &Species> {
        self.species
            .iter()
            .filter(move |s| game.supports(s.generation))
    }
}
