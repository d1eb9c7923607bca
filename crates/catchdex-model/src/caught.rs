// SPDX-License-Identifier: Apache-2.0

use crate::SpeciesId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-(user, game) mapping of species key to caught flag. Keys are inserted
/// lazily; an absent key means "not caught", never an error. Marking a
/// species uncaught keeps the key with a `false` value rather than removing
/// it, so a record is an append-only set of touched species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaughtRecord(BTreeMap<String, bool>);

impl CaughtRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_caught(&self, id: SpeciesId) -> bool {
        self.0.get(&id.as_key()).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_caught_key(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// Upserts one key. The record never forgets a touched key.
    pub fn set(&mut self, key: String, caught: bool) {
        self.0.insert(key, caught);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, bool)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    #[must_use]
    pub fn caught_count(&self) -> usize {
        self.0.values().filter(|caught| **caught).count()
    }
}
