// SPDX-License-Identifier: Apache-2.0

use catchdex_model::{Catalog, CaughtRecord, GameKey, Species, SpeciesId};
use serde::Serialize;

/// Active Pokédex filters. The search term matches case-insensitively on the
/// species name or on its id string; a term that is only whitespace still
/// matches literally but does not count as "active" for the next-to-catch
/// highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PokedexFilter {
    pub search: String,
    pub uncaught_only: bool,
}

impl PokedexFilter {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.uncaught_only || !self.search.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PokedexEntry<'a> {
    #[serde(flatten)]
    pub species: &'a Species,
    pub caught: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PokedexView<'a> {
    pub entries: Vec<PokedexEntry<'a>>,
    /// First uncaught species in display order; only set when no filter is
    /// active, and absent when everything is caught.
    pub next_to_catch: Option<SpeciesId>,
}

/// Derives the Pokédex grid for one game: generation-compatible species in
/// catalog order (stable filter, no re-sort), narrowed by the search term and
/// the uncaught-only toggle.
#[must_use]
pub fn pokedex_view<'a>(
    catalog: &'a Catalog,
    game: GameKey,
    record: &CaughtRecord,
    filter: &PokedexFilter,
) -> PokedexView<'a> {
    let term = filter.search.to_lowercase();
    let entries: Vec<PokedexEntry<'a>> = catalog
        .compatible_with(game)
        .filter_map(|species| {
            let matches = term.is_empty()
                || species.name.to_lowercase().contains(&term)
                || species.id.as_key().contains(&term);
            if !matches {
                return None;
            }
            let caught = record.is_caught(species.id);
            if filter.uncaught_only && caught {
                return None;
            }
            Some(PokedexEntry { species, caught })
        })
        .collect();

    let next_to_catch = if filter.is_active() {
        None
    } else {
        entries
            .iter()
            .find(|entry| !entry.caught)
            .map(|entry| entry.species.id)
    };

    PokedexView {
        entries,
        next_to_catch,
    }
}
