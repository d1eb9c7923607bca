// SPDX-License-Identifier: Apache-2.0

use catchdex_model::{Catalog, GameKey, Species};
use serde::Serialize;
use std::collections::BTreeSet;

/// Deduplicated, alphabetically sorted union of every location string for one
/// game, over generation-compatible species only. Computed once per game;
/// the session state caches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AreaIndex {
    areas: Vec<String>,
}

impl AreaIndex {
    #[must_use]
    pub fn areas(&self) -> &[String] {
        &self.areas
    }

    #[must_use]
    pub fn contains(&self, area: &str) -> bool {
        self.areas.iter().any(|a| a == area)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

#[must_use]
pub fn area_index(catalog: &Catalog, game: GameKey) -> AreaIndex {
    let mut set = BTreeSet::new();
    for species in catalog.compatible_with(game) {
        for location in &species.availability_for(game).locations {
            set.insert(location.trim().to_string());
        }
    }
    AreaIndex {
        areas: set.into_iter().collect(),
    }
}

/// Species shown for a (game, area) pair: generation compatible, catchable in
/// that game, and listing the area verbatim.
#[must_use]
pub fn species_in_area<'a>(catalog: &'a Catalog, game: GameKey, area: &str) -> Vec<&'a Species> {
    catalog
        .compatible_with(game)
        .filter(|species| {
            let avail = species.availability_for(game);
            avail.catchable && avail.locations.iter().any(|loc| loc == area)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catchdex_model::{Generation, RawSpecies};

    fn catalog() -> Catalog {
        let gen1: Vec<RawSpecies> = serde_json::from_str(
            r#"[
                {"id":16,"name":"Pidgey","types":["Normal"],"availability":{
                    "red":{"locations":["Route 1","Viridian Forest"]},
                    "blue":{"locations":["Route 1"]}
                }},
                {"id":25,"name":"Pikachu","types":["Electric"],"availability":{
                    "red":{"locations":["Viridian Forest"]},
                    "blue":{"catchable":false,"locations":["Viridian Forest"],"note":"Trade only."}
                }}
            ]"#,
        )
        .expect("gen1");
        let gen2: Vec<RawSpecies> = serde_json::from_str(
            r#"[
                {"id":161,"name":"Sentret","types":["Normal"],"availability":{
                    "gold":{"locations":["Route 29"]},
                    "red":{"locations":["Route 1"]}
                }}
            ]"#,
        )
        .expect("gen2");
        Catalog::from_partitions(vec![(Generation::One, gen1), (Generation::Two, gen2)])
            .expect("catalog")
    }

    #[test]
    fn index_is_sorted_and_deduplicated() {
        let index = area_index(&catalog(), GameKey::Red);
        assert_eq!(
            index.areas(),
            ["Route 1".to_string(), "Viridian Forest".to_string()]
        );
    }

    #[test]
    fn index_ignores_gen2_species_for_gen1_games() {
        // Sentret's data lists a red location, but a gen-1 game never sees a
        // gen-2 species, so Route 29 stays out and Route 1 comes only from
        // Pidgey.
        let index = area_index(&catalog(), GameKey::Red);
        assert!(!index.contains("Route 29"));

        let index = area_index(&catalog(), GameKey::Gold);
        assert!(index.contains("Route 29"));
    }

    #[test]
    fn area_listing_requires_catchable_and_exact_match() {
        let cat = catalog();
        let in_forest = species_in_area(&cat, GameKey::Red, "Viridian Forest");
        let ids: Vec<u16> = in_forest.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![16, 25]);

        // Pikachu is listed for blue's forest data but marked not catchable.
        let in_forest = species_in_area(&cat, GameKey::Blue, "Viridian Forest");
        let ids: Vec<u16> = in_forest.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, Vec::<u16>::new());

        assert!(species_in_area(&catalog(), GameKey::Red, "viridian forest").is_empty());
    }

    #[test]
    fn unknown_area_yields_an_empty_listing() {
        assert!(species_in_area(&catalog(), GameKey::Red, "Mt. Silver").is_empty());
    }
}
