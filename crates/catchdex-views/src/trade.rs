// SPDX-License-Identifier: Apache-2.0

use catchdex_model::{Catalog, CaughtRecord, GameKey, Generation, SpeciesId};
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TradeError {
    SameGame,
}

impl Display for TradeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SameGame => f.write_str("trade partners must be two different games"),
        }
    }
}

impl std::error::Error for TradeError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeEntry {
    pub id: SpeciesId,
    pub name: String,
    /// Advisory note from the receiving game's availability data when that
    /// game cannot catch the species directly; the trade itself is permitted.
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TradePairings {
    pub receivable: Vec<TradeEntry>,
    pub sendable: Vec<TradeEntry>,
}

/// Computes what can move between two saves. A species is receivable when my
/// save lacks it, the partner has it, and my game's generation can hold it;
/// sendable is the mirror image. Generation-1 games cannot receive
/// generation-2 species in either direction.
pub fn trade_pairings(
    catalog: &Catalog,
    my_game: GameKey,
    partner_game: GameKey,
    my_record: &CaughtRecord,
    partner_record: &CaughtRecord,
) -> Result<TradePairings, TradeError> {
    if my_game == partner_game {
        return Err(TradeError::SameGame);
    }

    let mut pairings = TradePairings::default();
    for species in catalog.species() {
        let i_have_it = my_record.is_caught(species.id);
        let partner_has_it = partner_record.is_caught(species.id);
        let is_gen2 = species.generation == Generation::Two;

        if !i_have_it && partner_has_it && !(my_game.generation() == Generation::One && is_gen2) {
            pairings.receivable.push(TradeEntry {
                id: species.id,
                name: species.name.clone(),
                note: advisory_note(species, my_game),
            });
        }

        if !partner_has_it && i_have_it && !(partner_game.generation() == Generation::One && is_gen2)
        {
            pairings.sendable.push(TradeEntry {
                id: species.id,
                name: species.name.clone(),
                note: advisory_note(species, partner_game),
            });
        }
    }
    Ok(pairings)
}

fn advisory_note(species: &catchdex_model::Species, receiving_game: GameKey) -> Option<String> {
    let avail = species.availability_for(receiving_game);
    if avail.catchable {
        None
    } else {
        avail.note.clone()
    }
}
