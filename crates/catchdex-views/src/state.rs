// SPDX-License-Identifier: Apache-2.0

use crate::{area_index, AreaIndex, PokedexFilter};
use catchdex_model::{Catalog, CaughtRecord, GameKey};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SessionPhase {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Tab {
    Pokedex,
    AreaDex,
    TradeHelper,
}

/// Where a loaded record came from. The durable fallback is consulted only
/// when the remote fetch fails; either source overwrites the cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Remote,
    Fallback,
}

/// User actions driving the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    LoggedIn,
    LoggedOut,
    SelectTab(Tab),
    SwitchGame(GameKey),
    SetSearch(String),
    SetUncaughtOnly(bool),
    SelectArea(Option<String>),
    SetTradeGames { mine: GameKey, partner: GameKey },
    RecordLoaded {
        game: GameKey,
        record: CaughtRecord,
        source: RecordSource,
    },
    MarkCaught {
        game: GameKey,
        species_key: String,
        caught: bool,
    },
}

/// Explicit immutable session state. Every render derives from this value
/// plus the catalog; transitions go through [`ViewState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub phase: SessionPhase,
    pub tab: Tab,
    pub game: GameKey,
    pub filter: PokedexFilter,
    pub selected_area: Option<String>,
    pub trade_my_game: GameKey,
    pub trade_partner_game: GameKey,
    records: BTreeMap<GameKey, CaughtRecord>,
    areas: BTreeMap<GameKey, AreaIndex>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            tab: Tab::Pokedex,
            game: GameKey::Gold,
            filter: PokedexFilter::default(),
            selected_area: None,
            trade_my_game: GameKey::Gold,
            trade_partner_game: GameKey::Silver,
            records: BTreeMap::new(),
            areas: BTreeMap::new(),
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached record for a game; an unloaded game reads as an empty record.
    #[must_use]
    pub fn record(&self, game: GameKey) -> CaughtRecord {
        self.records.get(&game).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn has_record(&self, game: GameKey) -> bool {
        self.records.contains_key(&game)
    }

    /// Area list for a game, computed once per game per session.
    pub fn areas_for(&mut self, catalog: &Catalog, game: GameKey) -> &AreaIndex {
        self.areas
            .entry(game)
            .or_insert_with(|| area_index(catalog, game))
    }

    /// Pure state transition. Switching the active game resets the dependent
    /// derived selections but never the caught-record caches.
    #[must_use]
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::LoggedIn => {
                self.phase = SessionPhase::Authenticated;
            }
            Action::LoggedOut => {
                return Self::default();
            }
            Action::SelectTab(tab) => {
                self.tab = tab;
            }
            Action::SwitchGame(game) => {
                self.game = game;
                self.selected_area = None;
                self.trade_my_game = game;
                if self.trade_partner_game == game {
                    self.trade_partner_game = GameKey::ALL
                        .into_iter()
                        .find(|candidate| *candidate != game)
                        .unwrap_or(game);
                }
            }
            Action::SetSearch(search) => {
                self.filter.search = search;
            }
            Action::SetUncaughtOnly(uncaught_only) => {
                self.filter.uncaught_only = uncaught_only;
            }
            Action::SelectArea(area) => {
                self.selected_area = area;
            }
            Action::SetTradeGames { mine, partner } => {
                self.trade_my_game = mine;
                self.trade_partner_game = partner;
            }
            Action::RecordLoaded { game, record, .. } => {
                self.records.insert(game, record);
            }
            Action::MarkCaught {
                game,
                species_key,
                caught,
            } => {
                self.records
                    .entry(game)
                    .or_default()
                    .set(species_key, caught);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(game: GameKey, pairs: &[(&str, bool)]) -> Action {
        let mut record = CaughtRecord::new();
        for (key, caught) in pairs {
            record.set((*key).to_string(), *caught);
        }
        Action::RecordLoaded {
            game,
            record,
            source: RecordSource::Remote,
        }
    }

    #[test]
    fn login_moves_the_session_to_authenticated() {
        let state = ViewState::new().reduce(Action::LoggedIn);
        assert_eq!(state.phase, SessionPhase::Authenticated);
    }

    #[test]
    fn logout_resets_everything() {
        let state = ViewState::new()
            .reduce(Action::LoggedIn)
            .reduce(loaded(GameKey::Red, &[("1", true)]))
            .reduce(Action::SelectTab(Tab::TradeHelper))
            .reduce(Action::LoggedOut);
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn tabs_are_exclusive() {
        let state = ViewState::new()
            .reduce(Action::SelectTab(Tab::AreaDex))
            .reduce(Action::SelectTab(Tab::TradeHelper));
        assert_eq!(state.tab, Tab::TradeHelper);
    }

    #[test]
    fn switching_game_resets_area_but_keeps_record_caches() {
        let state = ViewState::new()
            .reduce(loaded(GameKey::Gold, &[("152", true)]))
            .reduce(Action::SelectArea(Some("Route 29".to_string())))
            .reduce(Action::SwitchGame(GameKey::Red));
        assert_eq!(state.game, GameKey::Red);
        assert!(state.selected_area.is_none());
        assert!(state.record(GameKey::Gold).is_caught_key("152"));
    }

    #[test]
    fn switching_game_keeps_the_trade_pair_distinct() {
        let state = ViewState::new().reduce(Action::SetTradeGames {
            mine: GameKey::Gold,
            partner: GameKey::Red,
        });
        let state = state.reduce(Action::SwitchGame(GameKey::Red));
        assert_eq!(state.trade_my_game, GameKey::Red);
        assert_ne!(state.trade_partner_game, GameKey::Red);
    }

    #[test]
    fn mark_caught_overwrites_the_cache_entry() {
        let state = ViewState::new()
            .reduce(loaded(GameKey::Red, &[("1", true)]))
            .reduce(Action::MarkCaught {
                game: GameKey::Red,
                species_key: "1".to_string(),
                caught: false,
            });
        assert!(!state.record(GameKey::Red).is_caught_key("1"));
        assert_eq!(state.record(GameKey::Red).len(), 1);
    }

    #[test]
    fn mark_caught_on_an_unloaded_game_starts_an_empty_record() {
        let state = ViewState::new().reduce(Action::MarkCaught {
            game: GameKey::Crystal,
            species_key: "152".to_string(),
            caught: true,
        });
        assert!(state.record(GameKey::Crystal).is_caught_key("152"));
    }

    #[test]
    fn fallback_load_overwrites_like_a_remote_load() {
        let state = ViewState::new()
            .reduce(loaded(GameKey::Red, &[("1", true)]))
            .reduce(Action::RecordLoaded {
                game: GameKey::Red,
                record: CaughtRecord::new(),
                source: RecordSource::Fallback,
            });
        assert!(state.record(GameKey::Red).is_empty());
    }
}
