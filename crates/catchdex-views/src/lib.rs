#![forbid(unsafe_code)]
//! Derived views over the catalog and caught-state records: the Pokédex
//! grid, the Area Dex, the Trade Helper, and the session state machine that
//! drives them. Everything here is a pure function of its inputs.

mod area;
mod pokedex;
mod state;
mod trade;

pub use area::{area_index, species_in_area, AreaIndex};
pub use pokedex::{pokedex_view, PokedexEntry, PokedexFilter, PokedexView};
pub use state::{Action, RecordSource, SessionPhase, Tab, ViewState};
pub use trade::{trade_pairings, TradeEntry, TradeError, TradePairings};

pub const CRATE_NAME: &str = "catchdex-views";
