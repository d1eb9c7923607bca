// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Which core-series generation a game or species belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Generation {
    One,
    Two,
}

impl Generation {
    pub fn parse(raw: u8) -> Result<Self, ParseError> {
        match raw {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(ParseError::InvalidFormat("generation must be 1 or 2")),
        }
    }

    #[must_use]
    pub const fn as_number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// The fixed set of supported game versions. The enum itself bounds the key
/// space: routes and storage paths only exist for these six values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum GameKey {
    Red,
    Blue,
    Yellow,
    Gold,
    Silver,
    Crystal,
}

impl GameKey {
    pub const ALL: [GameKey; 6] = [
        GameKey::Red,
        GameKey::Blue,
        GameKey::Yellow,
        GameKey::Gold,
        GameKey::Silver,
        GameKey::Crystal,
    ];

    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            "yellow" => Ok(Self::Yellow),
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            "crystal" => Ok(Self::Crystal),
            _ => Err(ParseError::InvalidFormat(
                "game must be one of red, blue, yellow, gold, silver, crystal",
            )),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Crystal => "crystal",
        }
    }

    #[must_use]
    pub const fn generation(self) -> Generation {
        match self {
            Self::Red | Self::Blue | Self::Yellow => Generation::One,
            Self::Gold | Self::Silver | Self::Crystal => Generation::Two,
        }
    }

    /// A generation-1 game can only hold generation-1 species.
    #[must_use]
    pub const fn supports(self, species_generation: Generation) -> bool {
        match self.generation() {
            Generation::One => matches!(species_generation, Generation::One),
            Generation::Two => true,
        }
    }
}

impl Display for GameKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
