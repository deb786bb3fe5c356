use core::fmt;
use core::ops::RangeInclusive;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Synthetic asset class whose items make up a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Cards,
    Dice,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Cards, GameMode::Dice];

    pub const fn value_range(self) -> RangeInclusive<u8> {
        match self {
            GameMode::Cards => 2..=14,
            GameMode::Dice => 1..=6,
        }
    }

    /// Expected value of one undisclosed item (mean of a uniform draw over the range).
    pub const fn population_mean(self) -> f64 {
        match self {
            GameMode::Cards => 8.0,
            GameMode::Dice => 3.5,
        }
    }

    pub const fn has_suits(self) -> bool {
        matches!(self, GameMode::Cards)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GameMode::Cards => "cards",
            GameMode::Dice => "dice",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for GameMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" | "card" | "c" => Ok(GameMode::Cards),
            "dice" | "die" | "d" => Ok(GameMode::Dice),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}
