use crate::model::mode::GameMode;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

const DICE_FACES: [char; 6] = ['⚀', '⚁', '⚂', '⚃', '⚄', '⚅'];

/// One unit of a hand: a card (value plus suit) or a die (value only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub value: u8,
    pub suit: Option<Suit>,
}

impl Item {
    pub const fn card(value: u8, suit: Suit) -> Self {
        Self {
            value,
            suit: Some(suit),
        }
    }

    pub const fn die(value: u8) -> Self {
        Self { value, suit: None }
    }

    pub fn fits(self, mode: GameMode) -> bool {
        mode.value_range().contains(&self.value) && self.suit.is_some() == mode.has_suits()
    }

    /// Rank label for card values: 11..=14 become J, Q, K, A.
    pub fn rank_label(self) -> String {
        match self.value {
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            14 => "A".to_string(),
            other => other.to_string(),
        }
    }

    pub fn die_face(self) -> Option<char> {
        DICE_FACES.get(usize::from(self.value).checked_sub(1)?).copied()
    }

    pub fn is_red(self) -> bool {
        self.suit.is_some_and(Suit::is_red)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Some(suit) => write!(f, "{}{}", self.rank_label(), suit),
            None => match self.die_face() {
                Some(face) => write!(f, "{face}"),
                None => write!(f, "{}", self.value),
            },
        }
    }
}
