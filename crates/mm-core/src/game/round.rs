use crate::model::hand::{Hand, HandSize};
use crate::model::mode::GameMode;
use crate::model::reveal::RevealedSet;
use crate::pricing::quote::{Quote, Visible, make_quote};
use crate::pricing::settlement::{RoundResult, Trade, TradeSide};
use crate::random::RandomSource;
use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

pub const ORDER_PRESETS: [u32; 3] = [1, 5, 10];

pub const DEFAULT_ORDER_SIZE: NonZeroU32 = NonZeroU32::MIN;

/// Everything scoped to a single round: the hidden hand, what was shown,
/// the maker's quote, and the player's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundContext {
    pub hand: Hand,
    pub revealed: RevealedSet,
    pub quote: Quote,
    pub order_size: NonZeroU32,
    #[serde(default)]
    pub side: Option<TradeSide>,
}

impl RoundContext {
    /// Deals, reveals, and prices a round in that order.
    pub fn open<R: RandomSource + ?Sized>(mode: GameMode, size: Option<HandSize>, rng: &mut R) -> Self {
        let hand = Hand::generate(mode, size, rng);
        let revealed = RevealedSet::draw(hand.len(), rng);
        let shown = revealed.visible(&hand);
        let quote = make_quote(
            Visible {
                revealed: &shown,
                hand_len: hand.len(),
                mode,
            },
            rng,
        );
        Self {
            hand,
            revealed,
            quote,
            order_size: DEFAULT_ORDER_SIZE,
            side: None,
        }
    }

    pub fn trade(&self) -> Option<Trade> {
        self.side.map(|side| Trade {
            side,
            size: self.order_size,
        })
    }

    pub fn exec_price(&self) -> Option<f64> {
        self.side?.execution_price(&self.quote)
    }
}

/// Archived round, kept in the session history until the next reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_number: u32,
    pub mode: GameMode,
    pub hand: Hand,
    pub revealed: RevealedSet,
    pub quote: Quote,
    pub trade: Trade,
    pub result: Option<RoundResult>,
}
