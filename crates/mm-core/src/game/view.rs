use crate::game::ledger::SessionLedger;
use crate::game::round::RoundContext;
use crate::game::stage::Stage;
use crate::model::item::Item;
use crate::model::mode::GameMode;
use crate::pricing::quote::Quote;
use crate::pricing::settlement::{RoundResult, TradeSide};
use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "item", rename_all = "snake_case")]
pub enum Slot {
    Hidden,
    Shown(Item),
}

impl Slot {
    pub fn item(self) -> Option<Item> {
        match self {
            Slot::Hidden => None,
            Slot::Shown(item) => Some(item),
        }
    }
}

/// Read-only snapshot handed to the presentation layer after every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub stage: Stage,
    pub mode: GameMode,
    pub round_number: u32,
    pub hand: Vec<Slot>,
    pub quote: Option<Quote>,
    pub order_size: Option<NonZeroU32>,
    pub side: Option<TradeSide>,
    pub exec_price: Option<f64>,
    pub last_result: Option<RoundResult>,
    pub starting_budget: f64,
    pub budget: f64,
    pub total_pnl: f64,
    pub correct_guesses: u32,
    pub total_guesses: u32,
    pub accuracy: f64,
}

impl SessionView {
    pub fn capture(
        stage: Stage,
        ledger: &SessionLedger,
        round: Option<&RoundContext>,
        last_result: Option<RoundResult>,
    ) -> Self {
        Self {
            stage,
            mode: ledger.mode,
            round_number: ledger.round_number,
            hand: round.map(|r| mask_hand(stage, r)).unwrap_or_default(),
            quote: round.map(|r| r.quote),
            order_size: round.map(|r| r.order_size),
            side: round.and_then(|r| r.side),
            exec_price: round.and_then(RoundContext::exec_price),
            last_result,
            starting_budget: ledger.starting_budget,
            budget: ledger.budget,
            total_pnl: ledger.total_pnl,
            correct_guesses: ledger.correct_guesses,
            total_guesses: ledger.total_guesses,
            accuracy: ledger.accuracy(),
        }
    }

    pub fn shown_items(&self) -> impl Iterator<Item = Item> + '_ {
        self.hand.iter().filter_map(|slot| slot.item())
    }

    pub fn is_fully_revealed(&self) -> bool {
        !self.hand.is_empty() && self.hand.iter().all(|slot| matches!(slot, Slot::Shown(_)))
    }
}

/// Hidden items stay masked until the trade is executed. A skipped round
/// never reaches the reveal, so its hand stays masked in the post stage too.
fn mask_hand(stage: Stage, round: &RoundContext) -> Vec<Slot> {
    let unmasked = match stage {
        Stage::Reveal => true,
        Stage::Post => round.side.is_some_and(TradeSide::executes),
        _ => false,
    };
    round
        .hand
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            if unmasked || round.revealed.contains(idx) {
                Slot::Shown(*item)
            } else {
                Slot::Hidden
            }
        })
        .collect()
}
