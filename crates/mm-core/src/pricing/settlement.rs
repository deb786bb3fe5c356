use crate::model::hand::Hand;
use crate::pricing::quote::Quote;
use crate::pricing::round2;
use core::fmt;
use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

/// A guess within this distance of the realized PnL counts as correct.
pub const GUESS_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
    Skip,
}

impl TradeSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
            TradeSide::Skip => "skip",
        }
    }

    pub const fn executes(self) -> bool {
        !matches!(self, TradeSide::Skip)
    }

    /// Price the maker fills at: the ask when the player buys, the bid when they sell.
    pub fn execution_price(self, quote: &Quote) -> Option<f64> {
        match self {
            TradeSide::Buy => Some(quote.ask),
            TradeSide::Sell => Some(quote.bid),
            TradeSide::Skip => None,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub side: TradeSide,
    pub size: NonZeroU32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub true_total: u32,
    pub exec_price: f64,
    pub actual_pnl: f64,
    pub user_guess: Option<f64>,
    pub is_correct: bool,
}

/// Realized PnL of `trade` once the whole hand is known. `None` for a skip.
pub fn realized_pnl(hand: &Hand, trade: Trade, quote: &Quote) -> Option<(f64, f64)> {
    let true_total = f64::from(hand.total());
    let units = f64::from(trade.size.get());
    let (exec_price, per_unit) = match trade.side {
        TradeSide::Buy => (quote.ask, true_total - quote.ask),
        TradeSide::Sell => (quote.bid, quote.bid - true_total),
        TradeSide::Skip => return None,
    };
    Some((exec_price, round2(per_unit * units)))
}

pub fn guess_matches(guess: f64, actual: f64) -> bool {
    (guess - actual).abs() < GUESS_TOLERANCE
}

/// Settles an executed trade and scores the player's guess against it.
pub fn settle(hand: &Hand, trade: Trade, quote: &Quote, guess: Option<f64>) -> Option<RoundResult> {
    let (exec_price, actual_pnl) = realized_pnl(hand, trade, quote)?;
    Some(RoundResult {
        true_total: hand.total(),
        exec_price,
        actual_pnl,
        user_guess: guess,
        is_correct: guess.is_some_and(|g| guess_matches(g, actual_pnl)),
    })
}

#[cfg(test)]
mod tests {
    use super::{Trade, TradeSide, guess_matches, realized_pnl, settle};
    use crate::model::hand::Hand;
    use crate::model::item::Item;
    use crate::model::suit::Suit;
    use crate::pricing::quote::Quote;
    use core::num::NonZeroU32;

    fn example_hand() -> Hand {
        Hand::with_items(vec![
            Item::card(7, Suit::Hearts),
            Item::card(12, Suit::Diamonds),
            Item::card(5, Suit::Clubs),
        ])
    }

    fn example_quote() -> Quote {
        Quote {
            bid: 20.47,
            ask: 20.93,
            estimated_ev: 23.0,
        }
    }

    fn trade(side: TradeSide, size: u32) -> Trade {
        Trade {
            side,
            size: NonZeroU32::new(size).expect("non-zero size"),
        }
    }

    #[test]
    fn buy_pays_the_ask() {
        let result = settle(&example_hand(), trade(TradeSide::Buy, 1), &example_quote(), Some(3.07))
            .expect("buy executes");
        assert_eq!(result.true_total, 24);
        assert_eq!(result.exec_price, 20.93);
        assert_eq!(result.actual_pnl, 3.07);
        assert!(result.is_correct);
    }

    #[test]
    fn sell_receives_the_bid_and_scales_with_size() {
        let result = settle(&example_hand(), trade(TradeSide::Sell, 5), &example_quote(), Some(-17.0))
            .expect("sell executes");
        assert_eq!(result.exec_price, 20.47);
        assert_eq!(result.actual_pnl, -17.65);
        assert!(!result.is_correct);
        assert_eq!(result.user_guess, Some(-17.0));
    }

    #[test]
    fn skip_never_settles() {
        assert!(settle(&example_hand(), trade(TradeSide::Skip, 10), &example_quote(), Some(0.0)).is_none());
    }

    #[test]
    fn realized_fill_matches_execution_price() {
        let quote = example_quote();
        for side in [TradeSide::Buy, TradeSide::Sell, TradeSide::Skip] {
            let fill = realized_pnl(&example_hand(), trade(side, 1), &quote).map(|(price, _)| price);
            assert_eq!(fill, side.execution_price(&quote), "{side}");
        }
    }

    #[test]
    fn guess_tolerance_is_strict() {
        assert!(guess_matches(3.07, 3.07));
        assert!(guess_matches(3.075, 3.07));
        assert!(!guess_matches(3.09, 3.07));
        assert!(!guess_matches(-3.07, 3.07));
    }
}
