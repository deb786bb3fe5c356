use crate::model::item::Item;
use crate::model::mode::GameMode;
use crate::pricing::round2;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Mid is drawn within this fraction either side of the visible estimate.
pub const MID_JITTER: f64 = 0.10;
/// Spread bounds as a fraction of the visible estimate; both strictly positive.
pub const SPREAD_MIN: f64 = 0.02;
pub const SPREAD_MAX: f64 = 0.06;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: f64,
    pub ask: f64,
    pub estimated_ev: f64,
}

impl Quote {
    pub fn spread(&self) -> f64 {
        round2(self.ask - self.bid)
    }

    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}

/// What the maker can see: revealed values, how many items exist, and the mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visible<'a> {
    pub revealed: &'a [Item],
    pub hand_len: usize,
    pub mode: GameMode,
}

impl Visible<'_> {
    pub fn revealed_sum(&self) -> u32 {
        self.revealed.iter().map(|item| u32::from(item.value)).sum()
    }

    pub fn unseen(&self) -> usize {
        self.hand_len.saturating_sub(self.revealed.len())
    }

    /// Revealed values plus the population mean for every hidden item.
    pub fn expected_total(&self) -> f64 {
        f64::from(self.revealed_sum()) + self.unseen() as f64 * self.mode.population_mean()
    }
}

/// Builds the maker's quote from visible information only. Hidden items never
/// reach this function, so the quote cannot depend on them.
pub fn make_quote<R: RandomSource + ?Sized>(visible: Visible<'_>, rng: &mut R) -> Quote {
    let ev_visible = visible.expected_total();
    let mid = ev_visible * (1.0 + rng.uniform_real(-MID_JITTER, MID_JITTER));
    let spread = ev_visible * rng.uniform_real(SPREAD_MIN, SPREAD_MAX);

    let quote = Quote {
        bid: round2(mid - spread / 2.0),
        ask: round2(mid + spread / 2.0),
        estimated_ev: round2(ev_visible),
    };
    debug_assert!(quote.bid < quote.ask, "quote crossed: {quote:?}");
    quote
}

#[cfg(test)]
mod tests {
    use super::{MID_JITTER, SPREAD_MAX, SPREAD_MIN, Visible, make_quote};
    use crate::model::item::Item;
    use crate::model::mode::GameMode;
    use crate::model::suit::Suit;
    use crate::random::ScriptedSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn lower_bound_draws_match_worked_example() {
        let revealed = [Item::card(7, Suit::Hearts)];
        let visible = Visible {
            revealed: &revealed,
            hand_len: 3,
            mode: GameMode::Cards,
        };
        let mut source = ScriptedSource::new().with_reals([-MID_JITTER, SPREAD_MIN]);
        let quote = make_quote(visible, &mut source);
        assert_eq!(quote.estimated_ev, 23.0);
        assert_eq!(quote.bid, 20.47);
        assert_eq!(quote.ask, 20.93);
    }

    #[test]
    fn nothing_revealed_prices_population_mean() {
        let visible = Visible {
            revealed: &[],
            hand_len: 4,
            mode: GameMode::Dice,
        };
        let mut source = ScriptedSource::new().with_reals([0.0, 0.04]);
        let quote = make_quote(visible, &mut source);
        assert_eq!(quote.estimated_ev, 14.0);
        assert_eq!(quote.bid, 13.72);
        assert_eq!(quote.ask, 14.28);
    }

    #[test]
    fn bid_stays_below_ask_across_extremes() {
        let smallest = [Item::die(1), Item::die(1)];
        for (mid, spread) in [
            (-MID_JITTER, SPREAD_MIN),
            (MID_JITTER, SPREAD_MIN),
            (-MID_JITTER, SPREAD_MAX),
            (MID_JITTER, SPREAD_MAX),
        ] {
            let visible = Visible {
                revealed: &smallest,
                hand_len: 3,
                mode: GameMode::Dice,
            };
            let mut source = ScriptedSource::new().with_reals([mid, spread]);
            let quote = make_quote(visible, &mut source);
            assert!(quote.bid < quote.ask, "{quote:?}");
        }
    }

    #[test]
    fn seeded_quotes_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(99);
        for mode in GameMode::ALL {
            for hand_len in 3..=5 {
                let revealed = [Item { value: *mode.value_range().start(), suit: None }];
                let visible = Visible {
                    revealed: &revealed,
                    hand_len,
                    mode,
                };
                let expected = visible.expected_total();
                for _ in 0..200 {
                    let quote = make_quote(visible, &mut rng);
                    assert!(quote.bid < quote.ask);
                    assert_eq!(quote.estimated_ev, expected);
                    assert!(quote.bid >= expected * (1.0 - MID_JITTER - SPREAD_MAX) - 0.01);
                    assert!(quote.ask <= expected * (1.0 + MID_JITTER + SPREAD_MAX) + 0.01);
                }
            }
        }
    }

    #[test]
    fn hidden_values_cannot_move_the_quote() {
        // Two hands sharing revealed values and length produce identical quotes
        // under identical draws; the engine only ever sees the visible slice.
        let hand_a = [Item::die(4), Item::die(1), Item::die(1)];
        let hand_b = [Item::die(4), Item::die(6), Item::die(6)];
        let quote_for = |hand: &[Item]| {
            let visible = Visible {
                revealed: &hand[..1],
                hand_len: hand.len(),
                mode: GameMode::Dice,
            };
            let mut source = ScriptedSource::new().with_reals([0.05, 0.03]);
            make_quote(visible, &mut source)
        };
        assert_eq!(quote_for(&hand_a[..]), quote_for(&hand_b[..]));
    }
}
