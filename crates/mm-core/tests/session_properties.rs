use mm_core::game::round::ORDER_PRESETS;
use mm_core::model::hand::{Hand, MAX_HAND_SIZE, MIN_HAND_SIZE};
use mm_core::model::reveal::{MAX_REVEALED, RevealedSet};
use mm_core::pricing::quote::{Visible, make_quote};
use mm_core::pricing::round2;
use mm_core::{GameMode, GameSession, NextStep, STARTING_BUDGET, Stage, TradeSide};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::num::NonZeroU32;

fn seed_for(game_index: usize) -> u64 {
    let mut rng = StdRng::seed_from_u64(20_250_101);
    let mut seed = 0u64;
    for _ in 0..=game_index {
        seed = rng.next_u64();
    }
    seed
}

/// Plays `rounds` rounds with random decisions, checking ledger invariants at every step.
fn play_random_game(seed: u64, mode: GameMode, rounds: u32) {
    let mut decisions = StdRng::seed_from_u64(seed ^ 0x5eed);
    let mut session = GameSession::with_seed(seed);
    let view = session.select_mode(mode).expect("mode select");
    assert_eq!(view.stage, Stage::Quote);

    for round in 1..=rounds {
        let view = session.view();
        assert_eq!(view.round_number, round);
        let live = session.round().expect("live round").clone();
        assert!((MIN_HAND_SIZE..=MAX_HAND_SIZE).contains(&live.hand.len()));
        assert!(live.hand.fits(mode));
        assert!(live.revealed.len() <= MAX_REVEALED);
        let quote = live.quote;
        assert!(quote.bid < quote.ask);
        let visible = live.revealed.visible(&live.hand);
        let revealed_sum: u32 = visible.iter().map(|item| u32::from(item.value)).sum();
        let unseen = live.hand.len() - visible.len();
        assert_eq!(
            quote.estimated_ev,
            round2(f64::from(revealed_sum) + unseen as f64 * mode.population_mean())
        );

        let size = ORDER_PRESETS[decisions.gen_range(0..ORDER_PRESETS.len())];
        session
            .choose_order_size(NonZeroU32::new(size).expect("preset is positive"))
            .expect("size in quote stage");

        let before = *session.ledger();
        let side = match decisions.gen_range(0..3) {
            0 => TradeSide::Buy,
            1 => TradeSide::Sell,
            _ => TradeSide::Skip,
        };
        let view = session.choose_side(side).expect("side in quote stage");

        if side == TradeSide::Skip {
            assert_eq!(view.stage, Stage::Post);
            assert_eq!(view.budget, before.budget);
            assert_eq!(view.total_pnl, before.total_pnl);
            assert_eq!(view.total_guesses, before.total_guesses + 1);
            assert_eq!(view.correct_guesses, before.correct_guesses);
        } else {
            assert_eq!(view.stage, Stage::Reveal);
            let exec = if side == TradeSide::Buy { quote.ask } else { quote.bid };
            let total = f64::from(live.hand.total());
            let expected = if side == TradeSide::Buy {
                round2((total - exec) * f64::from(size))
            } else {
                round2((exec - total) * f64::from(size))
            };
            let guess = if decisions.gen_bool(0.5) { expected } else { expected + 1.0 };
            let view = session.submit_guess(&guess.to_string()).expect("numeric guess");
            let result = view.last_result.expect("settled");
            assert_eq!(result.actual_pnl, expected);
            assert_eq!(result.is_correct, guess == expected);
            assert!((view.budget - (before.budget + expected)).abs() < 1e-9);
            assert!((view.total_pnl - (before.total_pnl + expected)).abs() < 1e-9);
        }

        let view = session.view();
        assert!((view.budget - (STARTING_BUDGET + view.total_pnl)).abs() < 1e-6);
        assert!((0.0..=100.0).contains(&view.accuracy));

        let next = if round == rounds { NextStep::Finish } else { NextStep::Round };
        session.advance(next).expect("advance from post");
    }

    assert_eq!(session.stage(), Stage::Summary);
    assert_eq!(session.history().len(), rounds as usize);
    let view = session.play_again().expect("play again");
    assert_eq!(view.stage, Stage::ModeSelect);
    assert_eq!(view.budget, STARTING_BUDGET);
    assert_eq!(view.total_pnl, 0.0);
    assert_eq!(view.correct_guesses, 0);
    assert_eq!(view.total_guesses, 0);
    assert_eq!(view.round_number, 0);
}

#[test]
fn random_games_preserve_ledger_invariants() {
    for game in 0..20 {
        let mode = if game % 2 == 0 { GameMode::Cards } else { GameMode::Dice };
        play_random_game(seed_for(game), mode, 12);
    }
}

#[test]
fn same_seed_replays_identical_game() {
    let play = |seed| {
        let mut session = GameSession::with_seed(seed);
        session.select_mode(GameMode::Cards).unwrap();
        session.choose_side(TradeSide::Buy).unwrap();
        session.submit_guess("1").unwrap();
        session.advance(NextStep::Round).unwrap();
        session.view()
    };
    assert_eq!(play(4242), play(4242));
}

#[test]
fn quote_distribution_ignores_hidden_values() {
    // Same revealed values and hand length, different hidden items, same draws.
    let mut hidden_rng = StdRng::seed_from_u64(77);
    for _ in 0..50 {
        let hand_a = Hand::generate(GameMode::Cards, None, &mut hidden_rng);
        let mut items = hand_a.items().to_vec();
        let revealed = RevealedSet::draw(hand_a.len(), &mut hidden_rng);
        for (idx, item) in items.iter_mut().enumerate() {
            if !revealed.contains(idx) {
                item.value = if item.value == 14 { 2 } else { item.value + 1 };
            }
        }
        let hand_b = Hand::with_items(items);

        let quote = |hand: &Hand| {
            let shown = revealed.visible(hand);
            let visible = Visible {
                revealed: &shown,
                hand_len: hand.len(),
                mode: GameMode::Cards,
            };
            make_quote(visible, &mut StdRng::seed_from_u64(9))
        };
        assert_eq!(quote(&hand_a), quote(&hand_b));
    }
}

#[test]
fn skip_only_game_scores_zero_accuracy() {
    let mut session = GameSession::with_seed(3);
    session.select_mode(GameMode::Dice).unwrap();
    let view = session.advance(NextStep::Finish);
    assert!(view.is_err(), "finish is only accepted after the quote stage");
    session.choose_side(TradeSide::Skip).unwrap();
    let view = session.advance(NextStep::Finish).unwrap();
    assert_eq!(view.stage, Stage::Summary);
    assert_eq!(view.total_guesses, 1);
    assert_eq!(view.accuracy, 0.0);
}
