use crate::model::mode::GameMode;
use serde::{Deserialize, Serialize};

pub const STARTING_BUDGET: f64 = 500.0;

/// Running totals for one game. Survives across rounds; reset by "play again".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionLedger {
    pub mode: GameMode,
    pub round_number: u32,
    pub starting_budget: f64,
    pub budget: f64,
    pub total_pnl: f64,
    pub correct_guesses: u32,
    pub total_guesses: u32,
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new(STARTING_BUDGET)
    }
}

impl SessionLedger {
    pub const fn new(starting_budget: f64) -> Self {
        Self {
            mode: GameMode::Cards,
            round_number: 0,
            starting_budget,
            budget: starting_budget,
            total_pnl: 0.0,
            correct_guesses: 0,
            total_guesses: 0,
        }
    }

    pub fn begin_round(&mut self) -> u32 {
        self.round_number += 1;
        self.round_number
    }

    /// A skipped round still counts as a decision the player was scored on.
    pub fn record_skip(&mut self) {
        self.total_guesses += 1;
    }

    pub fn record_settlement(&mut self, pnl: f64, correct: bool) {
        self.total_pnl += pnl;
        self.budget += pnl;
        self.total_guesses += 1;
        if correct {
            self.correct_guesses += 1;
        }
    }

    /// Percentage of correct guesses, 0 before any guess.
    pub fn accuracy(&self) -> f64 {
        if self.total_guesses == 0 {
            0.0
        } else {
            f64::from(self.correct_guesses) / f64::from(self.total_guesses) * 100.0
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.starting_budget);
    }
}
