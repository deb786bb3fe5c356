use crate::game::input::GuessError;
use crate::model::mode::GameMode;
use crate::pricing::settlement::TradeSide;
use core::fmt;
use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decision points of a game. `NewRound` is transient: the session passes
/// through it while dealing and never rests there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ModeSelect,
    NewRound,
    Quote,
    Reveal,
    Post,
    Summary,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::ModeSelect => "mode_select",
            Stage::NewRound => "new_round",
            Stage::Quote => "quote",
            Stage::Reveal => "reveal",
            Stage::Post => "post",
            Stage::Summary => "summary",
        }
    }

    /// Stages that carry live round data.
    pub const fn has_round(self) -> bool {
        matches!(self, Stage::Quote | Stage::Reveal | Stage::Post)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    Round,
    Finish,
}

/// Player actions accepted by the session reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectMode(GameMode),
    ChooseOrderSize(NonZeroU32),
    ChooseSide(TradeSide),
    SubmitGuess(String),
    Advance(NextStep),
    PlayAgain,
}

impl Action {
    pub const fn name(&self) -> &'static str {
        match self {
            Action::SelectMode(_) => "select_mode",
            Action::ChooseOrderSize(_) => "choose_order_size",
            Action::ChooseSide(_) => "choose_side",
            Action::SubmitGuess(_) => "submit_guess",
            Action::Advance(_) => "advance",
            Action::PlayAgain => "play_again",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action} is not accepted in the {stage} stage")]
    UnexpectedAction { stage: Stage, action: &'static str },
    #[error(transparent)]
    InvalidGuess(#[from] GuessError),
}

impl ActionError {
    /// The recoverable input error; anything else is a caller bug.
    pub fn is_invalid_guess(&self) -> bool {
        matches!(self, ActionError::InvalidGuess(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionError, Stage};
    use crate::game::input::GuessError;

    #[test]
    fn round_data_lives_in_trading_stages() {
        assert!(!Stage::ModeSelect.has_round());
        assert!(!Stage::NewRound.has_round());
        assert!(Stage::Quote.has_round());
        assert!(Stage::Reveal.has_round());
        assert!(Stage::Post.has_round());
        assert!(!Stage::Summary.has_round());
    }

    #[test]
    fn errors_describe_stage_and_action() {
        let err = ActionError::UnexpectedAction {
            stage: Stage::Summary,
            action: Action::PlayAgain.name(),
        };
        assert_eq!(err.to_string(), "play_again is not accepted in the summary stage");
        assert!(!err.is_invalid_guess());

        let err = ActionError::from(GuessError::InvalidGuessFormat {
            input: "x".to_string(),
        });
        assert!(err.is_invalid_guess());
        assert_eq!(err.to_string(), "'x' is not a number");
    }
}
