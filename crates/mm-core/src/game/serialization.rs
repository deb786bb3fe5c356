use super::ledger::SessionLedger;
use super::round::RoundContext;
use super::session::{GameSession, Phase};
use super::stage::Stage;
use crate::model::reveal::RevealedSet;
use crate::pricing::settlement::RoundResult;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LEDGER_EPSILON: f64 = 1e-6;

/// Externalized session state: the ledger, the live round and the result
/// shown in the post stage. History and the hand-size setting are not kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub ledger: SessionLedger,
    #[serde(default)]
    pub round: Option<RoundContext>,
    #[serde(default)]
    pub last_result: Option<RoundResult>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("stage {0} is transient and cannot be restored")]
    TransientStage(Stage),
    #[error("stage {0} requires round data")]
    MissingRound(Stage),
    #[error("stage {0} does not carry round data")]
    UnexpectedRound(Stage),
    #[error("round data is inconsistent with the {stage} stage: {reason}")]
    InconsistentRound { stage: Stage, reason: &'static str },
    #[error("ledger is inconsistent with the {stage} stage: {reason}")]
    InconsistentLedger { stage: Stage, reason: &'static str },
    #[error("stage {0} does not carry a settled result")]
    UnexpectedResult(Stage),
    #[error("failed to decode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionSnapshot {
    pub fn capture<R: RandomSource>(session: &GameSession<R>) -> Self {
        SessionSnapshot {
            stage: session.stage(),
            ledger: *session.ledger(),
            round: session.round().cloned(),
            last_result: session.last_result().copied(),
        }
    }

    /// Rebuilds a session around a fresh random source. The round archive
    /// starts empty and hands are sized at random again; callers that deal a
    /// fixed size reapply it with [`GameSession::fixed_hand_size`].
    pub fn restore<R: RandomSource>(self, rng: R) -> Result<GameSession<R>, SnapshotError> {
        validate_ledger(self.stage, &self.ledger)?;
        validate_result(self.stage, self.round.as_ref(), self.last_result.as_ref())?;
        let phase = match (self.stage, self.round) {
            (Stage::NewRound, _) => return Err(SnapshotError::TransientStage(Stage::NewRound)),
            (Stage::ModeSelect, None) => Phase::ModeSelect,
            (Stage::Summary, None) => Phase::Summary,
            (stage @ (Stage::ModeSelect | Stage::Summary), Some(_)) => {
                return Err(SnapshotError::UnexpectedRound(stage));
            }
            (stage, None) => return Err(SnapshotError::MissingRound(stage)),
            (stage, Some(round)) => {
                validate_round(stage, &round, &self.ledger)?;
                match stage {
                    Stage::Quote => Phase::Quote(round),
                    Stage::Reveal => Phase::Reveal(round),
                    _ => Phase::Post(round),
                }
            }
        };
        Ok(GameSession::from_parts(self.ledger, phase, self.last_result, rng))
    }

    pub fn to_json<R: RandomSource>(session: &GameSession<R>) -> serde_json::Result<String> {
        let snapshot = Self::capture(session);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn validate_ledger(stage: Stage, ledger: &SessionLedger) -> Result<(), SnapshotError> {
    let inconsistent = |reason| SnapshotError::InconsistentLedger { stage, reason };
    if ledger.correct_guesses > ledger.total_guesses {
        return Err(inconsistent("more correct guesses than guesses"));
    }
    if !ledger.starting_budget.is_finite() || !ledger.budget.is_finite() {
        return Err(inconsistent("budget is not finite"));
    }
    if (ledger.budget - (ledger.starting_budget + ledger.total_pnl)).abs() > LEDGER_EPSILON {
        return Err(inconsistent("budget does not equal starting budget plus total pnl"));
    }
    if stage.has_round() && ledger.round_number == 0 {
        return Err(inconsistent("a live round needs a round number"));
    }
    Ok(())
}

/// Only the post stage (and the summary it leads to) shows a settled result,
/// and only for an executed trade.
fn validate_result(
    stage: Stage,
    round: Option<&RoundContext>,
    result: Option<&RoundResult>,
) -> Result<(), SnapshotError> {
    if result.is_none() {
        return Ok(());
    }
    match stage {
        Stage::Summary => Ok(()),
        Stage::Post if round.and_then(|r| r.side).is_some_and(|side| side.executes()) => Ok(()),
        _ => Err(SnapshotError::UnexpectedResult(stage)),
    }
}

fn validate_round(
    stage: Stage,
    round: &RoundContext,
    ledger: &SessionLedger,
) -> Result<(), SnapshotError> {
    let inconsistent = |reason| SnapshotError::InconsistentRound { stage, reason };
    if !round.hand.fits(ledger.mode) {
        return Err(inconsistent("hand does not fit the session mode"));
    }
    if RevealedSet::from_indices(round.revealed.indices().to_vec(), round.hand.len()).is_none() {
        return Err(inconsistent("revealed indices are out of range, repeated or too many"));
    }
    if round.quote.bid >= round.quote.ask {
        return Err(inconsistent("quote is crossed"));
    }
    match (stage, round.side) {
        (Stage::Quote, None) => Ok(()),
        (Stage::Quote, Some(_)) => Err(inconsistent("side already chosen")),
        (Stage::Reveal, Some(side)) if side.executes() => Ok(()),
        (Stage::Reveal, _) => Err(inconsistent("reveal needs a buy or sell")),
        (_, Some(_)) => Ok(()),
        (_, None) => Err(inconsistent("post needs a chosen side")),
    }
}
