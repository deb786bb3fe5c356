use crate::game::input::parse_guess;
use crate::game::ledger::{STARTING_BUDGET, SessionLedger};
use crate::game::round::{RoundContext, RoundRecord};
use crate::game::stage::{Action, ActionError, NextStep, Stage};
use crate::game::view::SessionView;
use crate::model::hand::HandSize;
use crate::model::mode::GameMode;
use crate::pricing::settlement::{RoundResult, TradeSide, settle};
use crate::random::RandomSource;
use core::num::NonZeroU32;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, event};

/// Stage together with the round data that stage needs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    ModeSelect,
    Quote(RoundContext),
    Reveal(RoundContext),
    Post(RoundContext),
    Summary,
}

impl Phase {
    pub(crate) fn stage(&self) -> Stage {
        match self {
            Phase::ModeSelect => Stage::ModeSelect,
            Phase::Quote(_) => Stage::Quote,
            Phase::Reveal(_) => Stage::Reveal,
            Phase::Post(_) => Stage::Post,
            Phase::Summary => Stage::Summary,
        }
    }

    pub(crate) fn round(&self) -> Option<&RoundContext> {
        match self {
            Phase::Quote(round) | Phase::Reveal(round) | Phase::Post(round) => Some(round),
            Phase::ModeSelect | Phase::Summary => None,
        }
    }
}

type Transition = Result<Phase, (Phase, ActionError)>;

/// One player's game: the ledger, the live round, and the random source that
/// drives dealing and pricing. Sessions share nothing with each other.
#[derive(Debug, Clone)]
pub struct GameSession<R = StdRng> {
    ledger: SessionLedger,
    phase: Phase,
    last_result: Option<RoundResult>,
    history: Vec<RoundRecord>,
    hand_size: Option<HandSize>,
    rng: R,
}

impl GameSession<StdRng> {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(StdRng::seed_from_u64(seed))
    }
}

impl Default for GameSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> GameSession<R> {
    pub fn with_source(rng: R) -> Self {
        Self {
            ledger: SessionLedger::new(STARTING_BUDGET),
            phase: Phase::ModeSelect,
            last_result: None,
            history: Vec::new(),
            hand_size: None,
            rng,
        }
    }

    pub(crate) fn from_parts(
        ledger: SessionLedger,
        phase: Phase,
        last_result: Option<RoundResult>,
        rng: R,
    ) -> Self {
        Self {
            ledger,
            phase,
            last_result,
            history: Vec::new(),
            hand_size: None,
            rng,
        }
    }

    /// Replaces the starting budget and resets the ledger to it.
    pub fn starting_budget(mut self, budget: f64) -> Self {
        self.ledger = SessionLedger::new(budget);
        self
    }

    /// Deals every hand at this size instead of drawing one.
    pub fn fixed_hand_size(mut self, size: HandSize) -> Self {
        self.hand_size = Some(size);
        self
    }

    pub fn stage(&self) -> Stage {
        self.phase.stage()
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn round(&self) -> Option<&RoundContext> {
        self.phase.round()
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn view(&self) -> SessionView {
        SessionView::capture(
            self.stage(),
            &self.ledger,
            self.phase.round(),
            self.last_result,
        )
    }

    /// Applies one action. On error the session is left exactly as it was.
    pub fn apply(&mut self, action: Action) -> Result<SessionView, ActionError> {
        let from = self.stage();
        let name = action.name();
        let current = std::mem::replace(&mut self.phase, Phase::ModeSelect);
        match self.transition(current, action) {
            Ok(next) => {
                self.phase = next;
                event!(Level::DEBUG, from = %from, to = %self.stage(), action = name, "transition");
                Ok(self.view())
            }
            Err((restored, err)) => {
                self.phase = restored;
                event!(Level::DEBUG, stage = %from, action = name, error = %err, "action rejected");
                Err(err)
            }
        }
    }

    pub fn select_mode(&mut self, mode: GameMode) -> Result<SessionView, ActionError> {
        self.apply(Action::SelectMode(mode))
    }

    pub fn choose_order_size(&mut self, size: NonZeroU32) -> Result<SessionView, ActionError> {
        self.apply(Action::ChooseOrderSize(size))
    }

    pub fn choose_side(&mut self, side: TradeSide) -> Result<SessionView, ActionError> {
        self.apply(Action::ChooseSide(side))
    }

    pub fn submit_guess(&mut self, input: &str) -> Result<SessionView, ActionError> {
        self.apply(Action::SubmitGuess(input.to_string()))
    }

    pub fn advance(&mut self, next: NextStep) -> Result<SessionView, ActionError> {
        self.apply(Action::Advance(next))
    }

    pub fn play_again(&mut self) -> Result<SessionView, ActionError> {
        self.apply(Action::PlayAgain)
    }

    fn transition(&mut self, phase: Phase, action: Action) -> Transition {
        match (phase, action) {
            (Phase::ModeSelect, Action::SelectMode(mode)) => {
                self.ledger.mode = mode;
                Ok(self.open_round())
            }
            (Phase::Quote(mut round), Action::ChooseOrderSize(size)) => {
                round.order_size = size;
                Ok(Phase::Quote(round))
            }
            (Phase::Quote(mut round), Action::ChooseSide(side)) => {
                round.side = Some(side);
                if side.executes() {
                    Ok(Phase::Reveal(round))
                } else {
                    self.ledger.record_skip();
                    self.archive(&round, None);
                    Ok(Phase::Post(round))
                }
            }
            (Phase::Reveal(round), Action::SubmitGuess(input)) => {
                let guess = match parse_guess(&input) {
                    Ok(guess) => guess,
                    Err(err) => return Err((Phase::Reveal(round), err.into())),
                };
                let Some(result) = round
                    .trade()
                    .and_then(|trade| settle(&round.hand, trade, &round.quote, Some(guess)))
                else {
                    let err = ActionError::UnexpectedAction {
                        stage: Stage::Reveal,
                        action: "submit_guess",
                    };
                    return Err((Phase::Reveal(round), err));
                };
                self.ledger
                    .record_settlement(result.actual_pnl, result.is_correct);
                event!(
                    Level::INFO,
                    round = self.ledger.round_number,
                    true_total = result.true_total,
                    exec_price = result.exec_price,
                    pnl = result.actual_pnl,
                    correct = result.is_correct,
                    budget = self.ledger.budget,
                    "round settled"
                );
                self.last_result = Some(result);
                self.archive(&round, Some(result));
                Ok(Phase::Post(round))
            }
            (Phase::Post(_), Action::Advance(NextStep::Round)) => Ok(self.open_round()),
            (Phase::Post(_), Action::Advance(NextStep::Finish)) => Ok(Phase::Summary),
            (Phase::Summary, Action::PlayAgain) => {
                self.ledger.reset();
                self.history.clear();
                self.last_result = None;
                Ok(Phase::ModeSelect)
            }
            (phase, action) => {
                let err = ActionError::UnexpectedAction {
                    stage: phase.stage(),
                    action: action.name(),
                };
                Err((phase, err))
            }
        }
    }

    /// The transient new-round stage: count the round, deal, reveal, quote.
    fn open_round(&mut self) -> Phase {
        let round_number = self.ledger.begin_round();
        self.last_result = None;
        let round = RoundContext::open(self.ledger.mode, self.hand_size, &mut self.rng);
        event!(
            Level::INFO,
            round = round_number,
            mode = %self.ledger.mode,
            items = round.hand.len(),
            revealed = round.revealed.len(),
            bid = round.quote.bid,
            ask = round.quote.ask,
            "round opened"
        );
        Phase::Quote(round)
    }

    fn archive(&mut self, round: &RoundContext, result: Option<RoundResult>) {
        let Some(trade) = round.trade() else {
            return;
        };
        self.history.push(RoundRecord {
            round_number: self.ledger.round_number,
            mode: self.ledger.mode,
            hand: round.hand.clone(),
            revealed: round.revealed.clone(),
            quote: round.quote,
            trade,
            result,
        });
    }
}
