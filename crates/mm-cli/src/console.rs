use std::io::{self, BufRead, Write};
use std::num::NonZeroU32;

use mm_core::{
    Action, ActionError, GameMode, GameSession, NextStep, RandomSource, SessionView, Stage,
    TradeSide,
};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::AppConfig;
use crate::history::{HistoryError, HistoryWriter};
use crate::render::{self, Style};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("session rejected an action: {0}")]
    Action(#[from] ActionError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Presentation settings pulled from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleSettings {
    pub round_seconds: u32,
    pub order_presets: Vec<u32>,
    pub show_tracker: bool,
    pub style: Style,
    pub initial_mode: Option<GameMode>,
}

impl ConsoleSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            round_seconds: config.game.round_seconds,
            order_presets: config.display.order_presets.clone(),
            show_tracker: config.display.show_tracker,
            style: Style {
                color: config.display.color,
            },
            initial_mode: config.game.default_mode,
        }
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// What a line of input means in the current stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a command in the {stage} stage; expected {expected}")]
pub struct UnknownCommand {
    pub stage: Stage,
    pub input: String,
    pub expected: String,
}

/// Maps a line to an action the stage accepts. Anything else is reported
/// back to the player so the session never sees an out-of-stage action.
pub fn parse_command(stage: Stage, line: &str, presets: &[u32]) -> Result<Command, UnknownCommand> {
    let input = line.trim();
    let lowered = input.to_ascii_lowercase();
    if matches!(lowered.as_str(), "quit" | "exit" | "q") {
        return Ok(Command::Quit);
    }

    let action = match stage {
        Stage::ModeSelect => lowered.parse::<GameMode>().ok().map(Action::SelectMode),
        Stage::Quote => parse_quote_command(&lowered, presets),
        // Any other text is a guess; the session validates the number.
        Stage::Reveal => Some(Action::SubmitGuess(input.to_string())),
        Stage::Post => match lowered.as_str() {
            "next" | "n" | "round" => Some(Action::Advance(NextStep::Round)),
            "finish" | "f" | "done" => Some(Action::Advance(NextStep::Finish)),
            _ => None,
        },
        Stage::Summary => match lowered.as_str() {
            "again" | "play again" | "a" => Some(Action::PlayAgain),
            _ => None,
        },
        Stage::NewRound => None,
    };

    action.map(Command::Act).ok_or_else(|| UnknownCommand {
        stage,
        input: input.to_string(),
        expected: expected_commands(stage, presets),
    })
}

fn parse_quote_command(lowered: &str, presets: &[u32]) -> Option<Action> {
    match lowered {
        "buy" | "b" => return Some(Action::ChooseSide(TradeSide::Buy)),
        "sell" | "s" => return Some(Action::ChooseSide(TradeSide::Sell)),
        "skip" | "k" => return Some(Action::ChooseSide(TradeSide::Skip)),
        _ => {}
    }
    let size = match lowered.strip_prefix("size") {
        Some(rest) => rest.trim().parse::<u32>().ok()?,
        None => {
            let preset = lowered.parse::<u32>().ok()?;
            presets.contains(&preset).then_some(preset)?
        }
    };
    NonZeroU32::new(size).map(Action::ChooseOrderSize)
}

fn expected_commands(stage: Stage, presets: &[u32]) -> String {
    match stage {
        Stage::ModeSelect => "cards | dice".to_string(),
        Stage::Quote => {
            let presets = presets
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
            format!("{presets} | size N | buy | sell | skip")
        }
        Stage::Reveal => "a number".to_string(),
        Stage::Post => "next | finish".to_string(),
        Stage::Summary => "again | quit".to_string(),
        Stage::NewRound => "nothing".to_string(),
    }
}

/// Totals reported when the console exits.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleReport {
    pub games_finished: usize,
    pub last_view: SessionView,
    pub history_rows: usize,
}

/// Line-oriented front end driving one session.
pub struct Console<In, Out, R = rand::rngs::StdRng> {
    session: GameSession<R>,
    input: In,
    output: Out,
    settings: ConsoleSettings,
    history: Option<HistoryWriter>,
}

impl<In: BufRead, Out: Write, R: RandomSource> Console<In, Out, R> {
    pub fn new(session: GameSession<R>, input: In, output: Out, settings: ConsoleSettings) -> Self {
        Self {
            session,
            input,
            output,
            settings,
            history: None,
        }
    }

    pub fn with_history(mut self, writer: HistoryWriter) -> Self {
        self.history = Some(writer);
        self
    }

    pub fn session(&self) -> &GameSession<R> {
        &self.session
    }

    pub fn into_output(self) -> Out {
        self.output
    }

    /// Runs until the player quits or input ends.
    pub fn run(&mut self) -> Result<ConsoleReport, ConsoleError> {
        let mut games_finished = 0usize;
        let mut history_rows = 0usize;

        let mut view = match self.settings.initial_mode {
            Some(mode) => self.session.select_mode(mode)?,
            None => self.session.view(),
        };
        self.render(&view)?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let command = match parse_command(view.stage, &line, &self.settings.order_presets) {
                Ok(command) => command,
                Err(unknown) => {
                    writeln!(self.output, "Expected {}.", unknown.expected)?;
                    continue;
                }
            };
            let action = match command {
                Command::Quit => break,
                Command::Act(action) => action,
            };

            match self.session.apply(action) {
                Ok(next) => {
                    if next.stage == Stage::Summary && view.stage != Stage::Summary {
                        games_finished += 1;
                        history_rows += self.write_history()?;
                    }
                    view = next;
                    self.render(&view)?;
                }
                Err(err) if err.is_invalid_guess() => {
                    event!(Level::DEBUG, error = %err, "guess rejected");
                    writeln!(self.output, "Please input a number.")?;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(ConsoleReport {
            games_finished,
            last_view: view,
            history_rows,
        })
    }

    fn write_history(&mut self) -> Result<usize, ConsoleError> {
        match self.history.as_mut() {
            Some(writer) => Ok(writer.append_game(self.session.history())?),
            None => Ok(0),
        }
    }

    fn render(&mut self, view: &SessionView) -> io::Result<()> {
        let style = self.settings.style;
        let lines = match view.stage {
            Stage::ModeSelect => render::mode_select_lines(),
            Stage::Quote => render::quote_lines(
                view,
                self.settings.round_seconds,
                &self.settings.order_presets,
                style,
            ),
            Stage::Reveal => render::reveal_lines(view, style),
            Stage::Post => render::post_lines(view, style),
            Stage::Summary => render::summary_lines(view),
            Stage::NewRound => Vec::new(),
        };
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        if self.settings.show_tracker && view.stage != Stage::ModeSelect {
            writeln!(self.output, "{}", render::tracker_line(view))?;
        }
        Ok(())
    }
}
