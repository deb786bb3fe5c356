use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, event};

use mm_cli::config::AppConfig;
use mm_cli::console::{Console, ConsoleSettings};
use mm_cli::history::HistoryWriter;
use mm_cli::logging::init_logging;
use mm_core::{AppInfo, GameMode, GameSession};

/// Terminal market-making trainer.
#[derive(Debug, Parser)]
#[command(
    name = "market-maker",
    author,
    version,
    about = "Quote a hidden hand, trade against the maker, and call your PnL"
)]
struct Cli {
    /// Path to the YAML configuration file (defaults to config/market.yaml when present).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the RNG seed for dealing and pricing.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the starting budget.
    #[arg(long, value_name = "AMOUNT")]
    budget: Option<f64>,

    /// Start straight into a mode (cards or dice) instead of prompting.
    #[arg(long, value_name = "MODE")]
    mode: Option<GameMode>,

    /// Deal every hand at this size (3 to 5).
    #[arg(long, value_name = "ITEMS")]
    hand_size: Option<usize>,

    /// Hide the running PnL line.
    #[arg(long)]
    no_tracker: bool,

    /// Colour red suits with ANSI escapes.
    #[arg(long)]
    color: bool,

    /// Exit after validating the configuration (no game is played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if let Some(seed) = cli.seed {
        config.game.seed = Some(seed);
    }

    if let Some(budget) = cli.budget {
        config.game.starting_budget = budget;
    }

    if let Some(mode) = cli.mode {
        config.game.default_mode = Some(mode);
    }

    if let Some(hand_size) = cli.hand_size {
        config.game.hand_size = Some(hand_size);
    }

    if cli.no_tracker {
        config.display.show_tracker = false;
    }

    if cli.color {
        config.display.color = true;
    }

    config.validate()?;

    let seed = config.game.seed.unwrap_or_else(rand::random);
    println!(
        "{} {} (seed {seed}, budget {:.0})",
        AppInfo::name(),
        AppInfo::version(),
        config.game.starting_budget
    );

    if cli.validate_only {
        println!("Validation-only mode: no game started.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging)?;
    event!(
        Level::INFO,
        seed,
        starting_budget = config.game.starting_budget,
        "session starting"
    );

    let mut session = GameSession::with_seed(seed).starting_budget(config.game.starting_budget);
    if let Some(size) = config.game.hand_size() {
        session = session.fixed_hand_size(size);
    }

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut console = Console::new(session, stdin, stdout, ConsoleSettings::from_config(&config));
    if let Some(path) = config.outputs.resolved_history(seed) {
        console = console.with_history(HistoryWriter::create(&path)?);
    }

    let report = console.run()?;
    event!(
        Level::INFO,
        games = report.games_finished,
        rounds = report.last_view.round_number,
        budget = report.last_view.budget,
        history_rows = report.history_rows,
        "session ended"
    );
    println!(
        "Goodbye: {} game{} finished, budget {:.2}",
        report.games_finished,
        if report.games_finished == 1 { "" } else { "s" },
        report.last_view.budget
    );

    Ok(())
}
