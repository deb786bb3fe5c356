use mm_core::model::item::Item;
use mm_core::pricing::settlement::RoundResult;
use mm_core::{SessionView, Slot, TradeSide};

const HIDDEN: &str = "?";
const RED: &str = "\u{1b}[31m";
const RESET: &str = "\u{1b}[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub color: bool,
}

impl Style {
    fn item(self, item: Item) -> String {
        if self.color && item.is_red() {
            format!("{RED}{item}{RESET}")
        } else {
            item.to_string()
        }
    }
}

pub fn hand_line(view: &SessionView, style: Style) -> String {
    view.hand
        .iter()
        .map(|slot| match slot {
            Slot::Hidden => HIDDEN.to_string(),
            Slot::Shown(item) => style.item(*item),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn signed(value: f64) -> String {
    format!("{value:+.2}")
}

pub fn mode_select_lines() -> Vec<String> {
    vec![
        "Market-Making Game".to_string(),
        "Select game mode: cards | dice".to_string(),
    ]
}

pub fn quote_lines(view: &SessionView, round_seconds: u32, presets: &[u32], style: Style) -> Vec<String> {
    let mut lines = vec![
        format!("Round {}", view.round_number),
        format!("Time limit per decision: {round_seconds}s (soft)"),
        hand_line(view, style),
    ];
    if let Some(quote) = view.quote {
        lines.push(format!(
            "Maker quotes {:.2} @ {:.2}.  (EV≈{:.2})",
            quote.bid, quote.ask, quote.estimated_ev
        ));
    }
    let presets = presets
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let selected = view.order_size.map(|size| size.get()).unwrap_or(1);
    lines.push(format!("Order amount: {presets} | Selected: {selected}"));
    lines.push(format!("Budget: {:.0}", view.budget));
    lines
}

pub fn reveal_lines(view: &SessionView, style: Style) -> Vec<String> {
    let mut lines = vec!["Reveal".to_string(), hand_line(view, style)];
    if let (Some(side), Some(price)) = (view.side, view.exec_price) {
        let action = match side {
            TradeSide::Buy => "bought",
            TradeSide::Sell => "sold",
            TradeSide::Skip => "skipped",
        };
        let size = view.order_size.map(|size| size.get()).unwrap_or(1);
        lines.push(format!("You {action} {size} units at {price:.2}."));
    }
    lines.push("Enter your PnL for this round (use minus sign for losses):".to_string());
    lines
}

pub fn result_line(result: &RoundResult) -> String {
    if result.is_correct {
        format!("✅ Correct! PnL = {}", signed(result.actual_pnl))
    } else {
        format!("❌ Wrong. Actual PnL = {}", signed(result.actual_pnl))
    }
}

pub fn post_lines(view: &SessionView, style: Style) -> Vec<String> {
    let mut lines = Vec::new();
    match view.last_result.as_ref() {
        Some(result) => {
            lines.push(result_line(result));
            lines.push(format!("Hand total: {}", result.true_total));
        }
        None if view.side == Some(TradeSide::Skip) => {
            lines.push(format!("Skipped. {}", hand_line(view, style)));
        }
        None => {}
    }
    lines.push("next | finish".to_string());
    lines
}

pub fn summary_lines(view: &SessionView) -> Vec<String> {
    vec![
        "Game summary".to_string(),
        format!("Rounds played: {}", view.round_number),
        format!(
            "Final budget: {:.2}  (start {:.0})",
            view.budget, view.starting_budget
        ),
        format!("Total PnL: {}", signed(view.total_pnl)),
        format!(
            "Accuracy: {:.1}% ({}/{})",
            view.accuracy, view.correct_guesses, view.total_guesses
        ),
        "again | quit".to_string(),
    ]
}

pub fn tracker_line(view: &SessionView) -> String {
    format!("Running P&L: {}", signed(view.total_pnl))
}
