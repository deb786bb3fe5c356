#![deny(warnings)]
pub mod game;
pub mod model;
pub mod pricing;
pub mod random;

pub use game::ledger::{STARTING_BUDGET, SessionLedger};
pub use game::session::GameSession;
pub use game::stage::{Action, ActionError, NextStep, Stage};
pub use game::view::{SessionView, Slot};
pub use model::mode::GameMode;
pub use pricing::settlement::TradeSide;
pub use random::{RandomSource, ScriptedSource};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "market-maker"
    }

    pub const fn codename() -> &'static str {
        "Quote Desk"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "market-maker");
        assert_eq!(AppInfo::codename(), "Quote Desk");
        assert!(!AppInfo::version().is_empty());
    }
}
