pub mod input;
pub mod ledger;
pub mod round;
pub mod serialization;
pub mod session;
pub mod stage;
pub mod view;
