pub mod hand;
pub mod item;
pub mod mode;
pub mod reveal;
pub mod suit;
