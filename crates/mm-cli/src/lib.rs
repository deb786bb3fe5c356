pub mod config;
pub mod console;
pub mod history;
pub mod logging;
pub mod render;
