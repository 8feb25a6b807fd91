pub mod btt;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod macos;
pub mod response;

pub use btt::{BetterTouchTool, Outcome, VariableValue};
pub use error::{BttError, BttResult};
