//! Command handling module.
//!
//! Processes `/price`, `/help` and `/start` sent to the bot. `/price`
//! runs an on-demand dispatch addressed to the requesting chat.

mod handler;
mod types;

pub use handler::CommandHandler;
pub use types::{BotCommand, CommandResult};
