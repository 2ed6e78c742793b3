//! Command types and definitions.

use teloxide::utils::command::BotCommands;

// Descriptions also populate Telegram's command menu.
#[derive(BotCommands, Debug, Clone, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Frog price bot commands:")]
pub enum BotCommand {
    #[command(description = "show current BTC/ETH prices")]
    Price,

    #[command(description = "show this help message")]
    Help,

    // Sent by Telegram clients on first contact.
    #[command(description = "start talking to the bot")]
    Start,
}

impl BotCommand {
    /// Returns the command name as typed by users.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Help => "help",
            Self::Start => "start",
        }
    }

    /// Help text listing every command.
    #[must_use]
    pub fn help_text() -> String {
        Self::descriptions().to_string()
    }
}

/// Result of command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command was successful.
    pub success: bool,

    /// Summary for the log.
    pub message: String,
}

impl CommandResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates an error result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
