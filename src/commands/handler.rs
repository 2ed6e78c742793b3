//! Command handler implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::types::{BotCommand, CommandResult};
use crate::dispatch::UpdateDispatcher;
use crate::telegram::{DeliveryChannel, Destination};

/// Executes chat commands on behalf of the requester.
pub struct CommandHandler {
    /// Shared fetch → render → deliver logic.
    dispatcher: Arc<UpdateDispatcher>,

    /// Channel used for plain text replies.
    channel: Arc<dyn DeliveryChannel>,
}

impl CommandHandler {
    /// Creates a new command handler.
    #[must_use]
    pub fn new(dispatcher: Arc<UpdateDispatcher>, channel: Arc<dyn DeliveryChannel>) -> Self {
        Self {
            dispatcher,
            channel,
        }
    }

    /// Executes a parsed command, replying to `requester`.
    pub async fn handle(&self, command: BotCommand, requester: &Destination) -> CommandResult {
        debug!("Handling /{} from {}", command.name(), requester);

        let result = match command {
            BotCommand::Price => self.handle_price(requester).await,
            BotCommand::Help | BotCommand::Start => self.handle_help(requester).await,
        };

        info!(
            "Command /{} result: success={} ({})",
            command.name(),
            result.success,
            result.message
        );
        result
    }

    async fn handle_price(&self, requester: &Destination) -> CommandResult {
        match self.dispatcher.dispatch_on_demand(requester).await {
            Ok(()) => CommandResult::success("price image sent"),
            Err(e) => CommandResult::error(format!("error notice sent: {e}")),
        }
    }

    async fn handle_help(&self, requester: &Destination) -> CommandResult {
        match self.channel.send_text(requester, &BotCommand::help_text()).await {
            Ok(()) => CommandResult::success("help sent"),
            Err(e) => {
                warn!("Failed to send help to {}: {}", requester, e);
                CommandResult::error(format!("help not delivered: {e}"))
            }
        }
    }
}

impl std::fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
