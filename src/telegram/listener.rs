//! Long-polling listener for inbound commands.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use super::Destination;
use crate::commands::{BotCommand, CommandHandler};

/// Registers the command menu and drops updates queued while offline.
///
/// Failures are logged; polling still works without either step.
pub async fn prepare(bot: &Bot) {
    if let Err(e) = bot.set_my_commands(BotCommand::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }
    if let Err(e) = bot.delete_webhook().drop_pending_updates(true).await {
        warn!("Failed to drop pending updates: {}", e);
    }
}

/// Polls for commands until Ctrl+C.
pub async fn listen(bot: Bot, handler: Arc<CommandHandler>) {
    info!("Starting Telegram polling...");

    let schema = Update::filter_message()
        .filter_command::<BotCommand>()
        .endpoint(on_command);

    Dispatcher::builder(bot, schema)
        .dependencies(dptree::deps![handler])
        .default_handler(|update| async move {
            debug!("Ignoring update {:?}", update.id);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Telegram polling stopped");
}

async fn on_command(msg: Message, command: BotCommand, handler: Arc<CommandHandler>) -> ResponseResult<()> {
    let requester = Destination::Chat(msg.chat.id.0);
    handler.handle(command, &requester).await;
    Ok(())
}
