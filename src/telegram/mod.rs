//! Telegram delivery channel module.
//!
//! Provides the delivery abstraction used by the dispatcher, its Bot API
//! implementation, and the long-polling command listener.

mod bot;
mod channel;
pub mod listener;

pub use bot::TelegramChannel;
pub use channel::{DeliveryChannel, DeliveryError, Destination};
