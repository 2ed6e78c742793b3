//! Frog Price Bot Library
//!
//! A Telegram bot that posts BTC/ETH prices rendered onto a template image.
//!
//! This crate provides the core functionality for:
//! - Fetching prices with provider fallback and retry-with-backoff
//! - Drawing outlined price text onto the template image
//! - Broadcasting updates on a fixed schedule
//! - Answering `/price` requests on demand

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod prices;
pub mod render;
pub mod scheduler;
pub mod telegram;

#[cfg(test)]
mod test_support;
