//! # mucbot - an event-driven command bot engine for multi-user chat rooms
//!
//! Mucbot receives messages from a group-chat (MUC) room, filters out the
//! ones that are not actionable, matches the rest against an ordered
//! registry of regex commands, and broadcasts handler replies back to the
//! room. It greets new members with a customizable welcome and transparently
//! re-establishes the session after a fatal connection failure.
//!
//! The wire protocol is not implemented here. The bot consumes an abstract
//! [`SessionAdapter`](session::SessionAdapter): a stream of room-message and
//! room-join events plus a broadcast send capability. Any transport that can
//! satisfy that trait can host the bot; the crate ships an in-memory
//! implementation for tests and embedding.
//!
//! ## Quick start
//!
//! ```no_run
//! use mucbot::{BotConfig, MucBot};
//! use mucbot::session::memory::MemorySession;
//! use regex::Regex;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mucbot::BotError> {
//!     let config = BotConfig {
//!         jid: Some("bot@example.com".into()),
//!         password: Some("secret".into()),
//!         room: Some("myroom".into()),
//!         ..Default::default()
//!     };
//!
//!     let mut bot = MucBot::new(config, MemorySession::new()).await?;
//!
//!     // 'puts <text>' echoes to stdout and confirms in the room.
//!     bot.register_command(Regex::new(r"^puts\s+(.+)$").unwrap(), |sender, params| {
//!         if let mucbot::CommandParams::One(text) = &params {
//!             println!("{sender} says {text}.");
//!             return Ok(Some(format!("'{text}' written to stdout.")));
//!         }
//!         Ok(None)
//!     });
//!
//!     bot.welcome(|handle| Ok(Some(format!("Hello {handle}!"))));
//!
//!     // Blocks while keep_alive is set (the default).
//!     bot.join().await
//! }
//! ```
//!
//! ## Module organization
//!
//! - [`bot`] - The [`MucBot`] surface, event loop, filter, registry,
//!   dispatcher, greeter, and reconnect supervisor
//! - [`session`] - The adapter seam to the underlying chat protocol
//! - [`config`] - Configuration and normalization
//! - [`errors`] - The public error taxonomy
//! - [`logutil`] - Log sanitization helpers

pub mod bot;
pub mod config;
pub mod errors;
pub mod logutil;
pub mod session;

pub use bot::registry::{CommandParams, CommandRegistry};
pub use bot::MucBot;
pub use config::{BotConfig, Settings};
pub use errors::BotError;
