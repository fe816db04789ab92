//! Error taxonomy for the bot core.

use thiserror::Error;

use crate::session::SessionError;

/// Errors surfaced by the public [`MucBot`](crate::bot::MucBot) surface.
///
/// Per-message handler failures are deliberately absent: a command or
/// greeting handler that returns an error (or panics) is logged and isolated
/// at the dispatch boundary and never terminates event processing.
#[derive(Debug, Error)]
pub enum BotError {
    /// A required configuration field was missing at construction.
    #[error("missing required config field: {0}")]
    Config(&'static str),

    /// The session adapter failed during initial connect or room join.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Recovery after a fatal session error failed; the bot is down.
    #[error("reconnect failed: {0}")]
    Reconnect(SessionError),

    /// The event-loop worker itself died (task panic).
    #[error("internal error: {0}")]
    Internal(String),
}
