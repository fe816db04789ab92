//! Session adapter seam between the bot core and the underlying chat protocol.
//!
//! The bot never speaks the wire protocol itself. An implementation of
//! [`SessionAdapter`] owns the authenticated connection and room membership,
//! and surfaces three things to the core:
//!
//! - an inbound event stream ([`SessionEvent`]) obtained via
//!   [`SessionAdapter::subscribe`],
//! - an outbound broadcast capability ([`SessionAdapter::send`]),
//! - connect / join / disconnect lifecycle calls.
//!
//! Inbound events are delivered over an unbounded mpsc channel, one event at a
//! time, in arrival order. Calling `subscribe` again replaces any previous
//! subscription; the old receiver simply runs dry. That replacement semantics
//! is what the reconnect path relies on to avoid duplicate deliveries.
//!
//! [`MemorySession`](memory::MemorySession) is a complete in-memory
//! implementation suitable for tests and embedding.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors reported by a [`SessionAdapter`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Credentials rejected during authentication.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure while establishing the session.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The room could not be entered.
    #[error("room join failed: {0}")]
    Join(String),

    /// Fatal error on an established session (stream error, socket loss).
    #[error("session stream error: {0}")]
    Stream(String),
}

/// How an incoming message was addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Broadcast to the whole room.
    Groupchat,
    /// Addressed to the bot privately.
    Private,
    /// Protocol or server notice.
    System,
}

/// One message observed in the room. Transient; produced per event.
#[derive(Debug, Clone)]
pub struct RoomMessage {
    pub kind: MessageKind,
    /// Room handle of the sender, when the protocol could identify one.
    pub sender: Option<String>,
    /// Room handle the message was addressed to, if any.
    pub recipient: Option<String>,
    pub body: Option<String>,
    /// Set on history replayed at join time; such messages are never live.
    pub delayed: bool,
}

impl RoomMessage {
    /// A live broadcast message, the common case in tests and embedders.
    pub fn broadcast(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Groupchat,
            sender: Some(sender.into()),
            recipient: None,
            body: Some(body.into()),
            delayed: false,
        }
    }
}

/// A member entering the room. The adapter is expected to suppress the bot's
/// own join.
#[derive(Debug, Clone)]
pub struct RoomJoin {
    pub handle: String,
}

/// Inbound events delivered by the adapter.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Message(RoomMessage),
    Join(RoomJoin),
    /// Fatal session-level failure; triggers the reconnect supervisor.
    Fatal(SessionError),
}

/// The external collaborator that owns the protocol session.
///
/// Implementations must be safe to share behind an `Arc` across the bot's
/// event-loop worker and its public surface.
#[async_trait]
pub trait SessionAdapter: Send + Sync {
    /// Authenticate `jid` against the server. Called once at construction and
    /// again by the reconnect supervisor after a fatal error.
    async fn connect(&self, jid: &str, password: &str) -> Result<(), SessionError>;

    /// Enter the room under the bot's nick (`room@conference.server/nick`).
    async fn join_room(&self, room_jid: &str) -> Result<(), SessionError>;

    /// Broadcast `text` to the joined room.
    async fn send(&self, text: &str) -> Result<(), SessionError>;

    fn is_connected(&self) -> bool;

    /// Obtain the inbound event stream. Replaces any prior subscription.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent>;

    /// Tear down the session. Implementations drop the current subscription
    /// so the event stream ends and the bot's worker can exit.
    async fn disconnect(&self);
}
