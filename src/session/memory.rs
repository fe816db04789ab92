//! In-memory session adapter.
//!
//! `MemorySession` implements [`SessionAdapter`] without any transport: sent
//! broadcasts are recorded, inbound events are injected with [`push`], and
//! connect failures can be simulated. The integration tests drive the whole
//! bot through it; embedders can use it to exercise command handlers without
//! a server.
//!
//! [`push`]: MemorySession::push

use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::{SessionAdapter, SessionError, SessionEvent};
use async_trait::async_trait;

#[derive(Default)]
struct MemoryState {
    connected: bool,
    joined_room: Option<String>,
    connect_count: u32,
    join_count: u32,
    sent: Vec<String>,
    subscriber: Option<mpsc::UnboundedSender<SessionEvent>>,
    fail_next_connect: bool,
}

/// See the [module docs](self).
#[derive(Default)]
pub struct MemorySession {
    state: Mutex<MemoryState>,
}

impl MemorySession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Inject an inbound event. Returns false if there is no live
    /// subscription to deliver it to.
    pub fn push(&self, event: SessionEvent) -> bool {
        let state = self.state.lock();
        match &state.subscriber {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// All broadcasts sent so far, oldest first.
    pub fn sent(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    /// Number of successful `connect` calls.
    pub fn connect_count(&self) -> u32 {
        self.state.lock().connect_count
    }

    /// Number of successful `join_room` calls.
    pub fn join_count(&self) -> u32 {
        self.state.lock().join_count
    }

    /// The room JID most recently joined, if any.
    pub fn joined_room(&self) -> Option<String> {
        self.state.lock().joined_room.clone()
    }

    /// Make the next `connect` call fail with a connection error.
    pub fn fail_next_connect(&self) {
        self.state.lock().fail_next_connect = true;
    }
}

#[async_trait]
impl SessionAdapter for MemorySession {
    async fn connect(&self, jid: &str, _password: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if state.fail_next_connect {
            state.fail_next_connect = false;
            return Err(SessionError::Connection("simulated connect failure".into()));
        }
        state.connected = true;
        state.connect_count += 1;
        debug!("memory session connected as {jid}");
        Ok(())
    }

    async fn join_room(&self, room_jid: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(SessionError::Join("not connected".into()));
        }
        state.joined_room = Some(room_jid.to_string());
        state.join_count += 1;
        Ok(())
    }

    async fn send(&self, text: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(SessionError::Stream("send on closed session".into()));
        }
        state.sent.push(text.to_string());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().subscriber = Some(tx);
        rx
    }

    async fn disconnect(&self) {
        let mut state = self.state.lock();
        state.connected = false;
        state.joined_room = None;
        // Ends the event stream so a running worker loop can exit.
        state.subscriber = None;
    }
}
