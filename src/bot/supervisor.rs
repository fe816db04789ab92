//! Reconnect supervisor: re-establishes the session after a fatal error.
//!
//! Two states, Connected and Reconnecting. A fatal event moves the
//! supervisor into Reconnecting and triggers exactly one recovery attempt:
//! re-authenticate with the stored credentials, take a fresh event
//! subscription, and re-enter the room. Success returns the new receiver and
//! moves back to Connected; the event loop swaps the receiver in, which
//! drops the stale subscription wholesale. Repeated reconnects therefore
//! never accumulate duplicate subscriptions or duplicate command firing.
//!
//! There is no retry cap or backoff: one attempt per fatal event, and a
//! failed attempt surfaces as [`BotError::Reconnect`].

use log::{info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::errors::BotError;
use crate::session::{SessionAdapter, SessionError, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Reconnecting,
}

pub struct ReconnectSupervisor {
    settings: Arc<Settings>,
    session: Arc<dyn SessionAdapter>,
    state: LinkState,
}

impl ReconnectSupervisor {
    /// Entered in the Connected state, after the initial connect and join.
    pub fn new(settings: Arc<Settings>, session: Arc<dyn SessionAdapter>) -> Self {
        Self {
            settings,
            session,
            state: LinkState::Connected,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Recover from a fatal session error. Returns the fresh event receiver
    /// to swap into the event loop.
    pub async fn recover(
        &mut self,
        cause: &SessionError,
    ) -> Result<mpsc::UnboundedReceiver<SessionEvent>, BotError> {
        self.state = LinkState::Reconnecting;
        warn!("session failure ({cause}); reconnecting as {}", self.settings.jid);

        self.session
            .connect(&self.settings.jid, &self.settings.password)
            .await
            .map_err(BotError::Reconnect)?;
        // Subscribe before joining so no event between join and subscribe
        // can be lost.
        let events = self.session.subscribe();
        self.session
            .join_room(&self.settings.room_jid())
            .await
            .map_err(BotError::Reconnect)?;

        self.state = LinkState::Connected;
        info!("reconnected and rejoined {}", self.settings.room_jid());
        Ok(events)
    }
}
