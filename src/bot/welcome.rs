//! Join greeter: a customizable welcome for members entering the room.
//!
//! A single greeting handler is supported; registering another replaces the
//! previous one (last registration wins). Greeting handlers get the same
//! isolation as command handlers: they run as a blocking unit and a failure
//! or panic is logged without touching the event loop.

use log::warn;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::session::{SessionAdapter, SessionError};

/// Handler invoked with the joining member's room handle. A non-empty
/// `Ok(Some(text))` is broadcast to the room.
pub type GreetingHandler = dyn Fn(&str) -> anyhow::Result<Option<String>> + Send + Sync;

/// Shared slot holding the current greeting handler, if any.
#[derive(Clone, Default)]
pub struct WelcomeSlot {
    handler: Arc<RwLock<Option<Arc<GreetingHandler>>>>,
}

impl WelcomeSlot {
    pub fn set<H>(&self, handler: H)
    where
        H: Fn(&str) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        *self.handler.write() = Some(Arc::new(handler));
    }

    fn get(&self) -> Option<Arc<GreetingHandler>> {
        self.handler.read().clone()
    }
}

pub struct Greeter {
    slot: WelcomeSlot,
    session: Arc<dyn SessionAdapter>,
}

impl Greeter {
    pub fn new(slot: WelcomeSlot, session: Arc<dyn SessionAdapter>) -> Self {
        Self { slot, session }
    }

    /// Run the greeting handler for a join event and broadcast a non-empty
    /// result. Without a registered handler this is a no-op.
    pub async fn on_join(&self, handle: &str) -> Result<(), SessionError> {
        let Some(greeting) = self.slot.get() else {
            return Ok(());
        };

        let handle = handle.to_string();
        let unit = tokio::task::spawn_blocking(move || greeting(&handle));
        match unit.await {
            Ok(Ok(Some(message))) if !message.is_empty() => self.session.send(&message).await,
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) => {
                warn!("greeting handler failed: {err:#}");
                Ok(())
            }
            Err(join_err) => {
                warn!("greeting handler panicked: {join_err}");
                Ok(())
            }
        }
    }
}
