//! Dispatcher: first-match command invocation and reply delivery.
//!
//! Each matched handler runs as its own blocking unit of work
//! (`tokio::task::spawn_blocking`) and the dispatch call awaits its
//! completion before returning, so handlers are serialized per bot and the
//! event loop sees at most one handler in flight. Running handlers on a
//! separate task also isolates panics: a panicking handler is logged and the
//! event-processing path stays alive.

use log::{debug, warn};
use std::sync::Arc;

use crate::bot::registry::CommandRegistry;
use crate::logutil::escape_log;
use crate::session::{SessionAdapter, SessionError};

pub struct Dispatcher {
    registry: CommandRegistry,
    session: Arc<dyn SessionAdapter>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, session: Arc<dyn SessionAdapter>) -> Self {
        Self { registry, session }
    }

    /// Match `raw_text` against the registry and fire the first matching
    /// handler. Unmatched messages are a silent no-op. A non-empty handler
    /// result is broadcast to the room; handler errors and panics are logged
    /// and swallowed.
    pub async fn dispatch(&self, sender: &str, raw_text: &str) -> Result<(), SessionError> {
        let Some((entry, params)) = self.registry.find_first_match(raw_text) else {
            return Ok(());
        };
        debug!(
            "command match for {sender}: /{}/ on '{}'",
            entry.pattern(),
            escape_log(raw_text.trim())
        );

        let sender = sender.to_string();
        let unit = tokio::task::spawn_blocking(move || entry.invoke(&sender, params));
        match unit.await {
            Ok(Ok(Some(response))) if !response.is_empty() => self.session.send(&response).await,
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) => {
                warn!("command handler failed: {err:#}");
                Ok(())
            }
            Err(join_err) => {
                warn!("command handler panicked: {join_err}");
                Ok(())
            }
        }
    }
}
