//! Test utilities & fixtures shared by the integration tests.

use std::sync::Arc;
use std::time::Duration;

use mucbot::session::memory::MemorySession;
use mucbot::session::{RoomMessage, SessionEvent};
use mucbot::{BotConfig, MucBot};

/// Baseline config used across the suite; keep_alive is off so `join()`
/// returns and the tests drive the bot themselves.
pub fn test_config() -> BotConfig {
    BotConfig {
        nick: Some("bot".into()),
        server: Some("s".into()),
        password: Some("p".into()),
        room: Some("r".into()),
        keep_alive: false,
        ..Default::default()
    }
}

/// A connected bot on a fresh in-memory session.
pub async fn test_bot() -> (MucBot, Arc<MemorySession>) {
    let session = MemorySession::new();
    let bot = MucBot::new(test_config(), session.clone())
        .await
        .expect("bot construction");
    (bot, session)
}

/// A live broadcast message event.
pub fn msg(sender: &str, body: &str) -> SessionEvent {
    SessionEvent::Message(RoomMessage::broadcast(sender, body))
}

/// Poll until `cond` holds or a two-second deadline passes. Returns the
/// final value of `cond`.
#[allow(dead_code)] // not every test file uses the async helpers
pub async fn wait_until<F: Fn() -> bool>(cond: F) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
