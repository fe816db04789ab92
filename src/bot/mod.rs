//! Core bot functionality: the [`MucBot`] public surface and its event loop.
//!
//! Data flow: the session adapter delivers [`SessionEvent`]s over a channel;
//! the event loop routes messages through the validity [`filter`] into the
//! [`dispatch`] path (first-match command lookup in the [`registry`]), join
//! events into the [`welcome`] greeter, and fatal errors into the reconnect
//! [`supervisor`]. Replies go back out through the adapter as room
//! broadcasts.
//!
//! Events are processed strictly in arrival order with at most one handler
//! in flight; a slow handler delays the next event, never overlaps it.

pub mod dispatch;
pub mod filter;
pub mod registry;
pub mod supervisor;
pub mod welcome;

use log::{debug, error, info, warn};
use regex::Regex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{BotConfig, Settings};
use crate::errors::BotError;
use crate::logutil::{self, escape_log};
use crate::session::{SessionAdapter, SessionEvent};

use dispatch::Dispatcher;
use registry::{CommandParams, CommandRegistry};
use supervisor::ReconnectSupervisor;
use welcome::{Greeter, WelcomeSlot};

/// Farewell broadcast before tearing down the session.
const FAREWELL: &str = "Goodbye!";

/// Shared bot state: everything the event-loop worker and the public
/// surface both need. Cheap to clone, all fields are handles.
#[derive(Clone)]
struct Core {
    settings: Arc<Settings>,
    session: Arc<dyn SessionAdapter>,
    registry: CommandRegistry,
    welcome: WelcomeSlot,
}

impl Core {
    /// Process one inbound event. Messages go through the validity filter
    /// and then the dispatcher; joins go to the greeter. A fatal event is
    /// surfaced as an error here — the event loop intercepts those before
    /// routing, so seeing one means there is no supervisor in play.
    async fn route_event(&self, event: SessionEvent) -> Result<(), BotError> {
        match event {
            SessionEvent::Message(msg) => {
                if !filter::is_valid(&msg, &self.settings.nick) {
                    return Ok(());
                }
                // The filter guarantees both are present and non-empty.
                if let (Some(sender), Some(body)) = (msg.sender.as_deref(), msg.body.as_deref()) {
                    debug!(
                        "from: {sender} to: {} body: {}",
                        msg.recipient.as_deref().unwrap_or("-"),
                        escape_log(body)
                    );
                    let dispatcher =
                        Dispatcher::new(self.registry.clone(), self.session.clone());
                    dispatcher.dispatch(sender, body).await?;
                }
                Ok(())
            }
            SessionEvent::Join(join) => {
                debug!("join: {}", join.handle);
                let greeter = Greeter::new(self.welcome.clone(), self.session.clone());
                greeter.on_join(&join.handle).await?;
                Ok(())
            }
            SessionEvent::Fatal(err) => Err(BotError::Session(err)),
        }
    }
}

/// Worker that drains the adapter's event stream until it closes or an
/// unrecoverable failure occurs.
struct EventLoop {
    core: Core,
    supervisor: ReconnectSupervisor,
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl EventLoop {
    async fn run(mut self) -> Result<(), BotError> {
        loop {
            let Some(event) = self.events.recv().await else {
                info!("event stream closed; bot worker exiting");
                return Ok(());
            };
            match event {
                SessionEvent::Fatal(err) => match self.supervisor.recover(&err).await {
                    // Swapping in the fresh receiver drops the stale
                    // subscription, so reconnects cannot double-deliver.
                    Ok(events) => self.events = events,
                    Err(recover_err) => {
                        error!("{recover_err}");
                        return Err(recover_err);
                    }
                },
                other => {
                    if let Err(err) = self.core.route_event(other).await {
                        warn!("event handling error: {err}");
                    }
                }
            }
        }
    }
}

/// An event-driven command bot bound to one chat room.
///
/// ```no_run
/// use std::sync::Arc;
/// use mucbot::{BotConfig, MucBot};
/// use mucbot::session::memory::MemorySession;
/// use regex::Regex;
///
/// # async fn demo() -> Result<(), mucbot::BotError> {
/// let config = BotConfig {
///     nick: Some("bot".into()),
///     server: Some("example.com".into()),
///     password: Some("secret".into()),
///     room: Some("myroom".into()),
///     ..Default::default()
/// };
///
/// let mut bot = MucBot::new(config, MemorySession::new()).await?;
/// bot.register_command(Regex::new(r"^rand$").unwrap(), |_sender, _params| {
///     Ok(Some("4".to_string())) // chosen by fair dice roll
/// });
/// bot.welcome(|handle| Ok(Some(format!("Hello {handle}!"))));
/// bot.join().await?;
/// # Ok(())
/// # }
/// ```
pub struct MucBot {
    core: Core,
    worker: Option<JoinHandle<Result<(), BotError>>>,
}

impl MucBot {
    /// Validate and normalize `config`, then authenticate against the
    /// server. The room is entered later, by [`join`](Self::join).
    ///
    /// Fails with [`BotError::Config`] when a required field is missing and
    /// with [`BotError::Session`] when the adapter rejects the connect.
    pub async fn new(
        config: BotConfig,
        session: Arc<dyn SessionAdapter>,
    ) -> Result<Self, BotError> {
        let settings = Arc::new(config.normalize()?);
        if settings.debug {
            logutil::init_debug_logging();
        }

        session.connect(&settings.jid, &settings.password).await?;
        info!("connected as {}", settings.jid);

        Ok(Self {
            core: Core {
                settings,
                session,
                registry: CommandRegistry::new(),
                welcome: WelcomeSlot::default(),
            },
            worker: None,
        })
    }

    /// Add a command to the bot's repertoire.
    ///
    /// The pattern is tested against each valid incoming message (trimmed).
    /// Capture groups become the handler's [`CommandParams`]: none, a single
    /// scalar, or an ordered sequence. Commands are tried in registration
    /// order and only the first match fires. A non-empty `Ok(Some(text))`
    /// return is broadcast to the room.
    ///
    /// Registration is allowed before or after joining; entries live for the
    /// lifetime of the bot.
    pub fn register_command<H>(&self, pattern: Regex, handler: H)
    where
        H: Fn(&str, CommandParams) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.core.registry.register(pattern, handler);
    }

    /// Set the welcome message handler for members joining the room. Only
    /// one handler is kept; the last registration wins.
    ///
    /// ```ignore
    /// bot.welcome(|handle| Ok(Some(format!("Hello {handle}!"))));
    /// ```
    pub fn welcome<H>(&self, handler: H)
    where
        H: Fn(&str) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.core.welcome.set(handler);
    }

    /// Enter the room and start processing events.
    ///
    /// With `keep_alive` (the default) this blocks the caller for the
    /// lifetime of the session, which keeps a bot-only process alive. With
    /// `keep_alive = false` the event loop runs on a background task and
    /// control returns to the caller, who may keep using
    /// [`send`](Self::send), register further commands, or block later via
    /// [`wait`](Self::wait).
    pub async fn join(&mut self) -> Result<(), BotError> {
        // Subscribe first so nothing delivered during the join is lost.
        let events = self.core.session.subscribe();
        let room_jid = self.core.settings.room_jid();
        self.core.session.join_room(&room_jid).await?;
        info!("joined {room_jid}");

        let event_loop = EventLoop {
            core: self.core.clone(),
            supervisor: ReconnectSupervisor::new(
                self.core.settings.clone(),
                self.core.session.clone(),
            ),
            events,
        };
        let handle = tokio::spawn(event_loop.run());

        if self.core.settings.keep_alive {
            Self::join_worker(handle).await
        } else {
            self.worker = Some(handle);
            Ok(())
        }
    }

    /// Block until the event loop finishes (stream closed or recovery
    /// failed). No-op when `keep_alive` already consumed the worker or
    /// [`join`](Self::join) has not run.
    pub async fn wait(&mut self) -> Result<(), BotError> {
        match self.worker.take() {
            Some(handle) => Self::join_worker(handle).await,
            None => Ok(()),
        }
    }

    async fn join_worker(handle: JoinHandle<Result<(), BotError>>) -> Result<(), BotError> {
        match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(BotError::Internal(format!(
                "event loop task failed: {join_err}"
            ))),
        }
    }

    /// Broadcast a message to the room.
    pub async fn send(&self, text: &str) -> Result<(), BotError> {
        self.core.session.send(text).await?;
        Ok(())
    }

    /// Send a farewell and tear down the session. A no-op when already
    /// disconnected; there is no way to restart a disconnected bot.
    pub async fn disconnect(&self) {
        if !self.core.session.is_connected() {
            return;
        }
        if let Err(err) = self.core.session.send(FAREWELL).await {
            debug!("farewell send failed: {err}");
        }
        self.core.session.disconnect().await;
        info!("disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.core.session.is_connected()
    }

    /// Process a single event inline, without the background worker.
    ///
    /// This is the event loop's body. It is public so embedders with their
    /// own run loop (and tests) can drive the bot directly. Fatal events
    /// return an error here instead of triggering reconnection.
    pub async fn route_event(&self, event: SessionEvent) -> Result<(), BotError> {
        self.core.route_event(event).await
    }
}
