//! Bot configuration: the caller-facing [`BotConfig`] and its normalized,
//! read-only form [`Settings`].
//!
//! Configuration is provided programmatically (struct literal over public
//! fields) or loaded from a TOML file with [`BotConfig::load`]. Identity
//! fields are optional on `BotConfig` so that validation, not
//! deserialization, reports what is missing. [`BotConfig::normalize`] runs
//! exactly once, at bot construction:
//!
//! - an explicit `jid` is split on `@` into `nick` and `server`;
//! - otherwise `jid` is derived as `nick@server`;
//! - `keep_alive` defaults to true, `debug` to false;
//! - a missing nick/jid, server, password, or room is a
//!   [`BotError::Config`].
//!
//! The resulting [`Settings`] is never mutated afterwards.

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

use crate::errors::BotError;

fn default_keep_alive() -> bool {
    true
}

/// Raw bot configuration as supplied by the caller or a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    /// Room handle the bot appears under. Derived from `jid` when absent.
    #[serde(default)]
    pub nick: Option<String>,
    /// Chat server host. Derived from `jid` when absent.
    #[serde(default)]
    pub server: Option<String>,
    /// Full account identifier (`nick@server`). Wins over explicit
    /// `nick`/`server` when present.
    #[serde(default)]
    pub jid: Option<String>,
    pub password: Option<String>,
    /// Room name, joined as `room@conference.<server>`.
    pub room: Option<String>,
    /// Enable debug-level logging for the process.
    #[serde(default)]
    pub debug: bool,
    /// Block the caller inside `join()` to keep the process alive.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: bool,
}

impl BotConfig {
    /// Load configuration from a TOML file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file: {path}"))?;
        let config: BotConfig =
            toml::from_str(&content).with_context(|| format!("invalid config file: {path}"))?;
        Ok(config)
    }

    /// Validate and derive the read-only [`Settings`].
    pub fn normalize(self) -> Result<Settings, BotError> {
        let password = non_empty(self.password).ok_or(BotError::Config("password"))?;
        let room = non_empty(self.room).ok_or(BotError::Config("room"))?;

        let (nick, server, jid) = match non_empty(self.jid) {
            Some(jid) => {
                let (nick, server) = jid.split_once('@').ok_or(BotError::Config("jid"))?;
                if nick.is_empty() || server.is_empty() {
                    return Err(BotError::Config("jid"));
                }
                (nick.to_string(), server.to_string(), jid)
            }
            None => {
                let nick = non_empty(self.nick).ok_or(BotError::Config("nick"))?;
                let server = non_empty(self.server).ok_or(BotError::Config("server"))?;
                let jid = format!("{nick}@{server}");
                (nick, server, jid)
            }
        };

        Ok(Settings {
            nick,
            server,
            jid,
            password,
            room,
            debug: self.debug,
            keep_alive: self.keep_alive,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Normalized configuration. All fields are concrete and never change for
/// the lifetime of the bot.
#[derive(Debug, Clone)]
pub struct Settings {
    pub nick: String,
    pub server: String,
    pub jid: String,
    pub password: String,
    pub room: String,
    pub debug: bool,
    pub keep_alive: bool,
}

impl Settings {
    /// Full room JID used to enter the room under the bot's nick.
    pub fn room_jid(&self) -> String {
        format!("{}@conference.{}/{}", self.room, self.server, self.nick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BotConfig {
        BotConfig {
            nick: Some("bot".into()),
            server: Some("example.com".into()),
            password: Some("secret".into()),
            room: Some("myroom".into()),
            ..Default::default()
        }
    }

    #[test]
    fn derives_jid_from_nick_and_server() {
        let settings = base().normalize().unwrap();
        assert_eq!(settings.jid, "bot@example.com");
        assert_eq!(settings.nick, "bot");
        assert_eq!(settings.server, "example.com");
    }

    #[test]
    fn splits_explicit_jid() {
        let config = BotConfig {
            jid: Some("x@y".into()),
            password: Some("secret".into()),
            room: Some("myroom".into()),
            ..Default::default()
        };
        let settings = config.normalize().unwrap();
        assert_eq!(settings.nick, "x");
        assert_eq!(settings.server, "y");
        assert_eq!(settings.jid, "x@y");
    }

    #[test]
    fn explicit_jid_wins_over_nick_and_server() {
        let mut config = base();
        config.jid = Some("other@elsewhere.net".into());
        let settings = config.normalize().unwrap();
        assert_eq!(settings.nick, "other");
        assert_eq!(settings.server, "elsewhere.net");
    }

    #[test]
    fn missing_fields_are_config_errors() {
        for strip in ["nick", "server", "password", "room"] {
            let mut config = base();
            match strip {
                "nick" => config.nick = None,
                "server" => config.server = None,
                "password" => config.password = None,
                "room" => config.room = None,
                _ => unreachable!(),
            }
            let err = config.normalize().unwrap_err();
            assert!(
                matches!(err, BotError::Config(field) if field == strip),
                "expected ConfigError for {strip}, got {err:?}"
            );
        }
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let mut config = base();
        config.password = Some(String::new());
        assert!(matches!(
            config.normalize(),
            Err(BotError::Config("password"))
        ));
    }

    #[test]
    fn malformed_jid_is_rejected() {
        let config = BotConfig {
            jid: Some("no-at-sign".into()),
            password: Some("secret".into()),
            room: Some("myroom".into()),
            ..Default::default()
        };
        assert!(matches!(config.normalize(), Err(BotError::Config("jid"))));
    }

    #[test]
    fn defaults_keep_alive_true_debug_false() {
        let config: BotConfig = toml::from_str(
            r#"
            nick = "bot"
            server = "example.com"
            password = "secret"
            room = "myroom"
            "#,
        )
        .unwrap();
        assert!(config.keep_alive);
        assert!(!config.debug);
    }

    #[test]
    fn room_jid_format() {
        let settings = base().normalize().unwrap();
        assert_eq!(settings.room_jid(), "myroom@conference.example.com/bot");
    }
}
