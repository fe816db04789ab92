//! Command registry: an ordered list of (pattern, handler) entries with
//! first-match lookup.
//!
//! Registration order is the match-priority order. Duplicate and overlapping
//! patterns are allowed; only the first matching entry fires per message.
//! The entry list is append-only behind a read-write lock so registration
//! can happen concurrently with dispatch; lookups clone the matching entry's
//! `Arc` out under a short read lock before any handler runs.

use parking_lot::RwLock;
use regex::{Captures, Regex};
use std::sync::Arc;

/// Parameters extracted from a command pattern's capture groups.
///
/// The shape follows capture arity so handler signatures stay precise:
/// zero groups give [`CommandParams::None`], one gives a single scalar,
/// two or more give an ordered sequence in capture order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParams {
    None,
    One(String),
    Many(Vec<String>),
}

/// Handler invoked with the sender's room handle and the extracted params.
/// A non-empty `Ok(Some(text))` is broadcast back to the room.
pub type CommandHandler =
    dyn Fn(&str, CommandParams) -> anyhow::Result<Option<String>> + Send + Sync;

/// One registered command. Immutable once registered.
pub struct CommandEntry {
    pattern: Regex,
    handler: Box<CommandHandler>,
}

impl CommandEntry {
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn invoke(&self, sender: &str, params: CommandParams) -> anyhow::Result<Option<String>> {
        (self.handler)(sender, params)
    }
}

/// Ordered, append-only command list shared between registration and
/// dispatch. Cloning the registry clones the shared list handle.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    entries: Arc<RwLock<Vec<Arc<CommandEntry>>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command. No duplicate detection; an entry registered twice
    /// is tried twice, in order.
    pub fn register<H>(&self, pattern: Regex, handler: H)
    where
        H: Fn(&str, CommandParams) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        let entry = Arc::new(CommandEntry {
            pattern,
            handler: Box::new(handler),
        });
        self.entries.write().push(entry);
    }

    /// Scan entries in registration order and return the first whose pattern
    /// matches the trimmed text, plus its extracted params.
    ///
    /// Linear over the entry list; command sets are tens of entries, not
    /// thousands.
    pub fn find_first_match(&self, text: &str) -> Option<(Arc<CommandEntry>, CommandParams)> {
        let trimmed = text.trim();
        let entries = self.entries.read();
        for entry in entries.iter() {
            if let Some(caps) = entry.pattern.captures(trimmed) {
                return Some((entry.clone(), extract_params(&caps)));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn extract_params(caps: &Captures<'_>) -> CommandParams {
    match caps.len() - 1 {
        0 => CommandParams::None,
        1 => match caps.get(1) {
            Some(m) => CommandParams::One(m.as_str().to_string()),
            // An optional group that did not participate carries nothing.
            None => CommandParams::None,
        },
        n => CommandParams::Many(
            (1..=n)
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_captures_yield_no_params() {
        let registry = CommandRegistry::new();
        registry.register(Regex::new(r"^rand$").unwrap(), |_, _| Ok(None));
        let (_, params) = registry.find_first_match("rand").unwrap();
        assert_eq!(params, CommandParams::None);
    }

    #[test]
    fn one_capture_yields_scalar() {
        let registry = CommandRegistry::new();
        registry.register(Regex::new(r"^echo\s+(.+)$").unwrap(), |_, _| Ok(None));
        let (_, params) = registry.find_first_match("echo hello world").unwrap();
        assert_eq!(params, CommandParams::One("hello world".into()));
    }

    #[test]
    fn multiple_captures_yield_sequence_in_order() {
        let registry = CommandRegistry::new();
        registry.register(Regex::new(r"^rand2\s+(\d+)\s+(\d+)$").unwrap(), |_, _| Ok(None));
        let (_, params) = registry.find_first_match("rand2 3 9").unwrap();
        assert_eq!(params, CommandParams::Many(vec!["3".into(), "9".into()]));
    }

    #[test]
    fn input_is_trimmed_before_matching() {
        let registry = CommandRegistry::new();
        registry.register(Regex::new(r"^rand$").unwrap(), |_, _| Ok(None));
        assert!(registry.find_first_match("  rand  ").is_some());
    }

    #[test]
    fn first_registered_entry_wins() {
        let registry = CommandRegistry::new();
        registry.register(Regex::new(r"^cmd$").unwrap(), |_, _| Ok(Some("first".into())));
        registry.register(Regex::new(r"^cmd$").unwrap(), |_, _| Ok(Some("second".into())));
        let (entry, params) = registry.find_first_match("cmd").unwrap();
        assert_eq!(entry.invoke("alice", params).unwrap(), Some("first".into()));
    }

    #[test]
    fn duplicates_are_preserved_not_deduplicated() {
        let registry = CommandRegistry::new();
        registry.register(Regex::new(r"^cmd$").unwrap(), |_, _| Ok(None));
        registry.register(Regex::new(r"^cmd$").unwrap(), |_, _| Ok(None));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn no_match_returns_none() {
        let registry = CommandRegistry::new();
        registry.register(Regex::new(r"^rand$").unwrap(), |_, _| Ok(None));
        assert!(registry.find_first_match("something else").is_none());
    }

    #[test]
    fn unmatched_optional_single_group_yields_no_params() {
        let registry = CommandRegistry::new();
        registry.register(Regex::new(r"^stats(?:\s+(\w+))?$").unwrap(), |_, _| Ok(None));
        let (_, params) = registry.find_first_match("stats").unwrap();
        assert_eq!(params, CommandParams::None);
        let (_, params) = registry.find_first_match("stats daily").unwrap();
        assert_eq!(params, CommandParams::One("daily".into()));
    }
}
