//! Message-validity filter.
//!
//! Decides whether an incoming room message is eligible for command parsing.
//! Pure predicate, no side effects.

use crate::session::{MessageKind, RoomMessage};

/// A message is actionable iff all of the following hold:
/// - it is a room broadcast (groupchat), not a private or system message;
/// - the sender handle is present and non-empty;
/// - the sender is not the bot itself (self-echo loop prevention);
/// - the body is present and non-empty;
/// - it is not a delayed history replay from the join.
pub fn is_valid(msg: &RoomMessage, own_nick: &str) -> bool {
    msg.kind == MessageKind::Groupchat
        && msg
            .sender
            .as_deref()
            .is_some_and(|s| !s.is_empty() && s != own_nick)
        && msg.body.as_deref().is_some_and(|b| !b.is_empty())
        && !msg.delayed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_msg() -> RoomMessage {
        RoomMessage::broadcast("alice", "rand")
    }

    #[test]
    fn live_broadcast_is_valid() {
        assert!(is_valid(&valid_msg(), "bot"));
    }

    #[test]
    fn private_and_system_kinds_are_invalid() {
        let mut msg = valid_msg();
        msg.kind = MessageKind::Private;
        assert!(!is_valid(&msg, "bot"));
        msg.kind = MessageKind::System;
        assert!(!is_valid(&msg, "bot"));
    }

    #[test]
    fn missing_or_empty_sender_is_invalid() {
        let mut msg = valid_msg();
        msg.sender = None;
        assert!(!is_valid(&msg, "bot"));
        msg.sender = Some(String::new());
        assert!(!is_valid(&msg, "bot"));
    }

    #[test]
    fn own_nick_is_invalid() {
        let mut msg = valid_msg();
        msg.sender = Some("bot".into());
        assert!(!is_valid(&msg, "bot"));
    }

    #[test]
    fn missing_or_empty_body_is_invalid() {
        let mut msg = valid_msg();
        msg.body = None;
        assert!(!is_valid(&msg, "bot"));
        msg.body = Some(String::new());
        assert!(!is_valid(&msg, "bot"));
    }

    #[test]
    fn delayed_history_is_invalid() {
        let mut msg = valid_msg();
        msg.delayed = true;
        assert!(!is_valid(&msg, "bot"));
    }
}
