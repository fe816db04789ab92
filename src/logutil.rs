//! Logging utilities: single-line sanitization for user-supplied chat bodies
//! and the optional debug-logging bootstrap tied to the config `debug` flag.

/// Escape a message body for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///   Other control characters become `\xNN`. Bodies longer than the preview
///   cap are truncated with an ellipsis; chat messages are short and logs
///   should stay that way too.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 160;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Install a debug-level logger for the whole process.
///
/// Called from [`MucBot::new`](crate::bot::MucBot::new) when the config sets
/// `debug = true`, mirroring a library-wide debug switch. A logger already
/// installed by the host application wins; the error from `try_init` is
/// ignored.
pub fn init_debug_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
