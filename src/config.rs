//! Environment configuration.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub log_filter: Option<String>,
    pub skip_tty_command: bool,
    pub skip_session: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_filter: env_string_opt("TERM_PROBE_LOG"),
            skip_tty_command: env_flag("TERM_PROBE_NO_TTY_COMMAND"),
            skip_session: env_flag("TERM_PROBE_NO_SESSION"),
        }
    }

    /// Command-line switches can only turn a skip on.
    pub fn with_overrides(mut self, skip_tty_command: bool, skip_session: bool) -> Self {
        self.skip_tty_command |= skip_tty_command;
        self.skip_session |= skip_session;
        self
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}
