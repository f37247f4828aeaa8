//! Read-only snapshot of terminal-related environment variables.

use std::collections::BTreeMap;

/// Variables reported in the terminal environment section, in output order.
pub const TERMINAL_ENV_KEYS: [&str; 10] = [
    "TERM",
    "SHELL",
    "COLORTERM",
    "TERM_PROGRAM",
    "TERM_PROGRAM_VERSION",
    "LANG",
    "LC_ALL",
    "LC_CTYPE",
    "SSH_TTY",
    "SSH_CONNECTION",
];

pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment. Non-UTF-8 values are converted lossily.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

/// Fixed in-memory environment.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSnapshot {
    entries: Vec<(&'static str, String)>,
}

impl EnvSnapshot {
    /// Capture the present subset of `keys`; absent keys are left out.
    pub fn capture<E: EnvSource + ?Sized>(source: &E, keys: &[&'static str]) -> Self {
        let entries = keys
            .iter()
            .filter_map(|key| source.var(key).map(|value| (*key, value)))
            .collect();
        Self { entries }
    }

    pub fn terminal<E: EnvSource + ?Sized>(source: &E) -> Self {
        Self::capture(source, &TERMINAL_ENV_KEYS)
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
