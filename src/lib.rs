//! Best-effort terminal environment diagnostics.
//!
//! Every inspection is independent: a failed probe is printed inline and the
//! report carries on. OS access goes through [`SystemProbe`]; [`ProcessProbe`]
//! is the libc-backed implementation.
//!
//! # Modes
//! - [`Mode::Env`]: platform, process, user, terminal variables, TTY detection,
//!   terminal size, controlling TTY, umask and descriptor names.
//! - [`Mode::Width`]: code point, encoded length and display width of sample
//!   characters or caller-supplied text.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod platform;
pub mod report;

pub use crate::cli::{run, Cli, Mode};
pub use crate::config::EnvConfig;
pub use crate::core::env_snapshot::{EnvSnapshot, EnvSource, MapEnv, ProcessEnv, TERMINAL_ENV_KEYS};
pub use crate::core::probe::{
    fd_link_path, size_source, Stream, SystemProbe, TerminalSize, TtyCommand, UserIdentity,
};
pub use crate::core::text::samples::{Sample, SAMPLES};
pub use crate::core::text::width::{codepoint_width, grapheme_width, inspect, CodePointInfo};
pub use crate::error::ProbeError;
pub use crate::platform::{ProcessProbe, TerminalSession};
pub use crate::report::{width_line, write_width_report, EnvReport};
