//! Command-line surface and mode dispatch.

use std::io::Write;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::config::EnvConfig;
use crate::core::env_snapshot::EnvSource;
use crate::core::probe::SystemProbe;
use crate::error::{ProbeError, Result};
use crate::platform::TerminalSession;
use crate::report::{write_width_report, EnvReport};

#[derive(Debug, Parser)]
#[command(name = "term-probe", version, about = "Inspect the terminal environment of this process")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Mode>,

    /// Do not run the external `tty` command.
    #[arg(long, global = true)]
    pub no_tty_command: bool,

    /// Print the width table without opening a terminal session.
    #[arg(long, global = true)]
    pub no_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Mode {
    /// Report process, user, environment and TTY details (default).
    Env,
    /// Report code point and display width for sample characters or TEXT.
    Width {
        /// Text to inspect instead of the built-in samples.
        texts: Vec<String>,
    },
    /// Run `env` followed by `width`.
    All,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        self.command.clone().unwrap_or(Mode::Env)
    }
}

/// Run the selected mode, writing the report to `out`.
pub fn run<P, E, W>(mode: &Mode, config: &EnvConfig, probe: &P, env: &E, out: &mut W) -> Result<()>
where
    P: SystemProbe + ?Sized,
    E: EnvSource + ?Sized,
    W: Write + ?Sized,
{
    debug!(?mode, ?config, "running");
    match mode {
        Mode::Env => run_env(config, probe, env, out),
        Mode::Width { texts } => run_width(config, texts, out),
        Mode::All => {
            run_env(config, probe, env, out)?;
            writeln!(out).map_err(|err| ProbeError::io("writing report", err))?;
            run_width(config, &[], out)
        }
    }
}

fn run_env<P, E, W>(config: &EnvConfig, probe: &P, env: &E, out: &mut W) -> Result<()>
where
    P: SystemProbe + ?Sized,
    E: EnvSource + ?Sized,
    W: Write + ?Sized,
{
    EnvReport::new(probe, env)
        .skip_tty_command(config.skip_tty_command)
        .write_to(out)
        .and_then(|()| out.flush())
        .map_err(|err| ProbeError::io("writing environment report", err))
}

fn run_width<W: Write + ?Sized>(config: &EnvConfig, texts: &[String], out: &mut W) -> Result<()> {
    let session = if config.skip_session {
        None
    } else {
        match TerminalSession::begin() {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, "continuing without a terminal session");
                None
            }
        }
    };

    write_width_in_session(session, texts, out)
}

/// Write the table, then close `session`. A failed restore is logged only.
fn write_width_in_session<W: Write + ?Sized>(
    session: Option<TerminalSession>,
    texts: &[String],
    out: &mut W,
) -> Result<()> {
    write_width_report(out, texts)
        .and_then(|()| out.flush())
        .map_err(|err| ProbeError::io("writing width report", err))?;

    if let Some(session) = session {
        if let Err(err) = session.end() {
            warn!(error = %err, "terminal state not restored");
        }
    }
    Ok(())
}
