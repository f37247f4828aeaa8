//! Environment reporter: ordered, independent, best-effort inspections.

use std::io::{self, Write};

use tracing::debug;

use crate::core::env_snapshot::{EnvSnapshot, EnvSource};
use crate::core::probe::{fd_link_path, size_source, Stream, SystemProbe, TtyCommand};

const FD_RANGE: std::ops::RangeInclusive<i32> = 0..=3;

pub struct EnvReport<'a, P: SystemProbe + ?Sized, E: EnvSource + ?Sized> {
    probe: &'a P,
    env: &'a E,
    skip_tty_command: bool,
}

impl<'a, P: SystemProbe + ?Sized, E: EnvSource + ?Sized> EnvReport<'a, P, E> {
    pub fn new(probe: &'a P, env: &'a E) -> Self {
        Self {
            probe,
            env,
            skip_tty_command: false,
        }
    }

    pub fn skip_tty_command(mut self, skip: bool) -> Self {
        self.skip_tty_command = skip;
        self
    }

    /// Write the whole report. Only a failing writer stops it.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "=== Terminal / environment summary ===")?;
        self.write_platform(out)?;
        self.write_process(out)?;
        self.write_terminal_env(out)?;
        self.write_tty_detection(out)?;
        self.write_controlling_tty(out)?;
        self.write_other_env(out)?;
        self.write_fd_names(out)?;
        writeln!(out)?;
        writeln!(out, "=== End ===")
    }

    fn write_platform<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "OS: {}", std::env::consts::OS)?;
        writeln!(out, "ARCH: {}", std::env::consts::ARCH)?;
        writeln!(out)
    }

    fn write_process<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "PID: {}", self.probe.pid())?;
        match self.probe.ppid() {
            Some(ppid) => writeln!(out, "PPID: {ppid}")?,
            None => writeln!(out, "PPID: unavailable")?,
        }

        match self.probe.working_dir() {
            Ok(dir) => writeln!(out, "Working dir: {}", dir.display())?,
            Err(err) => {
                debug!(error = %err, "working directory unresolved");
                writeln!(out, "Working dir: <error: {err}>")?;
            }
        }

        match self.probe.current_user() {
            Ok(user) => writeln!(
                out,
                "User: {} (UID: {}, GID: {}) Home: {}",
                user.name, user.uid, user.gid, user.home
            ),
            Err(err) => {
                debug!(error = %err, "user lookup failed");
                writeln!(out, "User: <error: {err}>")
            }
        }
    }

    fn write_terminal_env<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "--- Terminal environment variables ---")?;
        let snapshot = EnvSnapshot::terminal(self.env);
        for (key, value) in snapshot.entries() {
            writeln!(out, "{key}={value}")?;
        }
        writeln!(out)
    }

    fn write_tty_detection<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let mut stdin_tty = false;
        let mut stdout_tty = false;
        for stream in Stream::ALL {
            let is_tty = self.probe.is_tty(stream);
            match stream {
                Stream::Stdin => stdin_tty = is_tty,
                Stream::Stdout => stdout_tty = is_tty,
                Stream::Stderr => {}
            }
            writeln!(out, "{} is TTY: {is_tty}", stream.label())?;
        }

        let size = size_source(stdin_tty, stdout_tty).and_then(|stream| self.probe.size(stream));
        match size {
            Some(size) => writeln!(
                out,
                "Terminal size: cols={} rows={}",
                size.cols(),
                size.rows()
            ),
            None => writeln!(out, "Terminal size: unavailable"),
        }
    }

    fn write_controlling_tty<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "--- Controlling TTY / fd info (best-effort) ---")?;

        let link = fd_link_path(0);
        match self.probe.read_fd_link(0) {
            Ok(target) => writeln!(out, "{} -> {}", link.display(), target.display())?,
            Err(err) => writeln!(out, "{} -> {err}", link.display())?,
        }

        match self.probe.open_tty_device() {
            Ok(name) => writeln!(out, "Opened /dev/tty: {name}")?,
            Err(err) => writeln!(out, "/dev/tty: {err}")?,
        }

        if let Some(ssh_tty) = self.env.var("SSH_TTY").filter(|value| !value.is_empty()) {
            writeln!(out, "SSH_TTY (env) = {ssh_tty}")?;
        }

        if self.skip_tty_command {
            return writeln!(out, "`tty` command skipped");
        }
        match self.probe.tty_command() {
            TtyCommand::Output(name) => writeln!(out, "`tty` command -> {name}"),
            TtyCommand::Failed(err) => writeln!(out, "`tty` command error: {err}"),
            TtyCommand::NotFound => writeln!(out, "`tty` command not found in PATH"),
        }
    }

    fn write_other_env<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "--- Other environment information ---")?;
        writeln!(out, "PATH={}", self.env.var("PATH").unwrap_or_default())?;
        writeln!(out, "HOME={}", self.env.var("HOME").unwrap_or_default())?;
        match self.probe.umask() {
            Some(mask) => writeln!(out, "umask={mask:04o}"),
            None => writeln!(out, "umask: unavailable"),
        }
    }

    fn write_fd_names<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "--- FDs -> names (fd 0..3) ---")?;
        for fd in FD_RANGE {
            let name = self.probe.fd_name(fd);
            writeln!(out, "fd {fd} -> {}", name.as_deref().unwrap_or("unknown"))?;
        }
        Ok(())
    }
}
