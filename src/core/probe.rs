//! System probe trait and the value types it returns.

use std::io;
use std::path::PathBuf;

use crate::error::ProbeError;

/// Standard streams that can be tested for a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

impl Stream {
    pub const ALL: [Stream; 3] = [Stream::Stdin, Stream::Stdout, Stream::Stderr];

    pub fn fd(self) -> i32 {
        match self {
            Stream::Stdin => 0,
            Stream::Stdout => 1,
            Stream::Stderr => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stream::Stdin => "Stdin",
            Stream::Stdout => "Stdout",
            Stream::Stderr => "Stderr",
        }
    }
}

/// Terminal dimensions. Both sides are always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    cols: u16,
    rows: u16,
}

impl TerminalSize {
    pub fn new(cols: u16, rows: u16) -> Option<Self> {
        if cols > 0 && rows > 0 {
            Some(Self { cols, rows })
        } else {
            None
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }
}

/// Outcome of running the external `tty` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtyCommand {
    NotFound,
    Output(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: String,
}

/// Every OS query the reporters make. Each call is independent and best-effort.
pub trait SystemProbe {
    fn pid(&self) -> u32;

    fn ppid(&self) -> Option<u32>;

    fn working_dir(&self) -> io::Result<PathBuf>;

    fn current_user(&self) -> Result<UserIdentity, ProbeError>;

    /// Must not block, and must answer `false` for closed or invalid descriptors.
    fn is_tty(&self, stream: Stream) -> bool;

    fn size(&self, stream: Stream) -> Option<TerminalSize>;

    /// Resolve the per-process descriptor link for `fd`.
    fn read_fd_link(&self, fd: i32) -> io::Result<PathBuf>;

    /// Resolve `fd` through the primary link, then the `/dev/fd` convention.
    fn fd_name(&self, fd: i32) -> Option<String>;

    /// Open the generic terminal device, report its name, and close it again.
    fn open_tty_device(&self) -> io::Result<String>;

    fn tty_command(&self) -> TtyCommand;

    fn umask(&self) -> Option<u32>;
}

/// Path of the per-process link describing descriptor `fd`.
pub fn fd_link_path(fd: i32) -> PathBuf {
    if cfg!(target_os = "linux") {
        PathBuf::from(format!("/proc/self/fd/{fd}"))
    } else {
        PathBuf::from(format!("/dev/fd/{fd}"))
    }
}

/// Pick the stream whose size should be reported: stdout first, then stdin.
pub fn size_source(stdin_tty: bool, stdout_tty: bool) -> Option<Stream> {
    if stdout_tty {
        Some(Stream::Stdout)
    } else if stdin_tty {
        Some(Stream::Stdin)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{size_source, Stream, TerminalSize};

    #[test]
    fn zero_dimensions_are_not_a_size() {
        assert!(TerminalSize::new(0, 24).is_none());
        assert!(TerminalSize::new(80, 0).is_none());
        assert!(TerminalSize::new(0, 0).is_none());
        let size = TerminalSize::new(80, 24).expect("positive size");
        assert_eq!((size.cols(), size.rows()), (80, 24));
    }

    #[test]
    fn stdout_is_preferred_for_size() {
        assert_eq!(size_source(true, true), Some(Stream::Stdout));
        assert_eq!(size_source(true, false), Some(Stream::Stdin));
        assert_eq!(size_source(false, true), Some(Stream::Stdout));
        assert_eq!(size_source(false, false), None);
    }
}
