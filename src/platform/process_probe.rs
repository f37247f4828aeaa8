//! libc-backed system probe.

use std::env;
use std::ffi::{CStr, OsStr};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::core::probe::{fd_link_path, Stream, SystemProbe, TerminalSize, TtyCommand, UserIdentity};
use crate::error::ProbeError;

#[cfg(unix)]
use libc::{self, c_int};

const TTY_DEVICE: &str = "/dev/tty";
const TTY_COMMAND: &str = "tty";

#[cfg(unix)]
pub(crate) fn is_tty_fd(fd: c_int) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

#[cfg(unix)]
pub(crate) fn read_winsize(fd: c_int) -> Option<TerminalSize> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 {
        TerminalSize::new(size.ws_col, size.ws_row)
    } else {
        None
    }
}

/// Descriptor on the generic terminal device, closed on drop.
#[cfg(unix)]
struct TtyDevice {
    fd: c_int,
}

#[cfg(unix)]
impl TtyDevice {
    fn open(path: &CStr) -> io::Result<Self> {
        // Non-blocking and without acquiring a controlling terminal.
        let flags = libc::O_RDONLY | libc::O_NONBLOCK | libc::O_NOCTTY | libc::O_CLOEXEC;
        let fd = unsafe { libc::open(path.as_ptr(), flags) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd })
    }
}

#[cfg(unix)]
impl Drop for TtyDevice {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

/// Locate the `tty` executable in a `PATH`-style list.
pub fn find_tty_command(paths: Option<&OsStr>) -> Option<PathBuf> {
    match which::which_in(TTY_COMMAND, paths, Path::new(".")) {
        Ok(path) => Some(path),
        Err(err) => {
            debug!(error = %err, "{TTY_COMMAND} not found");
            None
        }
    }
}

/// Parse the `Umask:` line of a `/proc/<pid>/status` file.
pub fn parse_status_umask(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Umask:"))
        .and_then(|value| u32::from_str_radix(value.trim(), 8).ok())
}

fn run_tty_command() -> TtyCommand {
    let output = Command::new("sh")
        .args(["-c", TTY_COMMAND])
        .stdin(Stdio::inherit())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if output.status.success() {
                TtyCommand::Output(stdout)
            } else if stdout.is_empty() {
                TtyCommand::Failed(format!("command execution failed: {}", output.status))
            } else {
                TtyCommand::Failed(format!(
                    "command execution failed: {} ({stdout})",
                    output.status
                ))
            }
        }
        Err(err) => TtyCommand::Failed(format!("command execution failed: {err}")),
    }
}

#[cfg(unix)]
fn lookup_user(uid: libc::uid_t) -> Result<UserIdentity, ProbeError> {
    let mut passwd = unsafe { std::mem::zeroed::<libc::passwd>() };
    let mut result: *mut libc::passwd = std::ptr::null_mut();
    let mut buf = vec![0 as libc::c_char; 1024];

    loop {
        let rc = unsafe {
            libc::getpwuid_r(uid, &mut passwd, buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE && buf.len() < 1 << 20 {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 {
            return Err(ProbeError::UserLookup {
                uid,
                source: io::Error::from_raw_os_error(rc),
            });
        }
        break;
    }

    if result.is_null() {
        return Err(ProbeError::UnknownUser { uid });
    }

    // SAFETY: getpwuid_r succeeded; the strings point into `buf`, which is still alive.
    let (name, home) = unsafe {
        (
            CStr::from_ptr(passwd.pw_name).to_string_lossy().into_owned(),
            CStr::from_ptr(passwd.pw_dir).to_string_lossy().into_owned(),
        )
    };
    Ok(UserIdentity {
        name,
        uid,
        gid: passwd.pw_gid,
        home,
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessProbe;

impl ProcessProbe {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl SystemProbe for ProcessProbe {
    fn pid(&self) -> u32 {
        std::process::id()
    }

    fn ppid(&self) -> Option<u32> {
        Some(std::os::unix::process::parent_id())
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        env::current_dir()
    }

    fn current_user(&self) -> Result<UserIdentity, ProbeError> {
        // Primary group from the password entry, not the process gid.
        lookup_user(unsafe { libc::getuid() })
    }

    fn is_tty(&self, stream: Stream) -> bool {
        is_tty_fd(stream.fd())
    }

    fn size(&self, stream: Stream) -> Option<TerminalSize> {
        read_winsize(stream.fd())
    }

    fn read_fd_link(&self, fd: i32) -> io::Result<PathBuf> {
        std::fs::read_link(fd_link_path(fd))
    }

    fn fd_name(&self, fd: i32) -> Option<String> {
        let primary = fd_link_path(fd);
        let fallback = PathBuf::from(format!("/dev/fd/{fd}"));
        [primary, fallback].iter().find_map(|path| match std::fs::read_link(path) {
            Ok(target) => Some(target.display().to_string()),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "fd link unresolved");
                None
            }
        })
    }

    fn open_tty_device(&self) -> io::Result<String> {
        let device = TtyDevice::open(c"/dev/tty")?;
        debug!(fd = device.fd, "opened {TTY_DEVICE}");
        drop(device);
        Ok(TTY_DEVICE.to_string())
    }

    fn tty_command(&self) -> TtyCommand {
        let path_var = env::var_os("PATH");
        match find_tty_command(path_var.as_deref()) {
            Some(path) => {
                debug!(path = %path.display(), "running tty command");
                run_tty_command()
            }
            None => TtyCommand::NotFound,
        }
    }

    fn umask(&self) -> Option<u32> {
        if let Some(mask) = std::fs::read_to_string("/proc/self/status")
            .ok()
            .as_deref()
            .and_then(parse_status_umask)
        {
            return Some(mask);
        }
        // Reading the mask means setting it; put the old value straight back.
        let previous = unsafe { libc::umask(0o022) };
        unsafe {
            libc::umask(previous);
        }
        Some(u32::from(previous))
    }
}

#[cfg(not(unix))]
impl SystemProbe for ProcessProbe {
    fn pid(&self) -> u32 {
        std::process::id()
    }

    fn ppid(&self) -> Option<u32> {
        None
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        env::current_dir()
    }

    fn current_user(&self) -> Result<UserIdentity, ProbeError> {
        Err(ProbeError::UserLookup {
            uid: 0,
            source: io::Error::new(io::ErrorKind::Unsupported, "no password database"),
        })
    }

    fn is_tty(&self, stream: Stream) -> bool {
        use std::io::IsTerminal;

        match stream {
            Stream::Stdin => io::stdin().is_terminal(),
            Stream::Stdout => io::stdout().is_terminal(),
            Stream::Stderr => io::stderr().is_terminal(),
        }
    }

    fn size(&self, _stream: Stream) -> Option<TerminalSize> {
        None
    }

    fn read_fd_link(&self, fd: i32) -> io::Result<PathBuf> {
        std::fs::read_link(fd_link_path(fd))
    }

    fn fd_name(&self, _fd: i32) -> Option<String> {
        None
    }

    fn open_tty_device(&self) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("{TTY_DEVICE} is only available on Unix platforms"),
        ))
    }

    fn tty_command(&self) -> TtyCommand {
        TtyCommand::NotFound
    }

    fn umask(&self) -> Option<u32> {
        None
    }
}
