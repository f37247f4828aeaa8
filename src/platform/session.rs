//! Terminal session held open while the width table is produced.
//!
//! Beginning a session on a TTY captures its termios, turns off echo and
//! canonical input so stray keystrokes do not interleave with the table, and
//! restores the captured state when the session ends. Restoration runs on
//! `end()`, on drop, and on SIGINT/SIGTERM.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::ProbeError;

#[cfg(unix)]
use libc::{self, c_int};
#[cfg(unix)]
use signal_hook::{iterator::Signals, low_level::emulate_default_handler};

#[cfg(unix)]
pub(crate) fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Stops the signal listener thread on drop.
#[cfg(unix)]
pub(crate) struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run `cleanup` once on SIGINT/SIGTERM, then let the signal terminate the process.
#[cfg(unix)]
pub(crate) fn install_signal_handlers<F>(cleanup: F) -> io::Result<SignalHookGuard>
where
    F: Fn() + Send + Sync + 'static,
{
    let ran = Arc::new(AtomicBool::new(false));
    let mut signals = Signals::new([libc::SIGINT, libc::SIGTERM])?;
    let handle = signals.handle();

    let thread = thread::spawn(move || {
        for signal in signals.forever() {
            if !ran.swap(true, Ordering::SeqCst) {
                cleanup();
            }
            let _ = emulate_default_handler(signal);
        }
    });

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}

#[cfg(unix)]
struct Restore {
    fd: c_int,
    original: libc::termios,
}

#[cfg(unix)]
impl Restore {
    fn apply(&self) -> io::Result<()> {
        // Drop pending input first so it does not leak to the shell.
        let _ = unsafe { libc::tcflush(self.fd, libc::TCIFLUSH) };
        set_termios(self.fd, &self.original)
    }
}

#[cfg(unix)]
pub struct TerminalSession {
    restore: Option<Arc<Restore>>,
    restored: Arc<AtomicBool>,
    _signals: Option<SignalHookGuard>,
}

#[cfg(unix)]
impl TerminalSession {
    /// Begin a session on standard input.
    pub fn begin() -> Result<Self, ProbeError> {
        Self::begin_on(libc::STDIN_FILENO)
    }

    /// Begin a session on `fd`. Not a terminal means an inactive session.
    pub fn begin_on(fd: c_int) -> Result<Self, ProbeError> {
        let restored = Arc::new(AtomicBool::new(false));
        if unsafe { libc::isatty(fd) } != 1 {
            debug!(fd, "terminal session inactive: not a tty");
            return Ok(Self {
                restore: None,
                restored,
                _signals: None,
            });
        }

        let original =
            get_termios(fd).map_err(|err| ProbeError::terminal("reading terminal attributes", err))?;
        let restore = Arc::new(Restore { fd, original });

        let signals = {
            let restore = Arc::clone(&restore);
            let restored = Arc::clone(&restored);
            install_signal_handlers(move || {
                if !restored.swap(true, Ordering::SeqCst) {
                    let _ = restore.apply();
                }
            })
            .map_err(|err| ProbeError::terminal("installing signal handlers", err))?
        };

        let mut quiet = original;
        quiet.c_lflag &= !(libc::ECHO | libc::ICANON);
        quiet.c_cc[libc::VMIN] = 1;
        quiet.c_cc[libc::VTIME] = 0;
        set_termios(fd, &quiet)
            .map_err(|err| ProbeError::terminal("disabling echo and canonical input", err))?;

        debug!(fd, "terminal session started");
        Ok(Self {
            restore: Some(restore),
            restored,
            _signals: Some(signals),
        })
    }

    pub fn is_active(&self) -> bool {
        self.restore.is_some()
    }

    /// Restore the captured terminal state and close the session.
    pub fn end(mut self) -> Result<(), ProbeError> {
        self.restore_once()
            .map_err(|err| ProbeError::terminal("restoring terminal attributes", err))
    }

    fn restore_once(&mut self) -> io::Result<()> {
        let Some(restore) = self.restore.take() else {
            return Ok(());
        };
        if self.restored.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!(fd = restore.fd, "terminal session restored");
        restore.apply()
    }
}

#[cfg(unix)]
impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore_once() {
            warn!(error = %err, "failed to restore terminal on drop");
        }
    }
}

#[cfg(not(unix))]
pub struct TerminalSession;

#[cfg(not(unix))]
impl TerminalSession {
    pub fn begin() -> Result<Self, ProbeError> {
        Ok(Self)
    }

    pub fn is_active(&self) -> bool {
        false
    }

    pub fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}
