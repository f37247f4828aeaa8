//! Platform-specific probes and terminal session handling.

pub mod process_probe;
pub mod session;

pub use process_probe::ProcessProbe;
pub use session::TerminalSession;
