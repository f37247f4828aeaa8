//! Report writers. Each writes plain lines to any `io::Write`.

pub mod env_report;
pub mod width_report;

pub use env_report::EnvReport;
pub use width_report::{width_line, write_width_report};
