//! Platform-independent types: the probe seam, environment snapshot and width helpers.

pub mod env_snapshot;
pub mod probe;
pub mod text;
