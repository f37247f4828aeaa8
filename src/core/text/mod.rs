//! Text helpers for width inspection.

pub mod samples;
pub mod width;
