//! Shared helpers for release stages.

pub mod fs;
