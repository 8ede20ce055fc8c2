//! Configuration module for markbar
//!
//! This module holds the per-domain settings (feature flags and the comment
//! length limit), their JSON form and loading them from the
//! platform-specific config directory. The flags are read-only here.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
