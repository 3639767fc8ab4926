//! Configuration module
//!
//! Handles user configuration (`config.toml` in the platform config dir)
//! layered with `GITDECK_*` environment variables. gitdeck keeps no other
//! on-disk state.

mod settings;

pub use settings::*;
