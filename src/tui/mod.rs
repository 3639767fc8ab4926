//! Terminal UI module using ratatui
//!
//! Event-driven TUI with:
//! - Five coordinated panels (files, content, branches, commits, stash)
//! - A mode state machine driven by single keys
//! - Background fetch and supervised push/pull with an animated status line
//! - Modal overlays for input, confirmation and errors

mod animation;
mod app;
mod event;
mod input;
mod modal;
mod state;
mod tasks;
pub mod theme;
mod widgets;

pub use animation::*;
pub use app::*;
pub use event::*;
pub use input::*;
pub use modal::*;
pub use state::*;
pub use tasks::*;
