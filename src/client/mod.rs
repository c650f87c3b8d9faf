//! Host client model
//!
//! An in-memory stand-in for the game client the plugin runs inside: the
//! widget tree, session state, the deferred client-thread executor, and the
//! event types the host's bus delivers. The plugin never owns any of this;
//! it reads state and schedules hidden-flag mutations.

pub mod events;
pub mod state;
pub mod thread;
pub mod widget;

pub use events::{GameEvent, Skill};
pub use state::{Client, LocalPlayer, Target, SCRIPT_TOPLEVEL_REDRAW};
pub use thread::{ClientThread, TaskQueue};
