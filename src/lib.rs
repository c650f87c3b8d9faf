//! Chat box visibility plugin
//!
//! A controller that hides and shows a game client's chat box based on
//! user configuration, a toggle hotkey, and transient combat state. The
//! host client surface it runs against (widget tree, client thread, event
//! bus) is modeled in [`client`]; [`sim`] drives the plugin through a
//! scripted session.

pub mod client;
pub mod config;
pub mod plugin;
pub mod sim;

pub use config::{ConfigStore, HideChatConfig};
pub use plugin::HideChatPlugin;
