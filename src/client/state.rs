//! Simulated client state
//!
//! Tracks the slice of host game state the plugin reads: the widget tree,
//! the resized-layout flag, and the local player's interaction target.

use crate::client::widget::{WidgetId, WidgetKey, WidgetTree};

/// Host script that rebuilds the top-level interface layout.
/// Running it re-shows widgets as a side effect.
pub const SCRIPT_TOPLEVEL_REDRAW: i32 = 2731;

/// What the local player is currently interacting with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Npc,
    Player,
}

/// The local player. Absent before login.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalPlayer {
    pub interacting: Option<Target>,
}

/// Client session state owned by the host.
#[derive(Debug, Default)]
pub struct Client {
    widgets: WidgetTree,

    /// Whether the client runs in resizable layout
    resized: bool,

    /// Local player, absent before login
    local_player: Option<LocalPlayer>,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widgets(&self) -> &WidgetTree {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut WidgetTree {
        &mut self.widgets
    }

    /// Look up a root widget by id.
    pub fn widget(&self, id: WidgetId) -> Option<WidgetKey> {
        self.widgets.find(id)
    }

    pub fn is_resized(&self) -> bool {
        self.resized
    }

    pub fn set_resized(&mut self, resized: bool) {
        self.resized = resized;
    }

    pub fn local_player(&self) -> Option<&LocalPlayer> {
        self.local_player.as_ref()
    }

    pub fn set_local_player(&mut self, player: Option<LocalPlayer>) {
        self.local_player = player;
    }

    /// The local player's current interaction target. `None` when there is
    /// no local player yet or the player is idle.
    pub fn interacting(&self) -> Option<Target> {
        self.local_player.as_ref()?.interacting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interacting_requires_local_player() {
        let mut client = Client::new();
        assert_eq!(client.interacting(), None);

        client.set_local_player(Some(LocalPlayer { interacting: None }));
        assert_eq!(client.interacting(), None);

        client.set_local_player(Some(LocalPlayer {
            interacting: Some(Target::Npc),
        }));
        assert_eq!(client.interacting(), Some(Target::Npc));
    }
}
