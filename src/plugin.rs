//! Chat box visibility controller
//!
//! Reacts to host events (ticks, config changes, redraws, hotkeys, stat
//! changes) by recomputing what the chat box visibility should be right now
//! and scheduling the mutation onto the client thread. Every handler is an
//! idempotent re-application, so missed or duplicated events self-correct
//! on the next relevant event.

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;

use crate::client::state::{Client, Target, SCRIPT_TOPLEVEL_REDRAW};
use crate::client::thread::ClientThread;
use crate::client::widget::{WidgetKey, CHATBOX, CONTENT_TYPE_UNHIDEABLE};
use crate::client::{GameEvent, Skill};
use crate::config::{ConfigStore, HideChatConfig, CONFIG_GROUP};

/// Chat visibility controller. One instance per plugin activation; combat
/// state lives here and dies with the instance at shutdown.
pub struct HideChatPlugin {
    config: ConfigStore,
    client_thread: ClientThread,

    /// Timestamp of the last qualifying combat experience drop
    last_combat_xp: Option<DateTime<Utc>>,

    /// True while the chat box is hidden because of combat rather than the
    /// user's own preference
    combat_override_active: bool,
}

impl HideChatPlugin {
    pub fn new(config: ConfigStore, client_thread: ClientThread) -> Self {
        Self {
            config,
            client_thread,
            last_combat_xp: None,
            combat_override_active: false,
        }
    }

    /// Plugin activation: bring the chat box in line with the config.
    pub fn start(&mut self) {
        tracing::info!("hide-chat started");
        self.apply_current();
    }

    /// Plugin shutdown: the chat box must end up shown no matter what
    /// state the controller was in.
    pub fn stop(&mut self) {
        tracing::info!("hide-chat stopped, restoring chat box");
        self.last_combat_xp = None;
        self.combat_override_active = false;
        self.apply(false);
    }

    /// Current settings snapshot.
    pub fn config(&self) -> &HideChatConfig {
        self.config.get()
    }

    pub fn combat_override_active(&self) -> bool {
        self.combat_override_active
    }

    /// Dispatch one host event to its handler.
    pub fn handle_event(&mut self, client: &Client, event: &GameEvent) {
        match event {
            GameEvent::ConfigChanged { group, .. } => self.on_config_changed(group),
            GameEvent::CanvasSizeChanged => self.on_canvas_size_changed(client),
            GameEvent::ScriptPostFired { script_id } => self.on_script_post_fired(*script_id),
            GameEvent::VarbitChanged { .. } => self.on_varbit_changed(),
            GameEvent::StatChanged { skill, at } => self.on_stat_changed(client, *skill, *at),
            GameEvent::GameTick { at } => self.on_game_tick(*at),
            GameEvent::KeyPressed { key } => self.on_key_pressed(key),
        }
    }

    fn on_config_changed(&mut self, group: &str) {
        if group == CONFIG_GROUP {
            self.apply_current();
        }
    }

    /// The top-level redraw script re-shows widgets as a side effect, so
    /// reapply hiding after it runs.
    fn on_script_post_fired(&mut self, script_id: i32) {
        if script_id == SCRIPT_TOPLEVEL_REDRAW && self.config.get().hide_chat_box {
            self.apply(true);
        }
    }

    fn on_varbit_changed(&mut self) {
        if self.config.get().hide_chat_box {
            self.apply(true);
        }
    }

    fn on_canvas_size_changed(&mut self, client: &Client) {
        if !client.is_resized() {
            // Fixed layout draws the chat box into the frame; never hide it
            self.apply(false);
        } else if self.config.get().hide_chat_box {
            self.apply(true);
        }
    }

    fn on_key_pressed(&mut self, key: &KeyEvent) {
        if !self.config.get().hotkey_matches(key) {
            return;
        }

        let hidden = !self.config.get().hide_chat_box;
        self.persist_hide_flag(hidden);

        // A manual toggle wins over combat hiding until the next
        // qualifying experience drop re-arms the window
        self.combat_override_active = false;
        self.last_combat_xp = None;

        self.apply_current();
    }

    fn on_stat_changed(&mut self, client: &Client, skill: Skill, at: DateTime<Utc>) {
        if !skill.is_combat() {
            return;
        }
        let Some(target) = client.interacting() else {
            return;
        };

        let config = self.config.get();
        let qualifies = match target {
            Target::Npc => config.hide_in_pvm,
            Target::Player => config.hide_in_pvp,
        };
        if qualifies {
            self.last_combat_xp = Some(at);
        }
    }

    fn on_game_tick(&mut self, at: DateTime<Utc>) {
        let (hide_in_combat, timeout_ms, hide_flag) = {
            let config = self.config.get();
            (
                config.hide_in_combat(),
                config.combat_timeout_ms(),
                config.hide_chat_box,
            )
        };
        if !hide_in_combat {
            return;
        }

        let in_combat = self
            .last_combat_xp
            .map_or(false, |last| (at - last).num_milliseconds() < timeout_ms);

        if in_combat {
            if !hide_flag || !self.combat_override_active {
                self.persist_hide_flag(true);
                self.apply(true);
                self.combat_override_active = true;
            }
        } else if self.combat_override_active {
            if hide_flag {
                self.persist_hide_flag(false);
                self.apply(false);
            }
            self.combat_override_active = false;
        }
    }

    /// Apply whatever visibility the current config asks for.
    fn apply_current(&self) {
        let hidden = self.config.get().hide_chat_box;
        self.apply(hidden);
    }

    /// Schedule the visibility mutation onto the client thread. The
    /// captured boolean is snapshotted here; queued mutations run FIFO, so
    /// the last scheduled state wins within a frame.
    fn apply(&self, hidden: bool) {
        self.client_thread
            .invoke_later(move |client| set_chatbox_hidden(client, hidden));
    }

    fn persist_hide_flag(&mut self, hidden: bool) {
        if let Err(err) = self.config.set_hide_chat_box(hidden) {
            // Snapshot already updated; visibility stays correct even if
            // the write never reaches disk
            tracing::warn!("failed to persist hide_chat_box: {err:#}");
        }
    }
}

/// Set the hidden flag on the chat box root and all of its children,
/// skipping unhideable nodes. Runs on the client thread. An absent chat
/// box (interface not built yet, e.g. before login) is a silent no-op.
fn set_chatbox_hidden(client: &mut Client, hidden: bool) {
    let Some(root) = client.widget(CHATBOX) else {
        tracing::debug!("chat box widget not present, skipping");
        return;
    };

    let widgets = client.widgets_mut();
    widgets.set_hidden(root, hidden);

    // Flatten every child collection the widget model exposes
    let widget = widgets.get(root);
    let children: Vec<WidgetKey> = widget
        .dynamic_children()
        .iter()
        .chain(widget.nested_children().iter())
        .chain(widget.static_children().iter())
        .copied()
        .collect();

    for child in children {
        if widgets.get(child).content_type() != CONTENT_TYPE_UNHIDEABLE {
            widgets.set_hidden(child, hidden);
        }
    }
    tracing::debug!(hidden, "applied chat box visibility");
}
