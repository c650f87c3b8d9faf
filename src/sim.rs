//! Scripted demonstration session
//!
//! Drives the plugin against a simulated client on a real tick interval:
//! startup, manual hotkey toggles, a short PvM fight, combat timeout
//! expiry, shutdown. The chat box state is logged after every event so the
//! visibility decisions are visible in the output.

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::client::thread::{self, TaskQueue};
use crate::client::widget::{ChildKind, CHATBOX, CONTENT_TYPE_UNHIDEABLE};
use crate::client::{Client, GameEvent, LocalPlayer, Skill, Target};
use crate::config::{ConfigStore, HideChatConfig};
use crate::plugin::HideChatPlugin;

/// Host game tick length.
const TICK: Duration = Duration::from_millis(600);

/// Ticks the simulated fight lasts before the player stops attacking.
const FIGHT_TICKS: u64 = 3;

/// Total ticks simulated; long enough for the combat timeout to expire.
const TOTAL_TICKS: u64 = 9;

struct Session {
    plugin: HideChatPlugin,
    client: Client,
    queue: TaskQueue,
}

impl Session {
    /// Deliver one event, drain the client thread, log the result.
    fn deliver(&mut self, label: &str, event: GameEvent) {
        self.plugin.handle_event(&self.client, &event);
        self.queue.drain(&mut self.client);
        self.report(label);
    }

    fn pump(&mut self) {
        self.queue.drain(&mut self.client);
    }

    fn report(&self, label: &str) {
        let widgets = self.client.widgets();
        let Some(root) = self.client.widget(CHATBOX) else {
            tracing::info!("{label}: chat box not present");
            return;
        };

        let widget = widgets.get(root);
        let children: Vec<_> = widget
            .dynamic_children()
            .iter()
            .chain(widget.nested_children().iter())
            .chain(widget.static_children().iter())
            .copied()
            .collect();
        let hidden = children.iter().filter(|&&c| widgets.is_hidden(c)).count();
        tracing::info!(
            "{label}: root {}, {}/{} children hidden, override {}",
            if widgets.is_hidden(root) { "hidden" } else { "shown" },
            hidden,
            children.len(),
            self.plugin.combat_override_active(),
        );
    }
}

/// A logged-in client whose chat box has children in all three
/// collections, one of them unhideable.
fn build_client() -> Client {
    let mut client = Client::new();
    client.set_resized(true);
    client.set_local_player(Some(LocalPlayer { interacting: None }));

    let widgets = client.widgets_mut();
    let root = widgets.insert_root(CHATBOX, 0);
    for _ in 0..3 {
        widgets.add_child(root, ChildKind::Dynamic, 0);
    }
    widgets.add_child(root, ChildKind::Dynamic, CONTENT_TYPE_UNHIDEABLE);
    widgets.add_child(root, ChildKind::Nested, 0);
    widgets.add_child(root, ChildKind::Static, 0);

    client
}

pub async fn run() -> Result<()> {
    // The demo runs with its own settings so the whole feature surface is
    // exercised regardless of what is on disk: hotkey bound, PvM hiding
    // on, short combat timeout to keep the session brief.
    let config = HideChatConfig {
        toggle_hotkey: Some("ctrl+h".to_string()),
        hide_in_pvm: true,
        combat_timeout_seconds: 2,
        ..HideChatConfig::default()
    };
    tracing::info!(
        "demo settings: hotkey ctrl+h, hide_in_pvm on, combat timeout {}s",
        config.combat_timeout_seconds
    );

    let (client_thread, queue) = thread::channel();
    let mut session = Session {
        plugin: HideChatPlugin::new(ConfigStore::in_memory(config), client_thread),
        client: build_client(),
        queue,
    };

    session.plugin.start();
    session.pump();
    session.report("startup");

    let hotkey = GameEvent::KeyPressed {
        key: KeyEvent::new(KeyCode::Char('h'), KeyModifiers::CONTROL),
    };
    session.deliver("hotkey toggle on", hotkey.clone());
    session.deliver("hotkey toggle off", hotkey);

    tracing::info!("engaging an NPC for {FIGHT_TICKS} ticks");
    session
        .client
        .set_local_player(Some(LocalPlayer {
            interacting: Some(Target::Npc),
        }));

    let mut ticker = tokio::time::interval(TICK);
    for tick in 0..TOTAL_TICKS {
        ticker.tick().await;
        let now = Utc::now();

        if tick < FIGHT_TICKS {
            session.deliver(
                &format!("tick {tick}: combat xp"),
                GameEvent::StatChanged {
                    skill: Skill::Hitpoints,
                    at: now,
                },
            );
        } else if tick == FIGHT_TICKS {
            tracing::info!("fight over, waiting out the combat timeout");
            session
                .client
                .set_local_player(Some(LocalPlayer { interacting: None }));
        }

        session.deliver(&format!("tick {tick}"), GameEvent::GameTick { at: now });
    }

    session.plugin.stop();
    session.pump();
    session.report("shutdown");

    Ok(())
}
