//! Configuration loader/writer plus strongly typed settings.
//!
//! Deserializes the plugin's TOML config, clamps values into their valid
//! ranges, resolves the config file location, and persists edits made at
//! runtime (hotkey toggles, combat overrides). Also parses "ctrl+h"-style
//! hotkey strings into key codes.

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// Embedded default configuration, used when no config file exists yet
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Config group this plugin owns in the host's settings store.
pub const CONFIG_GROUP: &str = "hidechat";

/// Valid range for the combat hide timeout, in seconds.
const COMBAT_TIMEOUT_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

/// User-facing plugin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HideChatConfig {
    /// Hide the chat box from the screen
    #[serde(default)]
    pub hide_chat_box: bool,

    /// Key combination that flips `hide_chat_box`, e.g. "ctrl+h"
    #[serde(default)]
    pub toggle_hotkey: Option<String>,

    /// Force-hide the chat box while fighting NPCs
    #[serde(default)]
    pub hide_in_pvm: bool,

    /// Force-hide the chat box while fighting other players
    #[serde(default)]
    pub hide_in_pvp: bool,

    /// Seconds after the last combat experience drop before the chat box
    /// is shown again
    #[serde(default = "default_combat_timeout_seconds")]
    pub combat_timeout_seconds: u32,
}

fn default_combat_timeout_seconds() -> u32 {
    8
}

impl Default for HideChatConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or(Self {
            hide_chat_box: false,
            toggle_hotkey: None,
            hide_in_pvm: false,
            hide_in_pvp: false,
            combat_timeout_seconds: default_combat_timeout_seconds(),
        })
    }
}

impl HideChatConfig {
    /// Whether combat-driven hiding is active at all.
    pub fn hide_in_combat(&self) -> bool {
        self.hide_in_pvm || self.hide_in_pvp
    }

    /// Combat hide timeout in milliseconds.
    pub fn combat_timeout_ms(&self) -> i64 {
        i64::from(self.combat_timeout_seconds) * 1000
    }

    /// Whether `key` matches the configured toggle hotkey.
    /// Unset or unparsable hotkeys match nothing.
    pub fn hotkey_matches(&self, key: &KeyEvent) -> bool {
        let Some(hotkey) = self.toggle_hotkey.as_deref() else {
            return false;
        };
        match parse_key_string(hotkey) {
            Some((code, modifiers)) => key.code == code && key.modifiers == modifiers,
            None => false,
        }
    }

    /// Clamp values into their valid ranges, warning about anything that
    /// had to be adjusted.
    pub fn normalize(&mut self) {
        if !COMBAT_TIMEOUT_RANGE.contains(&self.combat_timeout_seconds) {
            let clamped = self
                .combat_timeout_seconds
                .clamp(*COMBAT_TIMEOUT_RANGE.start(), *COMBAT_TIMEOUT_RANGE.end());
            tracing::warn!(
                "combat_timeout_seconds {} out of range, clamped to {}",
                self.combat_timeout_seconds,
                clamped
            );
            self.combat_timeout_seconds = clamped;
        }

        if let Some(hotkey) = self.toggle_hotkey.as_deref() {
            if parse_key_string(hotkey).is_none() {
                tracing::warn!("unrecognized toggle_hotkey {:?}, treating as unset", hotkey);
                self.toggle_hotkey = None;
            }
        }
    }
}

/// Persisted settings store for the plugin's config group.
///
/// Stands in for the host's config service: reads produce the current
/// snapshot, writes update the snapshot and are flushed back to disk. An
/// in-memory store (no backing file) is used by the simulation and tests.
#[derive(Debug)]
pub struct ConfigStore {
    config: HideChatConfig,
    path: Option<PathBuf>,
}

impl ConfigStore {
    /// Load settings from `path`, or from the default location when `None`.
    /// A missing file yields the embedded defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => Self::default_path()?,
        };

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {:?}", path))?
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            HideChatConfig::default()
        };
        config.normalize();

        Ok(Self {
            config,
            path: Some(path),
        })
    }

    /// A store with no backing file; writes only update the snapshot.
    pub fn in_memory(mut config: HideChatConfig) -> Self {
        config.normalize();
        Self { config, path: None }
    }

    /// Resolve the default config file location:
    /// `$HIDE_CHAT_DIR/config.toml`, else `~/.hide-chat/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("HIDE_CHAT_DIR") {
            return Ok(PathBuf::from(dir).join("config.toml"));
        }
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".hide-chat").join("config.toml"))
    }

    /// Current settings snapshot.
    pub fn get(&self) -> &HideChatConfig {
        &self.config
    }

    /// Flip or set the persisted hide flag.
    pub fn set_hide_chat_box(&mut self, hidden: bool) -> Result<()> {
        self.config.hide_chat_box = hidden;
        self.save()
    }

    /// Write the current snapshot back to the config file, if any.
    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let contents =
            toml::to_string_pretty(&self.config).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }
}

/// Parse a key string like "ctrl+h", "shift+f2" or "end" into a key code
/// and modifier set. Returns `None` for anything unrecognized.
pub fn parse_key_string(key_str: &str) -> Option<(KeyCode, KeyModifiers)> {
    let parts: Vec<&str> = key_str.split('+').collect();
    let mut modifiers = KeyModifiers::empty();
    let mut key_part = key_str;

    // Parse modifiers
    if parts.len() > 1 {
        for part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        key_part = parts[parts.len() - 1];
    }

    // Parse the actual key
    let key_code = match key_part.to_lowercase().as_str() {
        // Special keys
        "enter" => KeyCode::Enter,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "page_up" | "pageup" => KeyCode::PageUp,
        "page_down" | "pagedown" => KeyCode::PageDown,

        // Function keys
        "f1" => KeyCode::F(1),
        "f2" => KeyCode::F(2),
        "f3" => KeyCode::F(3),
        "f4" => KeyCode::F(4),
        "f5" => KeyCode::F(5),
        "f6" => KeyCode::F(6),
        "f7" => KeyCode::F(7),
        "f8" => KeyCode::F(8),
        "f9" => KeyCode::F(9),
        "f10" => KeyCode::F(10),
        "f11" => KeyCode::F(11),
        "f12" => KeyCode::F(12),

        // Single character
        s if s.chars().count() == 1 => {
            let ch = s.chars().next()?;
            KeyCode::Char(ch)
        }

        _ => return None,
    };

    Some((key_code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_character() {
        assert_eq!(
            parse_key_string("h"),
            Some((KeyCode::Char('h'), KeyModifiers::empty()))
        );
    }

    #[test]
    fn test_parse_modifier_combinations() {
        assert_eq!(
            parse_key_string("ctrl+h"),
            Some((KeyCode::Char('h'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            parse_key_string("ctrl+shift+f2"),
            Some((KeyCode::F(2), KeyModifiers::CONTROL | KeyModifiers::SHIFT))
        );
        assert_eq!(
            parse_key_string("alt+end"),
            Some((KeyCode::End, KeyModifiers::ALT))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_key_string("hyper+x"), None);
        assert_eq!(parse_key_string("notakey"), None);
        assert_eq!(parse_key_string(""), None);
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config = HideChatConfig::default();
        assert!(!config.hide_chat_box);
        assert!(config.toggle_hotkey.is_none());
        assert!(!config.hide_in_pvm);
        assert!(!config.hide_in_pvp);
        assert_eq!(config.combat_timeout_seconds, 8);
    }

    #[test]
    fn test_hide_in_combat_derived_from_pvm_or_pvp() {
        let mut config = HideChatConfig::default();
        assert!(!config.hide_in_combat());

        config.hide_in_pvm = true;
        assert!(config.hide_in_combat());

        config.hide_in_pvm = false;
        config.hide_in_pvp = true;
        assert!(config.hide_in_combat());
    }

    #[test]
    fn test_normalize_clamps_combat_timeout() {
        let mut config = HideChatConfig {
            combat_timeout_seconds: 0,
            ..HideChatConfig::default()
        };
        config.normalize();
        assert_eq!(config.combat_timeout_seconds, 1);

        config.combat_timeout_seconds = 100;
        config.normalize();
        assert_eq!(config.combat_timeout_seconds, 60);

        config.combat_timeout_seconds = 8;
        config.normalize();
        assert_eq!(config.combat_timeout_seconds, 8);
    }

    #[test]
    fn test_normalize_drops_bad_hotkey() {
        let mut config = HideChatConfig {
            toggle_hotkey: Some("meta+q".to_string()),
            ..HideChatConfig::default()
        };
        config.normalize();
        assert!(config.toggle_hotkey.is_none());
    }

    #[test]
    fn test_hotkey_matches() {
        let config = HideChatConfig {
            toggle_hotkey: Some("ctrl+h".to_string()),
            ..HideChatConfig::default()
        };

        let press = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert!(config.hotkey_matches(&press));

        let wrong_key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL);
        assert!(!config.hotkey_matches(&wrong_key));

        let wrong_modifiers = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::empty());
        assert!(!config.hotkey_matches(&wrong_modifiers));
    }

    #[test]
    fn test_unset_hotkey_matches_nothing() {
        let config = HideChatConfig::default();
        let press = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert!(!config.hotkey_matches(&press));
    }

    #[test]
    fn test_toml_round_trip_preserves_settings() {
        let config = HideChatConfig {
            hide_chat_box: true,
            toggle_hotkey: Some("f9".to_string()),
            hide_in_pvm: true,
            hide_in_pvp: false,
            combat_timeout_seconds: 12,
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: HideChatConfig = toml::from_str(&serialized).unwrap();
        assert!(parsed.hide_chat_box);
        assert_eq!(parsed.toggle_hotkey.as_deref(), Some("f9"));
        assert!(parsed.hide_in_pvm);
        assert_eq!(parsed.combat_timeout_seconds, 12);
    }

    #[test]
    fn test_in_memory_store_writes_snapshot_only() {
        let mut store = ConfigStore::in_memory(HideChatConfig::default());
        assert!(!store.get().hide_chat_box);

        store.set_hide_chat_box(true).unwrap();
        assert!(store.get().hide_chat_box);
    }
}
