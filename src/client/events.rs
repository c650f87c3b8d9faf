//! Host event model
//!
//! Events arrive one at a time on a single callback thread; handlers return
//! nothing and must tolerate missed or duplicated deliveries. Time-sensitive
//! events carry the timestamp the host stamped when firing them.

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;

/// Trainable skills, as reported by stat-change events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skill {
    Attack,
    Strength,
    Defence,
    Ranged,
    Magic,
    Hitpoints,
    Prayer,
    Cooking,
    Fishing,
    Woodcutting,
}

impl Skill {
    /// Skills whose experience drops indicate the player is fighting.
    pub fn is_combat(self) -> bool {
        matches!(
            self,
            Skill::Attack
                | Skill::Strength
                | Skill::Defence
                | Skill::Ranged
                | Skill::Magic
                | Skill::Hitpoints
        )
    }
}

/// Events delivered by the host's event bus.
#[derive(Clone, Debug)]
pub enum GameEvent {
    /// A persisted configuration value changed.
    ConfigChanged { group: String, key: String },

    /// The client switched between fixed and resizable layout.
    CanvasSizeChanged,

    /// A client script finished running.
    ScriptPostFired { script_id: i32 },

    /// A server-tracked game variable changed.
    VarbitChanged { id: i32 },

    /// A skill's experience changed.
    StatChanged { skill: Skill, at: DateTime<Utc> },

    /// One game tick (roughly 600 ms) elapsed.
    GameTick { at: DateTime<Utc> },

    /// A key was pressed while the client had focus.
    KeyPressed { key: KeyEvent },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combat_skill_classification() {
        for skill in [
            Skill::Attack,
            Skill::Strength,
            Skill::Defence,
            Skill::Ranged,
            Skill::Magic,
            Skill::Hitpoints,
        ] {
            assert!(skill.is_combat(), "{skill:?} should be a combat skill");
        }
        for skill in [Skill::Prayer, Skill::Cooking, Skill::Fishing, Skill::Woodcutting] {
            assert!(!skill.is_combat(), "{skill:?} should not be a combat skill");
        }
    }
}
