//! Slot entity - a named server configuration belonging to a world.

use serde::{Deserialize, Serialize};

use crate::{Difficulty, GameMode, SlotId, WorldId};

/// One of a world's server configurations.
///
/// A world may hold several slots but references at most one as active.
/// Slots never outlive their world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub world_id: WorldId,
    /// Client-facing slot number (1-based).
    pub slot_number: u8,
    pub slot_name: String,
    pub version: String,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub force_game_mode: bool,
    pub spawn_protection: u32,
    pub hardcore: bool,
}

impl Slot {
    pub fn new(world_id: WorldId, slot_number: u8, version: impl Into<String>) -> Self {
        Self {
            id: SlotId::new(),
            world_id,
            slot_number,
            slot_name: String::new(),
            version: version.into(),
            difficulty: Difficulty::default(),
            game_mode: GameMode::default(),
            force_game_mode: false,
            spawn_protection: 0,
            hardcore: false,
        }
    }

    /// Apply owner-supplied options, keeping identity fields untouched.
    pub fn apply_options(&mut self, options: SlotOptions) {
        self.slot_name = options.slot_name;
        self.version = options.version;
        self.difficulty = options.difficulty;
        self.game_mode = options.game_mode;
        self.force_game_mode = options.force_game_mode;
        self.spawn_protection = options.spawn_protection;
        self.hardcore = options.hardcore;
    }
}

/// Owner-editable slot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotOptions {
    #[serde(default)]
    pub slot_name: String,
    pub version: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub game_mode: GameMode,
    #[serde(default)]
    pub force_game_mode: bool,
    #[serde(default)]
    pub spawn_protection: u32,
    #[serde(default)]
    pub hardcore: bool,
}
