//! Wire response shapes.
//!
//! Field names are PascalCase because that is what shipped game clients
//! parse; the serde renames are the protocol, not a style choice.

use realmhost_domain::{Compatibility, GameMode, Player, RealmState, Slot, WorldType};
use serde::Serialize;
use uuid::Uuid;

use crate::use_cases::WorldView;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerResponse {
    #[serde(rename = "Id")]
    pub id: Uuid,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Uuid")]
    pub uuid: String,
    #[serde(rename = "Operator")]
    pub operator: bool,
    #[serde(rename = "Accepted")]
    pub accepted: bool,
    #[serde(rename = "Online")]
    pub online: bool,
    #[serde(rename = "Permission")]
    pub permission: String,
}

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_uuid(),
            name: player.name.clone(),
            uuid: player.uuid.clone(),
            operator: player.operator,
            accepted: player.accepted,
            online: player.online,
            permission: player.permission.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    #[serde(rename = "Id")]
    pub id: Uuid,
    #[serde(rename = "SlotId")]
    pub slot_id: u8,
    #[serde(rename = "SlotName")]
    pub slot_name: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Difficulty")]
    pub difficulty: realmhost_domain::Difficulty,
    #[serde(rename = "GameMode")]
    pub game_mode: GameMode,
    #[serde(rename = "ForceGameMode")]
    pub force_game_mode: bool,
    #[serde(rename = "SpawnProtection")]
    pub spawn_protection: u32,
    #[serde(rename = "Hardcore")]
    pub hardcore: bool,
}

impl From<&Slot> for SlotResponse {
    fn from(slot: &Slot) -> Self {
        Self {
            id: slot.id.to_uuid(),
            slot_id: slot.slot_number,
            slot_name: slot.slot_name.clone(),
            version: slot.version.clone(),
            difficulty: slot.difficulty,
            game_mode: slot.game_mode,
            force_game_mode: slot.force_game_mode,
            spawn_protection: slot.spawn_protection,
            hardcore: slot.hardcore,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldResponse {
    #[serde(rename = "Id")]
    pub id: Uuid,
    #[serde(rename = "Owner")]
    pub owner: Option<String>,
    #[serde(rename = "OwnerUUID")]
    pub owner_uuid: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Motd")]
    pub motd: Option<String>,
    #[serde(rename = "WorldType")]
    pub world_type: WorldType,
    #[serde(rename = "MaxPlayers")]
    pub max_players: u32,
    #[serde(rename = "Member")]
    pub member: bool,
    #[serde(rename = "IsHardcore")]
    pub is_hardcore: bool,
    #[serde(rename = "GameMode")]
    pub game_mode: GameMode,
    #[serde(rename = "DaysLeft")]
    pub days_left: i64,
    #[serde(rename = "Expired")]
    pub expired: bool,
    #[serde(rename = "ExpiredTrial")]
    pub expired_trial: bool,
    #[serde(rename = "GracePeriod")]
    pub grace_period: bool,
    #[serde(rename = "Compatibility")]
    pub compatibility: Compatibility,
    #[serde(rename = "ActiveSlot")]
    pub active_slot: u8,
    #[serde(rename = "Slots", skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<SlotResponse>>,
    #[serde(rename = "ActiveVersion")]
    pub active_version: String,
    #[serde(rename = "ParentWorldId")]
    pub parent_world_id: Option<Uuid>,
    #[serde(rename = "MinigameId")]
    pub minigame_id: Option<Uuid>,
    #[serde(rename = "MinigameName")]
    pub minigame_name: Option<String>,
    #[serde(rename = "MinigameImage")]
    pub minigame_image: Option<String>,
    #[serde(rename = "State")]
    pub state: RealmState,
    #[serde(rename = "Players")]
    pub players: Vec<PlayerResponse>,
}

impl WorldResponse {
    /// Build the client payload from a composed view. With no active slot
    /// the client's own version is echoed back, and slot-derived fields
    /// fall back to their protocol defaults.
    pub fn from_view(view: &WorldView, client_version: &str) -> Self {
        let world = &view.world;
        let slot = world.active_slot.as_ref();

        Self {
            id: world.id.to_uuid(),
            owner: world.owner.clone(),
            owner_uuid: world.owner_uuid.clone(),
            name: world.name.clone(),
            motd: world.motd.clone(),
            world_type: world.world_type,
            max_players: world.max_players,
            member: world.member,
            is_hardcore: slot.map(|s| s.hardcore).unwrap_or(false),
            game_mode: slot.map(|s| s.game_mode).unwrap_or_default(),
            days_left: view.days_left,
            expired: view.expired,
            expired_trial: false,
            grace_period: false,
            compatibility: view.compatibility,
            active_slot: slot.map(|s| s.slot_number).unwrap_or(1),
            slots: None,
            active_version: slot
                .map(|s| s.version.clone())
                .unwrap_or_else(|| client_version.to_string()),
            parent_world_id: world.parent_world_id.map(|id| id.to_uuid()),
            minigame_id: world.minigame.as_ref().map(|m| m.id.to_uuid()),
            minigame_name: world.minigame.as_ref().map(|m| m.name.clone()),
            minigame_image: world.minigame.as_ref().and_then(|m| m.image.clone()),
            state: view.state,
            players: world.players.iter().map(PlayerResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServersResponse {
    pub servers: Vec<WorldResponse>,
}
