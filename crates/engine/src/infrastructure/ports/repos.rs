//! Repository port traits, one per entity type.

use async_trait::async_trait;
use realmhost_domain::{Player, PlayerId, Slot, SlotId, World, WorldId, WorldType};

use super::error::RepoError;
use crate::infrastructure::app_settings::AppSettings;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorldRepo: Send + Sync {
    /// Point lookup, hydrated with active slot, subscription, minigame
    /// reference and players.
    async fn get(&self, id: WorldId) -> Result<Option<World>, RepoError>;
    async fn create(&self, world: &World) -> Result<(), RepoError>;
    /// Deletes the world and everything that belongs to it (slots, players,
    /// subscription).
    async fn delete(&self, id: WorldId) -> Result<(), RepoError>;

    // Queries
    async fn list_owned(&self, owner_uuid: &str) -> Result<Vec<World>, RepoError>;
    /// Worlds in which `player_uuid` is an accepted member.
    async fn list_member(&self, player_uuid: &str) -> Result<Vec<World>, RepoError>;
    async fn list_all(&self) -> Result<Vec<World>, RepoError>;

    // Configuration
    async fn update_configuration(
        &self,
        id: WorldId,
        name: Option<String>,
        motd: Option<String>,
        world_type: Option<WorldType>,
    ) -> Result<(), RepoError>;
    async fn set_active_slot(&self, id: WorldId, slot_id: SlotId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotRepo: Send + Sync {
    async fn get(&self, id: SlotId) -> Result<Option<Slot>, RepoError>;
    async fn get_by_number(
        &self,
        world_id: WorldId,
        slot_number: u8,
    ) -> Result<Option<Slot>, RepoError>;
    async fn list_for_world(&self, world_id: WorldId) -> Result<Vec<Slot>, RepoError>;
    async fn save(&self, slot: &Slot) -> Result<(), RepoError>;
    async fn delete(&self, id: SlotId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    async fn list_for_world(&self, world_id: WorldId) -> Result<Vec<Player>, RepoError>;
    async fn save(&self, player: &Player) -> Result<(), RepoError>;
    async fn delete(&self, id: PlayerId) -> Result<(), RepoError>;
}

/// Storage for the runtime-tunable application settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn get(&self) -> Result<Option<AppSettings>, RepoError>;
    async fn save(&self, settings: &AppSettings) -> Result<(), RepoError>;
}
