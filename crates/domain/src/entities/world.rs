//! World entity - a hosted realm and its attachments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Slot, SlotId, SubscriptionId, SubscriptionType, TemplateId, WorldId, WorldType};

use super::Player;

/// A hosted world (realm).
///
/// `name` stays `None` until the owner configures the world for the first
/// time; deriving the UNINITIALIZED state from that is the state resolver's
/// job, not a null check at call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub id: WorldId,
    pub owner: Option<String>,
    pub owner_uuid: Option<String>,
    pub name: Option<String>,
    pub motd: Option<String>,
    pub world_type: WorldType,
    pub max_players: u32,
    pub member: bool,
    /// Hydrated active slot, at most one per world.
    pub active_slot: Option<Slot>,
    pub subscription: Option<Subscription>,
    pub minigame: Option<MinigameRef>,
    pub parent_world_id: Option<WorldId>,
    pub players: Vec<Player>,
}

impl World {
    /// A freshly provisioned world owned by `owner`, not yet configured.
    pub fn provisioned(owner: impl Into<String>, owner_uuid: impl Into<String>) -> Self {
        Self {
            id: WorldId::new(),
            owner: Some(owner.into()),
            owner_uuid: Some(owner_uuid.into()),
            name: None,
            motd: None,
            world_type: WorldType::Normal,
            max_players: 10,
            member: false,
            active_slot: None,
            subscription: None,
            minigame: None,
            parent_world_id: None,
            players: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_motd(mut self, motd: impl Into<String>) -> Self {
        self.motd = Some(motd.into());
        self
    }

    pub fn with_world_type(mut self, world_type: WorldType) -> Self {
        self.world_type = world_type;
        self
    }

    /// Whether `uuid` is the owner of this world.
    pub fn is_owned_by(&self, uuid: &str) -> bool {
        self.owner_uuid.as_deref() == Some(uuid)
    }

    /// Version of the active slot, if one is configured.
    pub fn active_version(&self) -> Option<&str> {
        self.active_slot.as_ref().map(|slot| slot.version.as_str())
    }

    /// Client-facing number of the active slot, if one is configured.
    pub fn active_slot_id(&self) -> Option<SlotId> {
        self.active_slot.as_ref().map(|slot| slot.id)
    }
}

/// Subscription attached to a world.
///
/// A world without one runs on the permanent default grant; expiry is a
/// presentational computation, never enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub world_id: WorldId,
    pub start_date: DateTime<Utc>,
    pub subscription_type: SubscriptionType,
}

impl Subscription {
    pub fn new(world_id: WorldId, start_date: DateTime<Utc>, subscription_type: SubscriptionType) -> Self {
        Self {
            id: SubscriptionId::new(),
            world_id,
            start_date,
            subscription_type,
        }
    }
}

/// Reference to a minigame template a world is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinigameRef {
    pub id: TemplateId,
    pub name: String,
    pub image: Option<String>,
}
