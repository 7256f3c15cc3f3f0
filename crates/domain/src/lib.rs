extern crate self as realmhost_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod types;
pub mod value_objects;

pub use entities::{MinigameRef, Player, PlayerPermission, Slot, SlotOptions, Subscription, World};

pub use error::DomainError;

pub use ids::{PlayerId, SlotId, SubscriptionId, TemplateId, WorldId};

pub use types::{Difficulty, GameMode, RealmState, SubscriptionType, WorldType};

pub use value_objects::{Compatibility, GameVersion, VersionParseError};
