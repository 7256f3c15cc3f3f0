//! Domain entities - Core business objects with identity

mod player;
mod slot;
mod world;

pub use player::{Player, PlayerPermission};
pub use slot::{Slot, SlotOptions};
pub use world::{MinigameRef, Subscription, World};
