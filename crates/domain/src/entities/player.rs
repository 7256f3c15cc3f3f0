//! Player entity - membership of a player in a world.

use serde::{Deserialize, Serialize};

use crate::{PlayerId, WorldId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerPermission {
    Member,
    Operator,
}

impl Default for PlayerPermission {
    fn default() -> Self {
        Self::Member
    }
}

impl std::fmt::Display for PlayerPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlayerPermission::Member => "MEMBER",
            PlayerPermission::Operator => "OPERATOR",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PlayerPermission {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MEMBER" => Ok(Self::Member),
            "OPERATOR" => Ok(Self::Operator),
            other => Err(crate::DomainError::validation(format!(
                "Unknown permission: {other}"
            ))),
        }
    }
}

/// A player invited to or playing in a world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub world_id: WorldId,
    pub name: String,
    pub uuid: String,
    pub operator: bool,
    pub accepted: bool,
    pub online: bool,
    pub permission: PlayerPermission,
}

impl Player {
    pub fn new(world_id: WorldId, name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(),
            world_id,
            name: name.into(),
            uuid: uuid.into(),
            operator: false,
            accepted: false,
            online: false,
            permission: PlayerPermission::default(),
        }
    }
}
