//! Shared domain enums, string- or integer-encoded exactly as the wire
//! protocol expects them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Logical state of a realm, always derived, never stored.
///
/// A world whose name has never been set is `Uninitialized` no matter what
/// the container runtime reports for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RealmState {
    Uninitialized,
    Closed,
    Open,
}

impl fmt::Display for RealmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RealmState::Uninitialized => "UNINITIALIZED",
            RealmState::Closed => "CLOSED",
            RealmState::Open => "OPEN",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorldType {
    Normal,
    Minigame,
    Adventuremap,
    Experience,
    Inspiration,
}

impl Default for WorldType {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for WorldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorldType::Normal => "NORMAL",
            WorldType::Minigame => "MINIGAME",
            WorldType::Adventuremap => "ADVENTUREMAP",
            WorldType::Experience => "EXPERIENCE",
            WorldType::Inspiration => "INSPIRATION",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for WorldType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(Self::Normal),
            "MINIGAME" => Ok(Self::Minigame),
            "ADVENTUREMAP" => Ok(Self::Adventuremap),
            "EXPERIENCE" => Ok(Self::Experience),
            "INSPIRATION" => Ok(Self::Inspiration),
            other => Err(DomainError::validation(format!(
                "Unknown world type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    Normal,
    Recurring,
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubscriptionType::Normal => "NORMAL",
            SubscriptionType::Recurring => "RECURRING",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubscriptionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(Self::Normal),
            "RECURRING" => Ok(Self::Recurring),
            other => Err(DomainError::validation(format!(
                "Unknown subscription type: {other}"
            ))),
        }
    }
}

/// World difficulty, wire-encoded as its numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Difficulty {
    Peaceful = 0,
    Easy = 1,
    Normal = 2,
    Hard = 3,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Normal
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Peaceful),
            1 => Ok(Self::Easy),
            2 => Ok(Self::Normal),
            3 => Ok(Self::Hard),
            other => Err(DomainError::validation(format!(
                "Unknown difficulty: {other}"
            ))),
        }
    }
}

/// Game mode, wire-encoded as its numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GameMode {
    Survival = 0,
    Creative = 1,
    Adventure = 2,
}

impl Default for GameMode {
    fn default() -> Self {
        Self::Survival
    }
}

impl From<GameMode> for u8 {
    fn from(value: GameMode) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for GameMode {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Survival),
            1 => Ok(Self::Creative),
            2 => Ok(Self::Adventure),
            other => Err(DomainError::validation(format!(
                "Unknown game mode: {other}"
            ))),
        }
    }
}
