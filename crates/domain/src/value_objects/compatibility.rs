//! Client/server version compatibility evaluation.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{GameVersion, VersionParseError};

/// Whether a connecting client can join a world's active server version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compatibility {
    Compatible,
    NeedsUpgrade,
    NeedsDowngrade,
}

impl Compatibility {
    /// Compare a client version against a world's active-slot version.
    ///
    /// With no active slot the client version is its own baseline, so the
    /// result is `Compatible`. A client older than the server needs an
    /// upgrade; a client ahead of the server needs a downgrade.
    pub fn evaluate(
        client_version: &str,
        active_slot_version: Option<&str>,
    ) -> Result<Self, VersionParseError> {
        let client: GameVersion = client_version.parse()?;
        let slot: GameVersion = match active_slot_version {
            Some(version) => version.parse()?,
            None => return Ok(Self::Compatible),
        };

        Ok(match client.cmp(&slot) {
            Ordering::Equal => Self::Compatible,
            Ordering::Less => Self::NeedsDowngrade,
            Ordering::Greater => Self::NeedsUpgrade,
        })
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Compatibility::Compatible => "COMPATIBLE",
            Compatibility::NeedsUpgrade => "NEEDS_UPGRADE",
            Compatibility::NeedsDowngrade => "NEEDS_DOWNGRADE",
        };
        write!(f, "{s}")
    }
}
