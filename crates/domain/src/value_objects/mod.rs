//! Value objects - Immutable objects defined by their attributes

mod compatibility;
mod version;

pub use compatibility::Compatibility;
pub use version::{GameVersion, VersionParseError};
