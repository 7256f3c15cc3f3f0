//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - The container runtime (could swap Docker -> Podman)
//! - Clock (for testing)

mod error;
mod repos;
mod runtime;
mod testing;

pub use error::{RepoError, RuntimeError};

pub use repos::{PlayerRepo, SettingsRepo, SlotRepo, WorldRepo};

pub use runtime::{ContainerInfo, ContainerRuntime, ContainerSpec, ContainerStatus, LogStream};

pub use testing::ClockPort;

#[cfg(test)]
pub use repos::{MockPlayerRepo, MockSettingsRepo, MockSlotRepo, MockWorldRepo};

#[cfg(test)]
pub use runtime::MockContainerRuntime;

#[cfg(test)]
pub use testing::MockClockPort;
