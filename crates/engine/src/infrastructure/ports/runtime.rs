//! Container runtime port.
//!
//! The runtime is the sole source of truth for container state; nothing from
//! it is ever persisted. All operations address resources by name and fail
//! with a distinguishable `RuntimeError::NotFound` when the named resource
//! does not exist.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::error::RuntimeError;

/// Everything needed to create a game-server container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// Host port the game port is published on.
    pub host_port: u16,
    /// Port the server listens on inside the container.
    pub container_port: u16,
    /// Named volume holding the world data.
    pub volume: String,
    /// Mount point of the volume inside the container.
    pub volume_mount: String,
    pub env: Vec<(String, String)>,
    /// Remove the container as soon as its process exits.
    pub auto_remove: bool,
}

/// Runtime-reported container state, reduced to what the engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    Running,
    Stopped,
}

/// Live snapshot of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub status: ContainerStatus,
    /// Host port the game port is published on, if any.
    pub host_port: Option<u16>,
}

/// Live log lines from a container, newest-first tail then follow.
pub type LogStream = BoxStream<'static, Result<String, RuntimeError>>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Liveness check of the control plane itself.
    async fn ping(&self) -> Result<(), RuntimeError>;

    async fn create_volume(&self, name: &str) -> Result<(), RuntimeError>;
    async fn remove_volume(&self, name: &str) -> Result<(), RuntimeError>;

    async fn create_container(&self, spec: ContainerSpec) -> Result<(), RuntimeError>;
    async fn start_container(&self, name: &str) -> Result<(), RuntimeError>;
    /// Hard stop via the runtime's stop signal.
    async fn stop_container(&self, name: &str) -> Result<(), RuntimeError>;
    async fn remove_container(&self, name: &str, force: bool) -> Result<(), RuntimeError>;
    async fn inspect_container(&self, name: &str) -> Result<ContainerInfo, RuntimeError>;

    /// Run `command` inside the container and return its output.
    async fn exec(&self, name: &str, command: &str) -> Result<String, RuntimeError>;

    /// Subscribe to the container's log stream: the last `tail` lines, then
    /// every new line as it is written. The stream ends when the container
    /// stops; dropping it tears the subscription down.
    async fn log_stream(&self, name: &str, tail: u32) -> Result<LogStream, RuntimeError>;
}
