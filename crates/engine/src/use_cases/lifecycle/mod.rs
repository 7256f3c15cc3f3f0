//! Game-server container lifecycle orchestration.
//!
//! Owns the mapping from a world id to its container and volume, both named
//! `realm-server-{world_id}`. The runtime stays the sole source of truth for
//! container state: every operation re-queries it live. Containers are
//! created with auto-remove, so stopping the server process is enough to
//! reclaim the container; only the volume persists until deletion.

mod locks;

pub use locks::WorldLocks;

use std::sync::Arc;

use realmhost_domain::WorldId;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::ports::{
    ContainerRuntime, ContainerSpec, ContainerStatus, RuntimeError,
};

/// Operational configuration for world servers.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Image every world server runs.
    pub image: String,
    /// Port the server listens on inside the container.
    pub game_port: u16,
    /// Mount point of the world volume inside the container.
    pub data_mount: String,
    /// In-process command used for graceful shutdown.
    pub stop_command: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            image: "realm-server".to_string(),
            game_port: 25565,
            data_mount: "/mc".to_string(),
            stop_command: "stop".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("Failed to allocate host port: {0}")]
    PortAllocation(#[from] std::io::Error),
}

impl LifecycleError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Runtime(e) if e.is_not_found())
    }
}

/// Orchestrates container lifecycle transitions for world servers.
///
/// Mutating operations (start, stop, delete) are serialized per world
/// through [`WorldLocks`]; reads run lock-free and may observe a container
/// mid-transition, which callers must treat as a valid snapshot.
pub struct ServerLifecycle {
    runtime: Arc<dyn ContainerRuntime>,
    locks: WorldLocks,
    config: LifecycleConfig,
}

fn container_name(world_id: WorldId) -> String {
    format!("realm-server-{world_id}")
}

fn volume_name(world_id: WorldId) -> String {
    format!("realm-server-{world_id}")
}

/// Ask the kernel for a free ephemeral port by binding port 0 and releasing
/// it immediately. Another process can grab the port in the window before
/// the container binds it; the container is started promptly after
/// allocation, so the window is accepted rather than closed.
fn find_free_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind(("0.0.0.0", 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

impl ServerLifecycle {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, config: LifecycleConfig) -> Self {
        Self {
            runtime,
            locks: WorldLocks::new(),
            config,
        }
    }

    /// Create the world's volume if it does not exist yet.
    pub async fn ensure_volume(&self, world_id: WorldId) -> Result<(), LifecycleError> {
        match self.runtime.create_volume(&volume_name(world_id)).await {
            Err(e) if e.is_already_exists() => Ok(()),
            other => Ok(other?),
        }
    }

    /// Whether the world's container exists and reports itself running.
    /// Absence is a normal answer, not an error.
    pub async fn is_running(&self, world_id: WorldId) -> Result<bool, LifecycleError> {
        match self.runtime.inspect_container(&container_name(world_id)).await {
            Ok(info) => Ok(info.status == ContainerStatus::Running),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Start the world's server on the given slot. A no-op when the server
    /// is already running, including under concurrent callers.
    pub async fn start(&self, world_id: WorldId, slot_number: u8) -> Result<(), LifecycleError> {
        let _guard = self.locks.acquire(world_id).await;

        if self.is_running(world_id).await? {
            tracing::debug!(world_id = %world_id, "server already running");
            return Ok(());
        }

        self.ensure_volume(world_id).await?;

        let host_port = find_free_port()?;
        let name = container_name(world_id);
        let spec = ContainerSpec {
            name: name.clone(),
            image: self.config.image.clone(),
            host_port,
            container_port: self.config.game_port,
            volume: volume_name(world_id),
            volume_mount: self.config.data_mount.clone(),
            env: vec![("SLOT_ID".to_string(), slot_number.to_string())],
            auto_remove: true,
        };

        match self.runtime.create_container(spec).await {
            // A half-finished earlier attempt left the container behind;
            // starting it is the idempotent continuation.
            Err(e) if e.is_already_exists() => {
                tracing::debug!(world_id = %world_id, "container already created");
            }
            other => other?,
        }
        self.runtime.start_container(&name).await?;

        tracing::info!(world_id = %world_id, port = host_port, slot = slot_number, "world server started");
        Ok(())
    }

    /// Stop the world's server. Absence of the container is a no-op.
    ///
    /// Without `force` the server is asked to shut itself down via the
    /// in-process stop command; with `force` the runtime kills it.
    pub async fn stop(&self, world_id: WorldId, force: bool) -> Result<(), LifecycleError> {
        let _guard = self.locks.acquire(world_id).await;
        let name = container_name(world_id);

        let result = if force {
            self.runtime.stop_container(&name).await
        } else {
            self.runtime
                .exec(&name, &self.config.stop_command)
                .await
                .map(|_| ())
        };

        match result {
            Err(e) if e.is_not_found() => Ok(()),
            other => {
                other?;
                tracing::info!(world_id = %world_id, force, "world server stopped");
                Ok(())
            }
        }
    }

    /// Tear down the world's container and volume. Safe to call when
    /// neither was ever created.
    pub async fn delete(&self, world_id: WorldId) -> Result<(), LifecycleError> {
        let _guard = self.locks.acquire(world_id).await;
        let name = container_name(world_id);

        match self.runtime.remove_container(&name, true).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(world_id = %world_id, "container already gone, removing only world data");
            }
            other => other?,
        }

        match self.runtime.remove_volume(&volume_name(world_id)).await {
            Err(e) if e.is_not_found() => {}
            other => other?,
        }

        tracing::info!(world_id = %world_id, "world server resources removed");
        Ok(())
    }

    /// Host port the world's running container is bound to. Fails with
    /// NotFound when the container does not exist.
    pub async fn port(&self, world_id: WorldId) -> Result<u16, LifecycleError> {
        let name = container_name(world_id);
        let info = self.runtime.inspect_container(&name).await?;
        info.host_port
            .ok_or_else(|| RuntimeError::not_found("port binding", name).into())
    }

    /// Run a command inside the world's container and return its output.
    pub async fn exec(&self, world_id: WorldId, command: &str) -> Result<String, LifecycleError> {
        Ok(self
            .runtime
            .exec(&container_name(world_id), command)
            .await?)
    }

    /// Tail the world's server log, invoking `handler` once per line until
    /// the stream ends or `cancel` fires. Cancellation drops the underlying
    /// runtime stream promptly.
    pub async fn stream_logs<F>(
        &self,
        world_id: WorldId,
        cancel: CancellationToken,
        mut handler: F,
    ) -> Result<(), LifecycleError>
    where
        F: FnMut(String) + Send,
    {
        use futures_util::StreamExt;

        let mut stream = self
            .runtime
            .log_stream(&container_name(world_id), 100)
            .await?;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                line = stream.next() => match line {
                    Some(Ok(line)) => handler(line),
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                },
            }
        }
    }
}
