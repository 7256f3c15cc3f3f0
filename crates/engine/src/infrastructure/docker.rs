//! Docker implementation of the container runtime port.
//!
//! One `Docker` handle is connected at process start and shared across all
//! requests; bollard's client is cheap to clone and internally pooled.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::exec::{CreateExecOptions, StartExecOptions, StartExecResults};
use bollard::models::{ContainerStateStatusEnum, HostConfig, PortBinding};
use bollard::volume::{CreateVolumeOptions, RemoveVolumeOptions};
use bollard::Docker;
use futures_util::StreamExt;

use crate::infrastructure::ports::{
    ContainerInfo, ContainerRuntime, ContainerSpec, ContainerStatus, LogStream, RuntimeError,
};

#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect with the platform's local defaults (unix socket or npipe).
    pub fn connect() -> Result<Self, RuntimeError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RuntimeError::api("connect", e))?;
        Ok(Self { docker })
    }
}

/// Map a bollard error onto the port taxonomy: 404 means the named resource
/// does not exist, 409 that it already does; everything else is a control
/// plane failure.
fn map_bollard(
    operation: &'static str,
    resource: &'static str,
    name: &str,
    err: bollard::errors::Error,
) -> RuntimeError {
    match err {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        } => RuntimeError::not_found(resource, name),
        bollard::errors::Error::DockerResponseServerError {
            status_code: 409, ..
        } => RuntimeError::already_exists(resource, name),
        other => RuntimeError::api(operation, other),
    }
}

/// First published host port found in the inspect response.
fn published_host_port(response: &bollard::models::ContainerInspectResponse) -> Option<u16> {
    response
        .network_settings
        .as_ref()?
        .ports
        .as_ref()?
        .values()
        .flatten()
        .flatten()
        .find_map(|binding: &PortBinding| binding.host_port.as_deref()?.parse().ok())
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn ping(&self) -> Result<(), RuntimeError> {
        self.docker
            .ping()
            .await
            .map(|_| ())
            .map_err(|e| RuntimeError::api("ping", e))
    }

    async fn create_volume(&self, name: &str) -> Result<(), RuntimeError> {
        self.docker
            .create_volume(CreateVolumeOptions {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .map(|_| ())
            .map_err(|e| map_bollard("create_volume", "volume", name, e))
    }

    async fn remove_volume(&self, name: &str) -> Result<(), RuntimeError> {
        self.docker
            .remove_volume(name, None::<RemoveVolumeOptions>)
            .await
            .map_err(|e| map_bollard("remove_volume", "volume", name, e))
    }

    async fn create_container(&self, spec: ContainerSpec) -> Result<(), RuntimeError> {
        let port_key = format!("{}/tcp", spec.container_port);

        let mut port_bindings = HashMap::new();
        port_bindings.insert(
            port_key.clone(),
            Some(vec![PortBinding {
                host_ip: Some("0.0.0.0".to_string()),
                host_port: Some(spec.host_port.to_string()),
            }]),
        );

        let mut exposed_ports = HashMap::new();
        exposed_ports.insert(port_key, HashMap::new());

        let host_config = HostConfig {
            port_bindings: Some(port_bindings),
            binds: Some(vec![format!("{}:{}", spec.volume, spec.volume_mount)]),
            auto_remove: Some(spec.auto_remove),
            ..Default::default()
        };

        let config = Config {
            image: Some(spec.image.clone()),
            env: Some(spec.env.iter().map(|(k, v)| format!("{k}={v}")).collect()),
            exposed_ports: Some(exposed_ports),
            host_config: Some(host_config),
            ..Default::default()
        };

        self.docker
            .create_container(
                Some(CreateContainerOptions {
                    name: spec.name.clone(),
                    platform: None,
                }),
                config,
            )
            .await
            .map(|_| ())
            .map_err(|e| map_bollard("create_container", "container", &spec.name, e))
    }

    async fn start_container(&self, name: &str) -> Result<(), RuntimeError> {
        self.docker
            .start_container(name, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| map_bollard("start_container", "container", name, e))
    }

    async fn stop_container(&self, name: &str) -> Result<(), RuntimeError> {
        self.docker
            .stop_container(name, None::<StopContainerOptions>)
            .await
            .map_err(|e| map_bollard("stop_container", "container", name, e))
    }

    async fn remove_container(&self, name: &str, force: bool) -> Result<(), RuntimeError> {
        self.docker
            .remove_container(
                name,
                Some(RemoveContainerOptions {
                    force,
                    ..Default::default()
                }),
            )
            .await
            .map_err(|e| map_bollard("remove_container", "container", name, e))
    }

    async fn inspect_container(&self, name: &str) -> Result<ContainerInfo, RuntimeError> {
        let response = self
            .docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
            .map_err(|e| map_bollard("inspect_container", "container", name, e))?;

        let status = match response.state.as_ref().and_then(|state| state.status) {
            Some(ContainerStateStatusEnum::RUNNING) => ContainerStatus::Running,
            Some(ContainerStateStatusEnum::CREATED) => ContainerStatus::Created,
            _ => ContainerStatus::Stopped,
        };

        let host_port = published_host_port(&response);

        Ok(ContainerInfo { status, host_port })
    }

    async fn exec(&self, name: &str, command: &str) -> Result<String, RuntimeError> {
        let exec = self
            .docker
            .create_exec(
                name,
                CreateExecOptions {
                    cmd: Some(command.split_whitespace().map(str::to_string).collect()),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| map_bollard("exec", "container", name, e))?;

        let results = self
            .docker
            .start_exec(&exec.id, None::<StartExecOptions>)
            .await
            .map_err(|e| map_bollard("exec", "container", name, e))?;

        match results {
            StartExecResults::Attached { mut output, .. } => {
                let mut collected = String::new();
                while let Some(chunk) = output.next().await {
                    let chunk = chunk.map_err(|e| map_bollard("exec", "container", name, e))?;
                    collected.push_str(&chunk.to_string());
                }
                Ok(collected)
            }
            StartExecResults::Detached => Ok(String::new()),
        }
    }

    async fn log_stream(&self, name: &str, tail: u32) -> Result<LogStream, RuntimeError> {
        // Inspect first so absence surfaces as NotFound here instead of an
        // opaque error mid-stream.
        self.inspect_container(name).await?;

        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            tail: tail.to_string(),
            ..Default::default()
        };

        let name_owned = name.to_string();
        let stream = self
            .docker
            .logs(name, Some(options))
            .map(move |item| match item {
                Ok(output) => Ok(output.to_string().trim_end().to_string()),
                Err(e) => Err(map_bollard("logs", "container", &name_owned, e)),
            })
            .boxed();

        Ok(stream)
    }
}
