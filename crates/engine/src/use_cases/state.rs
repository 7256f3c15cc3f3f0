//! Realm state resolution.
//!
//! A realm's logical state is never stored; it is recomputed on every query
//! from persisted configuration plus the live container status, so the two
//! can never drift apart.

use std::sync::Arc;

use realmhost_domain::{RealmState, World, WorldId};

use crate::infrastructure::ports::{RepoError, WorldRepo};
use crate::use_cases::lifecycle::{LifecycleError, ServerLifecycle};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("World not found")]
    WorldNotFound,

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Derives a world's logical state.
pub struct ResolveState {
    world_repo: Arc<dyn WorldRepo>,
    lifecycle: Arc<ServerLifecycle>,
}

impl ResolveState {
    pub fn new(world_repo: Arc<dyn WorldRepo>, lifecycle: Arc<ServerLifecycle>) -> Self {
        Self {
            world_repo,
            lifecycle,
        }
    }

    pub async fn execute(&self, world_id: WorldId) -> Result<RealmState, StateError> {
        let world = self
            .world_repo
            .get(world_id)
            .await?
            .ok_or(StateError::WorldNotFound)?;
        Ok(self.for_world(&world).await?)
    }

    /// State for an already-loaded world, saving the refetch during list
    /// composition.
    ///
    /// An unconfigured world (no name) is UNINITIALIZED no matter what the
    /// runtime reports for its id; the runtime is not even consulted.
    pub async fn for_world(&self, world: &World) -> Result<RealmState, LifecycleError> {
        if world.name.is_none() {
            return Ok(RealmState::Uninitialized);
        }
        if self.lifecycle.is_running(world.id).await? {
            Ok(RealmState::Open)
        } else {
            Ok(RealmState::Closed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        ContainerInfo, ContainerStatus, MockContainerRuntime, MockWorldRepo, RuntimeError,
    };
    use crate::use_cases::lifecycle::LifecycleConfig;

    fn resolver(repo: MockWorldRepo, runtime: MockContainerRuntime) -> ResolveState {
        ResolveState::new(
            Arc::new(repo),
            Arc::new(ServerLifecycle::new(
                Arc::new(runtime),
                LifecycleConfig::default(),
            )),
        )
    }

    fn configured_world() -> World {
        World::provisioned("Steve", "uuid-1").with_name("My Realm")
    }

    #[tokio::test]
    async fn unnamed_world_is_uninitialized_even_with_a_running_container() {
        let world = World::provisioned("Steve", "uuid-1");
        let world_id = world.id;

        let mut repo = MockWorldRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(world.clone())));
        // A container for this world exists and runs, but the runtime must
        // never be consulted for an unconfigured world.
        let mut runtime = MockContainerRuntime::new();
        runtime.expect_inspect_container().never().returning(|_| {
            Ok(ContainerInfo {
                status: ContainerStatus::Running,
                host_port: Some(40000),
            })
        });

        let state = resolver(repo, runtime).execute(world_id).await.unwrap();
        assert_eq!(state, RealmState::Uninitialized);
    }

    #[tokio::test]
    async fn named_world_with_running_container_is_open() {
        let world = configured_world();
        let world_id = world.id;

        let mut repo = MockWorldRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(world.clone())));
        let mut runtime = MockContainerRuntime::new();
        runtime.expect_inspect_container().returning(|_| {
            Ok(ContainerInfo {
                status: ContainerStatus::Running,
                host_port: Some(40000),
            })
        });

        let state = resolver(repo, runtime).execute(world_id).await.unwrap();
        assert_eq!(state, RealmState::Open);
    }

    #[tokio::test]
    async fn named_world_without_container_is_closed() {
        let world = configured_world();
        let world_id = world.id;

        let mut repo = MockWorldRepo::new();
        repo.expect_get().returning(move |_| Ok(Some(world.clone())));
        let mut runtime = MockContainerRuntime::new();
        runtime
            .expect_inspect_container()
            .returning(|name| Err(RuntimeError::not_found("container", name)));

        let state = resolver(repo, runtime).execute(world_id).await.unwrap();
        assert_eq!(state, RealmState::Closed);
    }

    #[tokio::test]
    async fn missing_world_is_an_error() {
        let mut repo = MockWorldRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        let runtime = MockContainerRuntime::new();

        let err = resolver(repo, runtime)
            .execute(WorldId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StateError::WorldNotFound));
    }
}
