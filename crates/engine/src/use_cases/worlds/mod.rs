//! World management use cases.

mod view;

pub use view::WorldView;

use std::sync::Arc;

use realmhost_domain::{
    Compatibility, Slot, SlotOptions, VersionParseError, World, WorldId, WorldType,
};

use crate::infrastructure::app_settings::AppSettings;
use crate::infrastructure::ports::{RepoError, SettingsRepo, SlotRepo, WorldRepo};
use crate::use_cases::lifecycle::{LifecycleError, ServerLifecycle};
use crate::use_cases::state::ResolveState;
use crate::use_cases::subscriptions::{SubscriptionOps, SUBSCRIPTION_LENGTH_DAYS};

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("World not found")]
    NotFound,

    #[error("Slot not found")]
    SlotNotFound,

    #[error("No active slot")]
    NoActiveSlot,

    #[error("You don't own this world")]
    NotOwner,

    #[error(transparent)]
    Version(#[from] VersionParseError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Orchestrates world CRUD, slot configuration and the open/close/delete
/// lifecycle entry points.
pub struct WorldUseCases {
    world_repo: Arc<dyn WorldRepo>,
    slot_repo: Arc<dyn SlotRepo>,
    settings_repo: Arc<dyn SettingsRepo>,
    lifecycle: Arc<ServerLifecycle>,
    resolve_state: Arc<ResolveState>,
    subscriptions: Arc<SubscriptionOps>,
}

impl WorldUseCases {
    pub fn new(
        world_repo: Arc<dyn WorldRepo>,
        slot_repo: Arc<dyn SlotRepo>,
        settings_repo: Arc<dyn SettingsRepo>,
        lifecycle: Arc<ServerLifecycle>,
        resolve_state: Arc<ResolveState>,
        subscriptions: Arc<SubscriptionOps>,
    ) -> Self {
        Self {
            world_repo,
            slot_repo,
            settings_repo,
            lifecycle,
            resolve_state,
            subscriptions,
        }
    }

    /// All worlds the player sees: owned ones plus worlds they are an
    /// accepted member of. Auto-provisions a first world when the player
    /// owns none and the setting allows it. Member worlds without an active
    /// slot or subscription are not listable, matching the client's
    /// expectations.
    pub async fn list_for_player(
        &self,
        player_uuid: &str,
        player_name: &str,
        client_version: &str,
    ) -> Result<Vec<WorldView>, WorldError> {
        let mut owned = self.world_repo.list_owned(player_uuid).await?;

        if owned.is_empty() && self.settings().await?.automatic_realms_creation {
            let world = World::provisioned(player_name, player_uuid);
            self.world_repo.create(&world).await?;
            tracing::info!(world_id = %world.id, owner = player_name, "auto-provisioned realm");
            owned.push(world);
        }

        let mut views = Vec::with_capacity(owned.len());
        for world in owned {
            views.push(self.compose(world, client_version).await?);
        }

        for mut world in self.world_repo.list_member(player_uuid).await? {
            if world.active_slot.is_none() || world.subscription.is_none() {
                continue;
            }
            world.member = true;
            views.push(self.compose(world, client_version).await?);
        }

        Ok(views)
    }

    pub async fn get(&self, world_id: WorldId) -> Result<World, WorldError> {
        self.world_repo
            .get(world_id)
            .await?
            .ok_or(WorldError::NotFound)
    }

    pub async fn get_view(
        &self,
        world_id: WorldId,
        client_version: &str,
    ) -> Result<WorldView, WorldError> {
        let world = self.get(world_id).await?;
        self.compose(world, client_version).await
    }

    /// Fetch a world, failing unless `player_uuid` owns it.
    pub async fn ensure_owner(
        &self,
        world_id: WorldId,
        player_uuid: &str,
    ) -> Result<World, WorldError> {
        let world = self.get(world_id).await?;
        if !world.is_owned_by(player_uuid) {
            return Err(WorldError::NotOwner);
        }
        Ok(world)
    }

    pub async fn create(
        &self,
        owner_name: &str,
        owner_uuid: &str,
        name: Option<String>,
        motd: Option<String>,
        world_type: WorldType,
    ) -> Result<WorldId, WorldError> {
        let mut world = World::provisioned(owner_name, owner_uuid).with_world_type(world_type);
        world.name = name;
        world.motd = motd;
        self.world_repo.create(&world).await?;
        tracing::info!(world_id = %world.id, owner = owner_name, "world created");
        Ok(world.id)
    }

    /// Owner configuration update. Setting the name for the first time is
    /// what moves a world out of UNINITIALIZED at its next state query.
    pub async fn update_configuration(
        &self,
        world_id: WorldId,
        name: Option<String>,
        motd: Option<String>,
        world_type: Option<WorldType>,
    ) -> Result<(), WorldError> {
        self.world_repo
            .update_configuration(world_id, name, motd, world_type)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    WorldError::NotFound
                } else {
                    e.into()
                }
            })
    }

    /// Open the world: start its server on the active slot. Requires an
    /// active slot; already-running servers make this a no-op.
    pub async fn open(&self, world_id: WorldId) -> Result<(), WorldError> {
        let world = self.get(world_id).await?;
        let slot = world.active_slot.as_ref().ok_or(WorldError::NoActiveSlot)?;

        if !self.lifecycle.is_running(world_id).await? {
            self.lifecycle.start(world_id, slot.slot_number).await?;
        }
        Ok(())
    }

    /// Close the world: stop its server if it is running.
    pub async fn close(&self, world_id: WorldId, force: bool) -> Result<(), WorldError> {
        if self.lifecycle.is_running(world_id).await? {
            self.lifecycle.stop(world_id, force).await?;
        }
        Ok(())
    }

    /// Delete the world: tear down container and volume first, then the
    /// persisted rows (slots, players, subscription included).
    pub async fn delete(&self, world_id: WorldId) -> Result<(), WorldError> {
        self.lifecycle.delete(world_id).await?;
        self.world_repo.delete(world_id).await?;
        tracing::info!(world_id = %world_id, "world deleted");
        Ok(())
    }

    pub async fn list_slots(&self, world_id: WorldId) -> Result<Vec<Slot>, WorldError> {
        Ok(self.slot_repo.list_for_world(world_id).await?)
    }

    /// Upsert a slot's configuration by its client-facing number.
    pub async fn configure_slot(
        &self,
        world_id: WorldId,
        slot_number: u8,
        options: SlotOptions,
    ) -> Result<Slot, WorldError> {
        // The world must exist; ownership was checked at the boundary.
        self.get(world_id).await?;

        let mut slot = match self.slot_repo.get_by_number(world_id, slot_number).await? {
            Some(slot) => slot,
            None => Slot::new(world_id, slot_number, options.version.clone()),
        };
        slot.apply_options(options);
        self.slot_repo.save(&slot).await?;
        Ok(slot)
    }

    /// Switch the world's active slot to the given slot number.
    pub async fn activate_slot(
        &self,
        world_id: WorldId,
        slot_number: u8,
    ) -> Result<Slot, WorldError> {
        let slot = self
            .slot_repo
            .get_by_number(world_id, slot_number)
            .await?
            .ok_or(WorldError::SlotNotFound)?;
        self.world_repo.set_active_slot(world_id, slot.id).await?;
        Ok(slot)
    }

    /// Every world in the system, for the admin surface.
    pub async fn list_all(&self) -> Result<Vec<World>, WorldError> {
        Ok(self.world_repo.list_all().await?)
    }

    async fn compose(&self, world: World, client_version: &str) -> Result<WorldView, WorldError> {
        let state = self.resolve_state.for_world(&world).await?;
        let compatibility = Compatibility::evaluate(client_version, world.active_version())?;
        let (days_left, expired) = match &world.subscription {
            Some(subscription) => {
                let days = self.subscriptions.days_left(subscription);
                (days, days < 0)
            }
            None => (SUBSCRIPTION_LENGTH_DAYS, false),
        };

        Ok(WorldView {
            world,
            state,
            compatibility,
            days_left,
            expired,
        })
    }

    async fn settings(&self) -> Result<AppSettings, WorldError> {
        Ok(self.settings_repo.get().await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        ContainerInfo, ContainerStatus, MockContainerRuntime, MockSettingsRepo, MockSlotRepo,
        MockWorldRepo, RuntimeError,
    };
    use crate::use_cases::lifecycle::LifecycleConfig;
    use chrono::{TimeZone, Utc};
    use realmhost_domain::RealmState;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn build(
        world_repo: MockWorldRepo,
        slot_repo: MockSlotRepo,
        settings_repo: MockSettingsRepo,
        runtime: MockContainerRuntime,
    ) -> WorldUseCases {
        let world_repo: Arc<dyn WorldRepo> = Arc::new(world_repo);
        let lifecycle = Arc::new(ServerLifecycle::new(
            Arc::new(runtime),
            LifecycleConfig::default(),
        ));
        let resolve_state = Arc::new(ResolveState::new(world_repo.clone(), lifecycle.clone()));
        let clock = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        WorldUseCases::new(
            world_repo,
            Arc::new(slot_repo),
            Arc::new(settings_repo),
            lifecycle,
            resolve_state,
            Arc::new(SubscriptionOps::new(Arc::new(FixedClock(clock)))),
        )
    }

    fn world_with_active_slot() -> World {
        let mut world = World::provisioned("Steve", "uuid-1").with_name("My Realm");
        world.active_slot = Some(Slot::new(world.id, 1, "1.20.1"));
        world
    }

    #[tokio::test]
    async fn open_without_active_slot_is_rejected() {
        let world = World::provisioned("Steve", "uuid-1").with_name("My Realm");
        let world_id = world.id;

        let mut world_repo = MockWorldRepo::new();
        world_repo
            .expect_get()
            .returning(move |_| Ok(Some(world.clone())));

        let use_cases = build(
            world_repo,
            MockSlotRepo::new(),
            MockSettingsRepo::new(),
            MockContainerRuntime::new(),
        );

        let err = use_cases.open(world_id).await.unwrap_err();
        assert!(matches!(err, WorldError::NoActiveSlot));
    }

    #[tokio::test]
    async fn open_twice_creates_one_container_and_world_reads_open() {
        let world = world_with_active_slot();
        let world_id = world.id;

        let mut world_repo = MockWorldRepo::new();
        world_repo
            .expect_get()
            .returning(move |_| Ok(Some(world.clone())));

        let started = Arc::new(AtomicBool::new(false));
        let mut runtime = MockContainerRuntime::new();
        {
            let started = started.clone();
            runtime.expect_inspect_container().returning(move |name| {
                if started.load(Ordering::SeqCst) {
                    Ok(ContainerInfo {
                        status: ContainerStatus::Running,
                        host_port: Some(40123),
                    })
                } else {
                    Err(RuntimeError::not_found("container", name))
                }
            });
        }
        runtime.expect_create_volume().returning(|_| Ok(()));
        runtime
            .expect_create_container()
            .times(1)
            .returning(|_| Ok(()));
        {
            let started = started.clone();
            runtime.expect_start_container().returning(move |_| {
                started.store(true, Ordering::SeqCst);
                Ok(())
            });
        }

        let use_cases = build(
            world_repo,
            MockSlotRepo::new(),
            MockSettingsRepo::new(),
            runtime,
        );

        use_cases.open(world_id).await.unwrap();
        use_cases.open(world_id).await.unwrap();

        let view = use_cases.get_view(world_id, "1.20.1").await.unwrap();
        assert_eq!(view.state, RealmState::Open);
        assert_eq!(view.compatibility, Compatibility::Compatible);
    }

    #[tokio::test]
    async fn close_stops_a_running_server() {
        let mut runtime = MockContainerRuntime::new();
        runtime.expect_inspect_container().returning(|_| {
            Ok(ContainerInfo {
                status: ContainerStatus::Running,
                host_port: Some(40123),
            })
        });
        runtime.expect_exec().times(1).returning(|_, _| Ok(String::new()));

        let use_cases = build(
            MockWorldRepo::new(),
            MockSlotRepo::new(),
            MockSettingsRepo::new(),
            runtime,
        );

        use_cases.close(WorldId::new(), false).await.unwrap();
    }

    #[tokio::test]
    async fn close_is_a_noop_when_nothing_runs() {
        let mut runtime = MockContainerRuntime::new();
        runtime
            .expect_inspect_container()
            .returning(|name| Err(RuntimeError::not_found("container", name)));

        let use_cases = build(
            MockWorldRepo::new(),
            MockSlotRepo::new(),
            MockSettingsRepo::new(),
            runtime,
        );

        use_cases.close(WorldId::new(), false).await.unwrap();
    }

    #[tokio::test]
    async fn delete_tears_down_runtime_resources_then_rows() {
        let world_id = WorldId::new();

        let mut runtime = MockContainerRuntime::new();
        runtime
            .expect_remove_container()
            .times(1)
            .returning(|name, _| Err(RuntimeError::not_found("container", name)));
        runtime.expect_remove_volume().times(1).returning(|_| Ok(()));

        let mut world_repo = MockWorldRepo::new();
        world_repo.expect_delete().times(1).returning(|_| Ok(()));

        let use_cases = build(
            world_repo,
            MockSlotRepo::new(),
            MockSettingsRepo::new(),
            runtime,
        );

        use_cases.delete(world_id).await.unwrap();
    }

    #[tokio::test]
    async fn close_then_delete_succeeds_after_auto_remove() {
        // Stopping lets the container auto-remove itself; the following
        // delete must still succeed with only the volume left to reclaim.
        let world_id = WorldId::new();

        let mut runtime = MockContainerRuntime::new();
        runtime.expect_inspect_container().returning(|_| {
            Ok(ContainerInfo {
                status: ContainerStatus::Running,
                host_port: Some(40123),
            })
        });
        runtime.expect_exec().returning(|_, _| Ok(String::new()));
        runtime
            .expect_remove_container()
            .returning(|name, _| Err(RuntimeError::not_found("container", name)));
        runtime.expect_remove_volume().times(1).returning(|_| Ok(()));

        let mut world_repo = MockWorldRepo::new();
        world_repo.expect_delete().returning(|_| Ok(()));

        let use_cases = build(
            world_repo,
            MockSlotRepo::new(),
            MockSettingsRepo::new(),
            runtime,
        );

        use_cases.close(world_id, false).await.unwrap();
        use_cases.delete(world_id).await.unwrap();
    }

    #[tokio::test]
    async fn list_auto_provisions_a_first_world() {
        let mut world_repo = MockWorldRepo::new();
        world_repo.expect_list_owned().returning(|_| Ok(Vec::new()));
        world_repo
            .expect_create()
            .times(1)
            .withf(|world| world.name.is_none() && world.owner_uuid.as_deref() == Some("uuid-1"))
            .returning(|_| Ok(()));
        world_repo.expect_list_member().returning(|_| Ok(Vec::new()));

        let mut settings_repo = MockSettingsRepo::new();
        settings_repo.expect_get().returning(|| Ok(None));

        let use_cases = build(
            world_repo,
            MockSlotRepo::new(),
            settings_repo,
            MockContainerRuntime::new(),
        );

        let views = use_cases
            .list_for_player("uuid-1", "Steve", "1.20.1")
            .await
            .unwrap();

        assert_eq!(views.len(), 1);
        // A fresh world has no name yet, so it reports UNINITIALIZED and the
        // client's own version is the compatibility baseline.
        assert_eq!(views[0].state, RealmState::Uninitialized);
        assert_eq!(views[0].compatibility, Compatibility::Compatible);
        assert_eq!(views[0].days_left, SUBSCRIPTION_LENGTH_DAYS);
    }

    #[tokio::test]
    async fn list_respects_disabled_auto_provisioning() {
        let mut world_repo = MockWorldRepo::new();
        world_repo.expect_list_owned().returning(|_| Ok(Vec::new()));
        world_repo.expect_list_member().returning(|_| Ok(Vec::new()));

        let mut settings_repo = MockSettingsRepo::new();
        settings_repo.expect_get().returning(|| {
            Ok(Some(AppSettings {
                automatic_realms_creation: false,
                ..AppSettings::default()
            }))
        });

        let use_cases = build(
            world_repo,
            MockSlotRepo::new(),
            settings_repo,
            MockContainerRuntime::new(),
        );

        let views = use_cases
            .list_for_player("uuid-1", "Steve", "1.20.1")
            .await
            .unwrap();
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn list_skips_member_worlds_missing_slot_or_subscription() {
        let mut incomplete = world_with_active_slot();
        incomplete.subscription = None;

        let mut world_repo = MockWorldRepo::new();
        world_repo
            .expect_list_owned()
            .returning(|_| Ok(vec![World::provisioned("Steve", "uuid-1")]));
        world_repo
            .expect_list_member()
            .returning(move |_| Ok(vec![incomplete.clone()]));

        let mut settings_repo = MockSettingsRepo::new();
        settings_repo.expect_get().returning(|| Ok(None));

        let use_cases = build(
            world_repo,
            MockSlotRepo::new(),
            settings_repo,
            MockContainerRuntime::new(),
        );

        let views = use_cases
            .list_for_player("uuid-2", "Alex", "1.20.1")
            .await
            .unwrap();
        // Only the owned world survives; the member world lacks a
        // subscription.
        assert_eq!(views.len(), 1);
    }

    #[tokio::test]
    async fn ensure_owner_rejects_non_owners() {
        let world = world_with_active_slot();
        let world_id = world.id;

        let mut world_repo = MockWorldRepo::new();
        world_repo
            .expect_get()
            .returning(move |_| Ok(Some(world.clone())));

        let use_cases = build(
            world_repo,
            MockSlotRepo::new(),
            MockSettingsRepo::new(),
            MockContainerRuntime::new(),
        );

        assert!(matches!(
            use_cases.ensure_owner(world_id, "someone-else").await,
            Err(WorldError::NotOwner)
        ));
        assert!(use_cases.ensure_owner(world_id, "uuid-1").await.is_ok());
    }

    #[tokio::test]
    async fn configure_slot_creates_then_updates() {
        let world = world_with_active_slot();
        let world_id = world.id;

        let mut world_repo = MockWorldRepo::new();
        world_repo
            .expect_get()
            .returning(move |_| Ok(Some(world.clone())));

        let mut slot_repo = MockSlotRepo::new();
        slot_repo.expect_get_by_number().returning(|_, _| Ok(None));
        slot_repo
            .expect_save()
            .times(1)
            .withf(|slot| slot.slot_number == 2 && slot.version == "1.20.1" && slot.hardcore)
            .returning(|_| Ok(()));

        let use_cases = build(
            world_repo,
            slot_repo,
            MockSettingsRepo::new(),
            MockContainerRuntime::new(),
        );

        let options = SlotOptions {
            slot_name: "Hard mode".to_string(),
            version: "1.20.1".to_string(),
            difficulty: realmhost_domain::Difficulty::Hard,
            game_mode: realmhost_domain::GameMode::Survival,
            force_game_mode: false,
            spawn_protection: 0,
            hardcore: true,
        };
        let slot = use_cases
            .configure_slot(world_id, 2, options)
            .await
            .unwrap();
        assert_eq!(slot.slot_name, "Hard mode");
    }

    #[tokio::test]
    async fn activate_slot_requires_the_slot_to_exist() {
        let world = world_with_active_slot();
        let world_id = world.id;

        let mut slot_repo = MockSlotRepo::new();
        slot_repo.expect_get_by_number().returning(|_, _| Ok(None));

        let use_cases = build(
            MockWorldRepo::new(),
            slot_repo,
            MockSettingsRepo::new(),
            MockContainerRuntime::new(),
        );

        assert!(matches!(
            use_cases.activate_slot(world_id, 3).await,
            Err(WorldError::SlotNotFound)
        ));
    }
}
