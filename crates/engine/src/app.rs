//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{
    ClockPort, ContainerRuntime, PlayerRepo, SettingsRepo, SlotRepo, WorldRepo,
};
use crate::use_cases::{
    LifecycleConfig, ResolveState, ServerLifecycle, SubscriptionOps, WorldUseCases,
};

/// Main application state.
///
/// Holds the repository ports and use cases. Passed to HTTP handlers via
/// Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    /// Shared secret gating the admin surface; `None` disables it.
    pub admin_key: Option<String>,
}

/// Container for the repository ports, injected directly.
pub struct Repositories {
    pub world: Arc<dyn WorldRepo>,
    pub slot: Arc<dyn SlotRepo>,
    pub player: Arc<dyn PlayerRepo>,
    pub settings: Arc<dyn SettingsRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub worlds: Arc<WorldUseCases>,
    pub state: Arc<ResolveState>,
    pub lifecycle: Arc<ServerLifecycle>,
    pub subscriptions: Arc<SubscriptionOps>,
}

impl App {
    pub fn new(
        repositories: Repositories,
        runtime: Arc<dyn ContainerRuntime>,
        lifecycle_config: LifecycleConfig,
        clock: Arc<dyn ClockPort>,
        admin_key: Option<String>,
    ) -> Self {
        let lifecycle = Arc::new(ServerLifecycle::new(runtime, lifecycle_config));
        let state = Arc::new(ResolveState::new(
            repositories.world.clone(),
            lifecycle.clone(),
        ));
        let subscriptions = Arc::new(SubscriptionOps::new(clock));
        let worlds = Arc::new(WorldUseCases::new(
            repositories.world.clone(),
            repositories.slot.clone(),
            repositories.settings.clone(),
            lifecycle.clone(),
            state.clone(),
            subscriptions.clone(),
        ));

        Self {
            repositories,
            use_cases: UseCases {
                worlds,
                state,
                lifecycle,
                subscriptions,
            },
            admin_key,
        }
    }
}
