//! Use cases - orchestration over the port boundary.
//!
//! Each module covers one area: container lifecycle, state resolution,
//! world management, subscription presentation.

pub mod lifecycle;
pub mod state;
pub mod subscriptions;
pub mod worlds;

// Re-export main types
pub use lifecycle::{LifecycleConfig, LifecycleError, ServerLifecycle};
pub use state::{ResolveState, StateError};
pub use subscriptions::{SubscriptionInfo, SubscriptionOps};
pub use worlds::{WorldError, WorldUseCases, WorldView};
