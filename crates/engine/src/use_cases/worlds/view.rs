//! Composed world view for client responses.

use realmhost_domain::{Compatibility, RealmState, World};

/// A world together with everything derived at query time: logical state,
/// client compatibility and subscription arithmetic.
#[derive(Debug, Clone)]
pub struct WorldView {
    pub world: World,
    pub state: RealmState,
    pub compatibility: Compatibility,
    /// Signed days remaining; negative once the subscription lapsed.
    pub days_left: i64,
    pub expired: bool,
}
