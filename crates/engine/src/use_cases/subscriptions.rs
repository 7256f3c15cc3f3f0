//! Subscription presentation.
//!
//! Days-left arithmetic only; nothing here enforces expiry. A world with no
//! subscription row reports the default grant.

use std::sync::Arc;

use chrono::Duration;
use realmhost_domain::{Subscription, SubscriptionType, World};
use serde::Serialize;

use crate::infrastructure::ports::ClockPort;

/// Length of one subscription period.
pub const SUBSCRIPTION_LENGTH_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubscriptionInfo {
    #[serde(rename = "subscriptionType")]
    pub subscription_type: SubscriptionType,
    #[serde(rename = "daysLeft")]
    pub days_left: i64,
}

pub struct SubscriptionOps {
    clock: Arc<dyn ClockPort>,
}

impl SubscriptionOps {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self { clock }
    }

    /// Signed days remaining in the current period; negative once expired.
    pub fn days_left(&self, subscription: &Subscription) -> i64 {
        (subscription.start_date + Duration::days(SUBSCRIPTION_LENGTH_DAYS) - self.clock.now())
            .num_days()
    }

    /// Wire summary for a world, clamped at zero like the protocol expects.
    pub fn describe(&self, world: &World) -> SubscriptionInfo {
        match &world.subscription {
            Some(subscription) => SubscriptionInfo {
                subscription_type: subscription.subscription_type,
                days_left: self.days_left(subscription).max(0),
            },
            None => SubscriptionInfo {
                subscription_type: SubscriptionType::Normal,
                days_left: SUBSCRIPTION_LENGTH_DAYS,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use realmhost_domain::WorldId;

    fn ops(now: chrono::DateTime<Utc>) -> SubscriptionOps {
        SubscriptionOps::new(Arc::new(FixedClock(now)))
    }

    #[test]
    fn counts_down_from_thirty_days() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 11, 0, 0, 0).unwrap();
        let subscription = Subscription::new(WorldId::new(), start, SubscriptionType::Normal);

        assert_eq!(ops(now).days_left(&subscription), 20);
    }

    #[test]
    fn expired_subscription_goes_negative() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let subscription = Subscription::new(WorldId::new(), start, SubscriptionType::Recurring);

        assert!(ops(now).days_left(&subscription) < 0);
    }

    #[test]
    fn describe_clamps_at_zero_and_defaults_without_subscription() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

        let mut world = World::provisioned("Steve", "uuid-1");
        world.subscription = Some(Subscription::new(
            world.id,
            start,
            SubscriptionType::Recurring,
        ));
        let info = ops(now).describe(&world);
        assert_eq!(info.days_left, 0);
        assert_eq!(info.subscription_type, SubscriptionType::Recurring);

        world.subscription = None;
        let info = ops(now).describe(&world);
        assert_eq!(info.days_left, SUBSCRIPTION_LENGTH_DAYS);
        assert_eq!(info.subscription_type, SubscriptionType::Normal);
    }
}
