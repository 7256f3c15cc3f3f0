//! Integration tests for the SQLite repositories against a real database
//! file.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use realmhost_domain::{
    Player, Slot, SlotOptions, Subscription, SubscriptionType, World, WorldId, WorldType,
};

use crate::infrastructure::app_settings::AppSettings;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::{
    PlayerRepo, SettingsRepo, SlotRepo, WorldRepo,
};
use crate::infrastructure::settings::SqliteSettingsRepo;
use crate::infrastructure::sqlite::{
    self, SqlitePlayerRepo, SqliteSlotRepo, SqliteWorldRepo,
};

struct Repos {
    world: SqliteWorldRepo,
    slot: SqliteSlotRepo,
    player: SqlitePlayerRepo,
    pool: sqlx::SqlitePool,
    // Held so the database file outlives the test body.
    _dir: tempfile::TempDir,
}

async fn repos() -> Repos {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("realms.db");
    let pool = sqlite::connect(path.to_str().unwrap()).await.unwrap();
    Repos {
        world: SqliteWorldRepo::new(pool.clone()),
        slot: SqliteSlotRepo::new(pool.clone()),
        player: SqlitePlayerRepo::new(pool.clone()),
        pool,
        _dir: dir,
    }
}

#[tokio::test]
async fn world_round_trips_with_attachments() {
    let repos = repos().await;

    let mut world = World::provisioned("Steve", "uuid-1")
        .with_name("My Realm")
        .with_motd("welcome");
    world.subscription = Some(Subscription::new(
        world.id,
        Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
        SubscriptionType::Recurring,
    ));
    repos.world.create(&world).await.unwrap();

    let mut slot = Slot::new(world.id, 1, "1.20.1");
    slot.apply_options(SlotOptions {
        slot_name: "main".to_string(),
        version: "1.20.1".to_string(),
        difficulty: realmhost_domain::Difficulty::Hard,
        game_mode: realmhost_domain::GameMode::Creative,
        force_game_mode: true,
        spawn_protection: 16,
        hardcore: false,
    });
    repos.slot.save(&slot).await.unwrap();
    repos.world.set_active_slot(world.id, slot.id).await.unwrap();

    let mut member = Player::new(world.id, "Alex", "uuid-2");
    member.accepted = true;
    member.operator = true;
    repos.player.save(&member).await.unwrap();

    let loaded = repos.world.get(world.id).await.unwrap().unwrap();
    assert_eq!(loaded.name.as_deref(), Some("My Realm"));
    assert_eq!(loaded.motd.as_deref(), Some("welcome"));
    assert_eq!(loaded.world_type, WorldType::Normal);

    let active = loaded.active_slot.expect("active slot hydrated");
    assert_eq!(active.id, slot.id);
    assert_eq!(active.version, "1.20.1");
    assert_eq!(active.slot_name, "main");
    assert_eq!(active.difficulty, realmhost_domain::Difficulty::Hard);
    assert!(active.force_game_mode);
    assert_eq!(active.spawn_protection, 16);

    let subscription = loaded.subscription.expect("subscription hydrated");
    assert_eq!(subscription.subscription_type, SubscriptionType::Recurring);

    assert_eq!(loaded.players.len(), 1);
    assert_eq!(loaded.players[0].name, "Alex");
    assert!(loaded.players[0].operator);
}

#[tokio::test]
async fn lists_owned_and_member_worlds_separately() {
    let repos = repos().await;

    let owned = World::provisioned("Steve", "uuid-1").with_name("Steve's");
    repos.world.create(&owned).await.unwrap();

    let theirs = World::provisioned("Alex", "uuid-2").with_name("Alex's");
    repos.world.create(&theirs).await.unwrap();

    // Steve is an accepted member of Alex's world.
    let mut membership = Player::new(theirs.id, "Steve", "uuid-1");
    membership.accepted = true;
    repos.player.save(&membership).await.unwrap();

    // A pending (not accepted) membership must not surface.
    let pending = Player::new(owned.id, "Alex", "uuid-2");
    repos.player.save(&pending).await.unwrap();

    let owned_list = repos.world.list_owned("uuid-1").await.unwrap();
    assert_eq!(owned_list.len(), 1);
    assert_eq!(owned_list[0].id, owned.id);

    let member_list = repos.world.list_member("uuid-1").await.unwrap();
    assert_eq!(member_list.len(), 1);
    assert_eq!(member_list[0].id, theirs.id);

    assert!(repos.world.list_member("uuid-2").await.unwrap().is_empty());
    assert_eq!(repos.world.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_configuration_touches_only_provided_fields() {
    let repos = repos().await;

    let world = World::provisioned("Steve", "uuid-1");
    repos.world.create(&world).await.unwrap();

    repos
        .world
        .update_configuration(world.id, Some("Named now".to_string()), None, None)
        .await
        .unwrap();

    let loaded = repos.world.get(world.id).await.unwrap().unwrap();
    assert_eq!(loaded.name.as_deref(), Some("Named now"));
    assert_eq!(loaded.motd, None);
    assert_eq!(loaded.world_type, WorldType::Normal);

    let missing = repos
        .world
        .update_configuration(WorldId::new(), Some("x".to_string()), None, None)
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn delete_cascades_to_slots_players_and_subscription() {
    let repos = repos().await;

    let mut world = World::provisioned("Steve", "uuid-1").with_name("Doomed");
    world.subscription = Some(Subscription::new(
        world.id,
        Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
        SubscriptionType::Normal,
    ));
    repos.world.create(&world).await.unwrap();
    repos
        .slot
        .save(&Slot::new(world.id, 1, "1.20.1"))
        .await
        .unwrap();
    repos
        .player
        .save(&Player::new(world.id, "Alex", "uuid-2"))
        .await
        .unwrap();

    repos.world.delete(world.id).await.unwrap();

    assert!(repos.world.get(world.id).await.unwrap().is_none());
    assert!(repos.slot.list_for_world(world.id).await.unwrap().is_empty());
    assert!(repos
        .player
        .list_for_world(world.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn slot_lookup_by_number_and_upsert() {
    let repos = repos().await;

    let world = World::provisioned("Steve", "uuid-1");
    repos.world.create(&world).await.unwrap();

    let mut slot = Slot::new(world.id, 2, "1.19.4");
    repos.slot.save(&slot).await.unwrap();

    let found = repos
        .slot
        .get_by_number(world.id, 2)
        .await
        .unwrap()
        .expect("slot by number");
    assert_eq!(found.id, slot.id);
    assert!(repos.slot.get_by_number(world.id, 3).await.unwrap().is_none());

    // Saving the same slot id again updates in place.
    slot.version = "1.20.1".to_string();
    repos.slot.save(&slot).await.unwrap();
    let updated = repos.slot.get(slot.id).await.unwrap().unwrap();
    assert_eq!(updated.version, "1.20.1");
    assert_eq!(repos.slot.list_for_world(world.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn settings_round_trip() {
    let repos = repos().await;
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()));
    let settings_repo = SqliteSettingsRepo::new(repos.pool.clone(), clock)
        .await
        .unwrap();

    assert!(settings_repo.get().await.unwrap().is_none());

    let mut settings = AppSettings::default();
    settings.news_link = "https://news.example".to_string();
    settings_repo.save(&settings).await.unwrap();

    let loaded = settings_repo.get().await.unwrap().unwrap();
    assert_eq!(loaded, settings);

    // Saving again overwrites the single global row.
    settings.trial_mode = true;
    settings_repo.save(&settings).await.unwrap();
    assert!(settings_repo.get().await.unwrap().unwrap().trial_mode);
}
