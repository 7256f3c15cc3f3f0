//! SQLite persistence adapters.
//!
//! One repository per entity over a shared pool. The schema is created on
//! connect; SQLite is the system of record for world configuration, never
//! for container state.

mod player_repo;
mod slot_repo;
mod world_repo;

pub use player_repo::SqlitePlayerRepo;
pub use slot_repo::SqliteSlotRepo;
pub use world_repo::SqliteWorldRepo;

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

/// Open (or create) the database and ensure the schema exists.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let pool = SqlitePool::connect(&format!("sqlite:{db_path}?mode=rwc"))
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in [
        r#"
        CREATE TABLE IF NOT EXISTS worlds (
            id TEXT PRIMARY KEY,
            owner TEXT,
            owner_uuid TEXT,
            name TEXT,
            motd TEXT,
            world_type TEXT NOT NULL,
            max_players INTEGER NOT NULL,
            member INTEGER NOT NULL,
            active_slot_id TEXT,
            parent_world_id TEXT,
            minigame_id TEXT,
            minigame_name TEXT,
            minigame_image TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id TEXT PRIMARY KEY,
            world_id TEXT NOT NULL,
            slot_number INTEGER NOT NULL,
            slot_name TEXT NOT NULL,
            version TEXT NOT NULL,
            difficulty INTEGER NOT NULL,
            game_mode INTEGER NOT NULL,
            force_game_mode INTEGER NOT NULL,
            spawn_protection INTEGER NOT NULL,
            hardcore INTEGER NOT NULL,
            UNIQUE (world_id, slot_number)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS players (
            id TEXT PRIMARY KEY,
            world_id TEXT NOT NULL,
            name TEXT NOT NULL,
            uuid TEXT NOT NULL,
            operator INTEGER NOT NULL,
            accepted INTEGER NOT NULL,
            online INTEGER NOT NULL,
            permission TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            id TEXT PRIMARY KEY,
            world_id TEXT NOT NULL UNIQUE,
            start_date TEXT NOT NULL,
            subscription_type TEXT NOT NULL
        )
        "#,
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }

    Ok(())
}

pub(crate) fn parse_uuid(value: &str) -> Result<uuid::Uuid, RepoError> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| RepoError::serialization(format!("invalid uuid {value}: {e}")))
}
