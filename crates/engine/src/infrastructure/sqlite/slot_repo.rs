//! SQLite slot repository.

use async_trait::async_trait;
use realmhost_domain::{Slot, SlotId, WorldId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::parse_uuid;
use crate::infrastructure::ports::{RepoError, SlotRepo};

pub struct SqliteSlotRepo {
    pool: SqlitePool,
}

impl SqliteSlotRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotRepo for SqliteSlotRepo {
    async fn get(&self, id: SlotId) -> Result<Option<Slot>, RepoError> {
        let row = sqlx::query("SELECT * FROM slots WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("slot_get", e))?;
        row.as_ref().map(slot_from_row).transpose()
    }

    async fn get_by_number(
        &self,
        world_id: WorldId,
        slot_number: u8,
    ) -> Result<Option<Slot>, RepoError> {
        let row = sqlx::query("SELECT * FROM slots WHERE world_id = ? AND slot_number = ?")
            .bind(world_id.to_string())
            .bind(slot_number as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("slot_get_by_number", e))?;
        row.as_ref().map(slot_from_row).transpose()
    }

    async fn list_for_world(&self, world_id: WorldId) -> Result<Vec<Slot>, RepoError> {
        let rows = sqlx::query("SELECT * FROM slots WHERE world_id = ? ORDER BY slot_number")
            .bind(world_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("slot_list_for_world", e))?;
        rows.iter().map(slot_from_row).collect()
    }

    async fn save(&self, slot: &Slot) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO slots (
                id, world_id, slot_number, slot_name, version, difficulty,
                game_mode, force_game_mode, spawn_protection, hardcore
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                slot_name = excluded.slot_name,
                version = excluded.version,
                difficulty = excluded.difficulty,
                game_mode = excluded.game_mode,
                force_game_mode = excluded.force_game_mode,
                spawn_protection = excluded.spawn_protection,
                hardcore = excluded.hardcore
            "#,
        )
        .bind(slot.id.to_string())
        .bind(slot.world_id.to_string())
        .bind(slot.slot_number as i64)
        .bind(&slot.slot_name)
        .bind(&slot.version)
        .bind(u8::from(slot.difficulty) as i64)
        .bind(u8::from(slot.game_mode) as i64)
        .bind(slot.force_game_mode)
        .bind(slot.spawn_protection as i64)
        .bind(slot.hardcore)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("slot_save", e))?;
        Ok(())
    }

    async fn delete(&self, id: SlotId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM slots WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("slot_delete", e))?;
        Ok(())
    }
}

pub(crate) fn slot_from_row(row: &SqliteRow) -> Result<Slot, RepoError> {
    let id: String = row.get("id");
    let world_id: String = row.get("world_id");
    let slot_number: i64 = row.get("slot_number");
    let difficulty: i64 = row.get("difficulty");
    let game_mode: i64 = row.get("game_mode");
    let spawn_protection: i64 = row.get("spawn_protection");

    Ok(Slot {
        id: SlotId::from_uuid(parse_uuid(&id)?),
        world_id: WorldId::from_uuid(parse_uuid(&world_id)?),
        slot_number: slot_number as u8,
        slot_name: row.get("slot_name"),
        version: row.get("version"),
        difficulty: (difficulty as u8)
            .try_into()
            .map_err(|e: realmhost_domain::DomainError| RepoError::serialization(e))?,
        game_mode: (game_mode as u8)
            .try_into()
            .map_err(|e: realmhost_domain::DomainError| RepoError::serialization(e))?,
        force_game_mode: row.get("force_game_mode"),
        spawn_protection: spawn_protection as u32,
        hardcore: row.get("hardcore"),
    })
}
