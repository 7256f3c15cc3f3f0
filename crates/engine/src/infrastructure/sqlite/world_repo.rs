//! SQLite world repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use realmhost_domain::{
    MinigameRef, Subscription, SubscriptionId, TemplateId, World, WorldId, WorldType,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::parse_uuid;
use super::slot_repo::slot_from_row;
use super::player_repo::player_from_row;
use crate::infrastructure::ports::{RepoError, WorldRepo};

pub struct SqliteWorldRepo {
    pool: SqlitePool,
}

impl SqliteWorldRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attach active slot, subscription and players to a bare world row.
    async fn hydrate(&self, row: &SqliteRow) -> Result<World, RepoError> {
        let mut world = world_from_row(row)?;
        let world_id = world.id.to_string();

        let active_slot_id: Option<String> = row.get("active_slot_id");
        if let Some(slot_id) = active_slot_id {
            let slot_row = sqlx::query("SELECT * FROM slots WHERE id = ?")
                .bind(&slot_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::database("world_active_slot", e))?;
            world.active_slot = slot_row.as_ref().map(slot_from_row).transpose()?;
        }

        let subscription_row = sqlx::query("SELECT * FROM subscriptions WHERE world_id = ?")
            .bind(&world_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_subscription", e))?;
        world.subscription = subscription_row
            .as_ref()
            .map(subscription_from_row)
            .transpose()?;

        let player_rows = sqlx::query("SELECT * FROM players WHERE world_id = ?")
            .bind(&world_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_players", e))?;
        world.players = player_rows
            .iter()
            .map(player_from_row)
            .collect::<Result<_, _>>()?;

        Ok(world)
    }

    async fn hydrate_all(&self, rows: Vec<SqliteRow>) -> Result<Vec<World>, RepoError> {
        let mut worlds = Vec::with_capacity(rows.len());
        for row in &rows {
            worlds.push(self.hydrate(row).await?);
        }
        Ok(worlds)
    }
}

#[async_trait]
impl WorldRepo for SqliteWorldRepo {
    async fn get(&self, id: WorldId) -> Result<Option<World>, RepoError> {
        let row = sqlx::query("SELECT * FROM worlds WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_get", e))?;

        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, world: &World) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO worlds (
                id, owner, owner_uuid, name, motd, world_type, max_players,
                member, active_slot_id, parent_world_id,
                minigame_id, minigame_name, minigame_image
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(world.id.to_string())
        .bind(&world.owner)
        .bind(&world.owner_uuid)
        .bind(&world.name)
        .bind(&world.motd)
        .bind(world.world_type.to_string())
        .bind(world.max_players as i64)
        .bind(world.member)
        .bind(world.active_slot.as_ref().map(|slot| slot.id.to_string()))
        .bind(world.parent_world_id.map(|id| id.to_string()))
        .bind(world.minigame.as_ref().map(|m| m.id.to_string()))
        .bind(world.minigame.as_ref().map(|m| m.name.clone()))
        .bind(world.minigame.as_ref().and_then(|m| m.image.clone()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("world_create", e))?;

        if let Some(subscription) = &world.subscription {
            sqlx::query(
                r#"
                INSERT INTO subscriptions (id, world_id, start_date, subscription_type)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(world_id) DO UPDATE SET
                    start_date = excluded.start_date,
                    subscription_type = excluded.subscription_type
                "#,
            )
            .bind(subscription.id.to_string())
            .bind(subscription.world_id.to_string())
            .bind(subscription.start_date.to_rfc3339())
            .bind(subscription.subscription_type.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_create", e))?;
        }

        Ok(())
    }

    async fn delete(&self, id: WorldId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("world_delete", e))?;

        let world_id = id.to_string();
        for statement in [
            "DELETE FROM slots WHERE world_id = ?",
            "DELETE FROM players WHERE world_id = ?",
            "DELETE FROM subscriptions WHERE world_id = ?",
            "DELETE FROM worlds WHERE id = ?",
        ] {
            sqlx::query(statement)
                .bind(&world_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("world_delete", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("world_delete", e))
    }

    async fn list_owned(&self, owner_uuid: &str) -> Result<Vec<World>, RepoError> {
        let rows = sqlx::query("SELECT * FROM worlds WHERE owner_uuid = ?")
            .bind(owner_uuid)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_list_owned", e))?;
        self.hydrate_all(rows).await
    }

    async fn list_member(&self, player_uuid: &str) -> Result<Vec<World>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT w.* FROM worlds w
            JOIN players p ON p.world_id = w.id
            WHERE p.uuid = ? AND p.accepted = 1
            "#,
        )
        .bind(player_uuid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("world_list_member", e))?;
        self.hydrate_all(rows).await
    }

    async fn list_all(&self) -> Result<Vec<World>, RepoError> {
        let rows = sqlx::query("SELECT * FROM worlds")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_list_all", e))?;
        self.hydrate_all(rows).await
    }

    async fn update_configuration(
        &self,
        id: WorldId,
        name: Option<String>,
        motd: Option<String>,
        world_type: Option<WorldType>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE worlds SET
                name = COALESCE(?, name),
                motd = COALESCE(?, motd),
                world_type = COALESCE(?, world_type)
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(motd)
        .bind(world_type.map(|t| t.to_string()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("world_update_configuration", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("World", id));
        }
        Ok(())
    }

    async fn set_active_slot(
        &self,
        id: WorldId,
        slot_id: realmhost_domain::SlotId,
    ) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE worlds SET active_slot_id = ? WHERE id = ?")
            .bind(slot_id.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_set_active_slot", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("World", id));
        }
        Ok(())
    }
}

/// Bare world row, attachments not yet loaded.
fn world_from_row(row: &SqliteRow) -> Result<World, RepoError> {
    let id: String = row.get("id");
    let world_type: String = row.get("world_type");
    let max_players: i64 = row.get("max_players");

    let minigame_id: Option<String> = row.get("minigame_id");
    let minigame = match minigame_id {
        Some(template_id) => Some(MinigameRef {
            id: TemplateId::from_uuid(parse_uuid(&template_id)?),
            name: row.get::<Option<String>, _>("minigame_name").unwrap_or_default(),
            image: row.get("minigame_image"),
        }),
        None => None,
    };

    let parent_world_id: Option<String> = row.get("parent_world_id");
    let parent_world_id = parent_world_id
        .map(|value| parse_uuid(&value).map(WorldId::from_uuid))
        .transpose()?;

    Ok(World {
        id: WorldId::from_uuid(parse_uuid(&id)?),
        owner: row.get("owner"),
        owner_uuid: row.get("owner_uuid"),
        name: row.get("name"),
        motd: row.get("motd"),
        world_type: world_type
            .parse()
            .map_err(|e: realmhost_domain::DomainError| RepoError::serialization(e))?,
        max_players: max_players as u32,
        member: row.get("member"),
        active_slot: None,
        subscription: None,
        minigame,
        parent_world_id,
        players: Vec::new(),
    })
}

fn subscription_from_row(row: &SqliteRow) -> Result<Subscription, RepoError> {
    let id: String = row.get("id");
    let world_id: String = row.get("world_id");
    let start_date: String = row.get("start_date");
    let subscription_type: String = row.get("subscription_type");

    Ok(Subscription {
        id: SubscriptionId::from_uuid(parse_uuid(&id)?),
        world_id: WorldId::from_uuid(parse_uuid(&world_id)?),
        start_date: DateTime::parse_from_rfc3339(&start_date)
            .map_err(|e| RepoError::serialization(format!("invalid start_date: {e}")))?
            .with_timezone(&Utc),
        subscription_type: subscription_type
            .parse()
            .map_err(|e: realmhost_domain::DomainError| RepoError::serialization(e))?,
    })
}
