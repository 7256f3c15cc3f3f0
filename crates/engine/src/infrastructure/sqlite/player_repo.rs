//! SQLite player repository.

use async_trait::async_trait;
use realmhost_domain::{Player, PlayerId, WorldId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::parse_uuid;
use crate::infrastructure::ports::{PlayerRepo, RepoError};

pub struct SqlitePlayerRepo {
    pool: SqlitePool,
}

impl SqlitePlayerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepo for SqlitePlayerRepo {
    async fn list_for_world(&self, world_id: WorldId) -> Result<Vec<Player>, RepoError> {
        let rows = sqlx::query("SELECT * FROM players WHERE world_id = ?")
            .bind(world_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("player_list_for_world", e))?;
        rows.iter().map(player_from_row).collect()
    }

    async fn save(&self, player: &Player) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO players (
                id, world_id, name, uuid, operator, accepted, online, permission
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                operator = excluded.operator,
                accepted = excluded.accepted,
                online = excluded.online,
                permission = excluded.permission
            "#,
        )
        .bind(player.id.to_string())
        .bind(player.world_id.to_string())
        .bind(&player.name)
        .bind(&player.uuid)
        .bind(player.operator)
        .bind(player.accepted)
        .bind(player.online)
        .bind(player.permission.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("player_save", e))?;
        Ok(())
    }

    async fn delete(&self, id: PlayerId) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("player_delete", e))?;
        Ok(())
    }
}

pub(crate) fn player_from_row(row: &SqliteRow) -> Result<Player, RepoError> {
    let id: String = row.get("id");
    let world_id: String = row.get("world_id");
    let permission: String = row.get("permission");

    Ok(Player {
        id: PlayerId::from_uuid(parse_uuid(&id)?),
        world_id: WorldId::from_uuid(parse_uuid(&world_id)?),
        name: row.get("name"),
        uuid: row.get("uuid"),
        operator: row.get("operator"),
        accepted: row.get("accepted"),
        online: row.get("online"),
        permission: permission
            .parse()
            .map_err(|e: realmhost_domain::DomainError| RepoError::serialization(e))?,
    })
}
