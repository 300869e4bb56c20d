//! `SQLite` implementation of [`LadderRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use ladderbot_app::ports::LadderRepository;
use ladderbot_domain::error::LadderError;
use ladderbot_domain::id::GuildId;
use ladderbot_domain::ladder::Ladder;
use ladderbot_domain::player::Player;

use crate::codec::{decode_id, decode_ts, encode_ts};
use crate::error::StorageError;

/// Wrapper for converting `players` rows into domain [`Player`]s.
struct PlayerRow(Player);

impl<'r> FromRow<'r, SqliteRow> for PlayerRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let user_id: String = row.try_get("user_id")?;
        let name: String = row.try_get("name")?;
        let joined_at: String = row.try_get("joined_at")?;
        let last_active_at: String = row.try_get("last_active_at")?;

        Ok(Self(Player {
            user_id: decode_id(&user_id)?,
            name,
            joined_at: decode_ts(&joined_at)?,
            last_active_at: decode_ts(&last_active_at)?,
        }))
    }
}

const SELECT_LADDER: &str = "SELECT created_at FROM ladders WHERE guild_id = ?";
const SELECT_PLAYERS: &str = "SELECT * FROM players WHERE guild_id = ? ORDER BY position";
const UPSERT_LADDER: &str = r"
    INSERT INTO ladders (guild_id, created_at) VALUES (?, ?)
    ON CONFLICT(guild_id) DO UPDATE SET created_at = excluded.created_at
";
const INSERT_PLAYER: &str = r"
    INSERT INTO players (guild_id, user_id, name, position, joined_at, last_active_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const DELETE_PLAYERS: &str = "DELETE FROM players WHERE guild_id = ?";
const DELETE_LADDER: &str = "DELETE FROM ladders WHERE guild_id = ?";

/// `SQLite`-backed ladder repository.
pub struct SqliteLadderRepository {
    pool: SqlitePool,
}

impl SqliteLadderRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, guild_id: GuildId) -> Result<Option<Ladder>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as(SELECT_LADDER)
            .bind(guild_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        let Some((created_at,)) = row else {
            return Ok(None);
        };

        let players: Vec<PlayerRow> = sqlx::query_as(SELECT_PLAYERS)
            .bind(guild_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(Ladder {
            guild_id,
            created_at: decode_ts(&created_at)?,
            players: players.into_iter().map(|row| row.0).collect(),
        }))
    }

    async fn store(&self, ladder: &Ladder) -> Result<(), StorageError> {
        let guild_id = ladder.guild_id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query(UPSERT_LADDER)
            .bind(&guild_id)
            .bind(encode_ts(ladder.created_at))
            .execute(&mut *tx)
            .await?;
        sqlx::query(DELETE_PLAYERS)
            .bind(&guild_id)
            .execute(&mut *tx)
            .await?;
        for (position, player) in (1_i64..).zip(&ladder.players) {
            sqlx::query(INSERT_PLAYER)
                .bind(&guild_id)
                .bind(player.user_id.to_string())
                .bind(&player.name)
                .bind(position)
                .bind(encode_ts(player.joined_at))
                .bind(encode_ts(player.last_active_at))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, guild_id: GuildId) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(DELETE_PLAYERS)
            .bind(guild_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query(DELETE_LADDER)
            .bind(guild_id.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

impl LadderRepository for SqliteLadderRepository {
    async fn get(&self, guild_id: GuildId) -> Result<Option<Ladder>, LadderError> {
        Ok(self.fetch(guild_id).await?)
    }

    async fn save(&self, ladder: Ladder) -> Result<Ladder, LadderError> {
        self.store(&ladder).await?;
        Ok(ladder)
    }

    async fn delete(&self, guild_id: GuildId) -> Result<(), LadderError> {
        Ok(self.remove(guild_id).await?)
    }
}
